//! Shared constants: audit action tags, numeric tolerances, join-code shape.

// Audit action tags
pub const USER_REGISTERED: &str = "user_registered";
pub const GROUP_CREATED: &str = "group_created";
pub const MEMBER_JOINED: &str = "member_joined";
pub const EXPENSE_ADDED: &str = "expense_added";
pub const EXPENSE_DELETED: &str = "expense_deleted";
pub const SETTLEMENT_RECORDED: &str = "settlement_recorded";
pub const REMINDER_CREATED: &str = "reminder_created";
pub const REMINDER_DISPATCHED: &str = "reminder_dispatched";
pub const BALANCES_QUERIED: &str = "balances_queried";

/// Balances must sum to zero within this tolerance (conservation check).
pub const BALANCE_TOLERANCE: f64 = 1e-9;

/// Entries below this absolute value are floating-point dust and are hidden
/// from presentation. Display concern only, never a correctness rule.
pub const DISPLAY_EPSILON: f64 = 0.01;

pub const JOIN_CODE_LENGTH: usize = 6;
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_REMINDER_MESSAGE: &str = "Please settle your balance.";

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_MESSAGE_LENGTH: usize = 500;
pub const MAX_AMOUNT: f64 = 1_000_000.0;
