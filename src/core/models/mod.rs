pub mod audit;
pub mod expense;
pub mod group;
pub mod reminder;
pub mod settlement;
pub mod user;

pub use audit::{AppLog, GroupAudit};
pub use expense::Expense;
pub use group::Group;
pub use reminder::Reminder;
pub use settlement::Settlement;
pub use user::User;
