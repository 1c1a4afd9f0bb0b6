use utoipa::OpenApi;

use crate::{
    api::models::{
        AddExpenseRequest, AuthResponse, CreateGroupRequest, CreateReminderRequest, ErrorResponse,
        GroupSessionResponse, JoinGroupRequest, LoginRequest, MessageResponse, NoticeResponse,
        RecordSettlementRequest, RegisterRequest, SendNoticeRequest,
    },
    core::{
        balance::{MemberBalance, SettlementSuggestion},
        models::{AppLog, Expense, Group, GroupAudit, Reminder, Settlement, User},
        services::GroupBalances,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::register,
        super::handlers::login,
        super::handlers::me,
        super::handlers::create_group,
        super::handlers::join_group,
        super::handlers::my_groups,
        super::handlers::get_group,
        super::handlers::group_balances,
        super::handlers::group_events,
        super::handlers::group_audits,
        super::handlers::add_expense,
        super::handlers::group_expenses,
        super::handlers::delete_expense,
        super::handlers::record_settlement,
        super::handlers::group_settlements,
        super::handlers::create_reminder,
        super::handlers::group_reminders,
        super::handlers::dispatch_reminder,
        super::handlers::send_notice,
        super::handlers::app_logs
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        CreateGroupRequest,
        JoinGroupRequest,
        GroupSessionResponse,
        AddExpenseRequest,
        RecordSettlementRequest,
        CreateReminderRequest,
        SendNoticeRequest,
        NoticeResponse,
        MessageResponse,
        ErrorResponse,
        User,
        Group,
        Expense,
        Settlement,
        Reminder,
        AppLog,
        GroupAudit,
        GroupBalances,
        MemberBalance,
        SettlementSuggestion
    )),
    info(
        title = "Divvy API",
        description = "Shared expenses, balances, settlements and reminders for small groups",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
