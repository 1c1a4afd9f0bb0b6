use crate::{
    api::{
        AppService,
        models::*,
    },
    auth::jwt::Claims,
    core::{
        errors::DivvyError,
        models::{AppLog, Expense, Group, GroupAudit, Reminder, Settlement, User},
        services::GroupBalances,
    },
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream::{self, Stream};
use http::header;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast;

// Middleware to validate the bearer token and stash claims for handlers
pub(crate) async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| DivvyError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| DivvyError::Unauthorized("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub(crate) async fn acting_user(service: &AppService, claims: &Claims) -> Result<User, ApiError> {
    let user = service
        .get_user(&claims.sub)
        .await?
        .ok_or_else(|| DivvyError::UserNotFound(claims.sub.clone()))?;
    Ok(user)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", axum::routing::get(me))
        .route("/groups/my-groups", axum::routing::get(my_groups))
        .route("/groups/{group_id}", axum::routing::get(get_group))
        .route("/groups/{group_id}/balances", axum::routing::get(group_balances))
        .route("/groups/{group_id}/events", axum::routing::get(group_events))
        .route("/groups/{group_id}/audits", axum::routing::get(group_audits))
        .route("/expenses", axum::routing::post(add_expense))
        .route("/expenses/group/{group_id}", axum::routing::get(group_expenses))
        .route("/expenses/{expense_id}", axum::routing::delete(delete_expense))
        .route("/settlements", axum::routing::post(record_settlement))
        .route("/settlements/group/{group_id}", axum::routing::get(group_settlements))
        .route("/reminders", axum::routing::post(create_reminder))
        .route("/reminders/group/{group_id}", axum::routing::get(group_reminders))
        .route(
            "/reminders/{reminder_id}/dispatch",
            axum::routing::post(dispatch_reminder),
        )
        .route("/reminders/send", axum::routing::post(send_notice))
        .route("/logs", axum::routing::get(app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/auth/register", axum::routing::post(register))
        .route("/auth/login", axum::routing::post(login))
        .route("/groups", axum::routing::post(create_group))
        .route("/groups/join", axum::routing::post(join_group))
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(service): State<Arc<AppService>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = service
        .register_user(req.name, req.email, req.password, req.phone)
        .await?;
    let token = service.issue_token(&user.id)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(service): State<Arc<AppService>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = service.login(&req.email, &req.password).await?;
    Ok(Json(AuthResponse { user, token }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = User),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn me(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = GroupSessionResponse),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub(crate) async fn create_group(
    State(service): State<Arc<AppService>>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupSessionResponse>), ApiError> {
    let user = service
        .find_or_create_member(&req.user_name, &req.user_email, req.phone)
        .await?;
    let group = service.create_group(req.group_name, &user).await?;
    let token = service.issue_token(&user.id)?;
    Ok((StatusCode::CREATED, Json(GroupSessionResponse { group, user, token })))
}

#[utoipa::path(
    post,
    path = "/api/groups/join",
    request_body = JoinGroupRequest,
    responses(
        (status = 200, description = "Joined (or already a member)", body = GroupSessionResponse),
        (status = 404, description = "No group for that code", body = ErrorResponse)
    )
)]
pub(crate) async fn join_group(
    State(service): State<Arc<AppService>>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<GroupSessionResponse>, ApiError> {
    let user = service
        .find_or_create_member(&req.user_name, &req.user_email, req.phone)
        .await?;
    let group = service.join_group_by_code(&req.code, &user).await?;
    let token = service.issue_token(&user.id)?;
    Ok(Json(GroupSessionResponse { group, user, token }))
}

#[utoipa::path(
    get,
    path = "/api/groups/my-groups",
    responses(
        (status = 200, description = "Groups the caller belongs to", body = [Group])
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn my_groups(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Group>>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let groups = service.user_groups(&user).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Group details", body = Group),
        (status = 403, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn get_group(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Group>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let group = service.group_details(&group_id, &user).await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/balances",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Net positions and suggested transfers", body = GroupBalances),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_balances(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<GroupBalances>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let balances = service.group_balances(&group_id, &user).await?;
    Ok(Json(balances))
}

/// Advisory change stream: one `group-updated` event per mutation, tag
/// only. Clients re-fetch state on receipt.
#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/events",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Server-sent event stream of change tags"),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_events(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    service.group_details(&group_id, &user).await?;

    let rx = service.subscribe(&group_id).await;
    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = Event::default().event("group-updated").data(event.as_str());
                    return Some((Ok(sse), rx));
                }
                // Lagged receivers skip ahead; the client re-fetches anyway.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/audits",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Audit trail for the group", body = [GroupAudit]),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_audits(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<GroupAudit>>, ApiError> {
    let audits = service.group_audits(&group_id).await?;
    Ok(Json(audits))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = AddExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = Expense),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Payer or caller not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn add_expense(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let user = acting_user(&service, &claims).await?;
    let expense = service
        .add_expense(&req.group_id, req.title, req.amount, &req.payer_id, req.date, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/expenses/group/{group_id}",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Expenses, newest first", body = [Expense]),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_expenses(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let expenses = service.group_expenses(&group_id, &user).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "Expense id")),
    responses(
        (status = 200, description = "Expense deleted", body = MessageResponse),
        (status = 403, description = "Caller is not the payer", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn delete_expense(
    State(service): State<Arc<AppService>>,
    Path(expense_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    service.delete_expense(&expense_id, &user).await?;
    Ok(Json(MessageResponse {
        message: "Expense deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/settlements",
    request_body = RecordSettlementRequest,
    responses(
        (status = 201, description = "Settlement recorded", body = Settlement),
        (status = 400, description = "Self-settlement or bad amount", body = ErrorResponse),
        (status = 403, description = "A party is not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn record_settlement(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RecordSettlementRequest>,
) -> Result<(StatusCode, Json<Settlement>), ApiError> {
    let user = acting_user(&service, &claims).await?;
    let settlement = service
        .record_settlement(&req.group_id, &req.from_user_id, &req.to_user_id, req.amount, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(settlement)))
}

#[utoipa::path(
    get,
    path = "/api/settlements/group/{group_id}",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Settlements, newest first", body = [Settlement]),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_settlements(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Settlement>>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let settlements = service.group_settlements(&group_id, &user).await?;
    Ok(Json(settlements))
}

#[utoipa::path(
    post,
    path = "/api/reminders",
    request_body = CreateReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = Reminder),
        (status = 400, description = "Due date not in the future", body = ErrorResponse),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn create_reminder(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), ApiError> {
    let user = acting_user(&service, &claims).await?;
    let reminder = service
        .create_reminder(&req.group_id, &user, req.due_date, req.message, req.for_user)
        .await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

#[utoipa::path(
    get,
    path = "/api/reminders/group/{group_id}",
    params(("group_id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Reminders, soonest due first", body = [Reminder]),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn group_reminders(
    State(service): State<Arc<AppService>>,
    Path(group_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let reminders = service.group_reminders(&group_id, &user).await?;
    Ok(Json(reminders))
}

#[utoipa::path(
    post,
    path = "/api/reminders/{reminder_id}/dispatch",
    params(("reminder_id" = String, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Reminder sent", body = NoticeResponse),
        (status = 404, description = "Reminder not found", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn dispatch_reminder(
    State(service): State<Arc<AppService>>,
    Path(reminder_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<NoticeResponse>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let sent = service.dispatch_reminder(&reminder_id, &user).await?;
    Ok(Json(NoticeResponse { success: true, sent }))
}

#[utoipa::path(
    post,
    path = "/api/reminders/send",
    request_body = SendNoticeRequest,
    responses(
        (status = 200, description = "Notice sent", body = NoticeResponse),
        (status = 403, description = "Not a member", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn send_notice(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendNoticeRequest>,
) -> Result<Json<NoticeResponse>, ApiError> {
    let user = acting_user(&service, &claims).await?;
    let sent = service
        .send_group_notice(&req.group_id, req.member_id.as_deref(), req.message, &user)
        .await?;
    Ok(Json(NoticeResponse { success: true, sent }))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Application logs", body = [AppLog])
    ),
    security(("Bearer" = []))
)]
pub(crate) async fn app_logs(State(service): State<Arc<AppService>>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.app_logs().await?;
    Ok(Json(logs))
}
