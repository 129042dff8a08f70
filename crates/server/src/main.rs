// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use clap::Parser;
use rand::{RngExt, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use admast::{InquiryConfig, TokenSigner};
use admast_api::{
    AddCampaignItemsRequest, ApiError, CampaignChangeResponse, ChangePasswordRequest,
    CreateOperatorRequest, CreateOperatorResponse, ImportUnitsResponse, InquiryResponse,
    InquirySubmission, LeadDetailResponse, ListInquiriesResponse, ListLeadsResponse,
    ListOperatorsResponse, ListUnitsQuery, ListUnitsResponse, LoginRequest, LoginResponse,
    MessageResponse, QuoteResponse, QuoteSubmission, ResetPasswordRequest, ResolveInquiryRequest,
    ResolveInquiryResponse, ReviewInquiryResponse, SetTimelineRequest, SetTimelineResponse,
    TimelineResponse, UpdateLeadRequest, UpdateLeadResponse, UpdatePricesResponse,
    WhoAmIResponse, handlers,
};
use admast_persistence::{Persistence, PersistenceError};

use crate::mailer::Mailer;
use crate::session::{BearerToken, SessionOperator};

mod mailer;
mod session;

/// `AdMast` Server - HTTP server for the `AdMast` CRM
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Host address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Login name for a super admin to create when no operators exist
    #[arg(long)]
    bootstrap_admin: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer, behind a mutex for safe concurrent access.
    pub persistence: Arc<Mutex<Persistence>>,
    /// Outbound mail delivery, best-effort.
    pub mailer: Arc<Mailer>,
    /// Signer for discount review access tokens.
    pub signer: Arc<TokenSigner>,
    /// Review link base URL and fallback approver address.
    pub inquiry_config: Arc<InquiryConfig>,
}

/// Request body for archiving or restoring an inventory unit.
#[derive(Debug, Deserialize)]
struct SetUnitActiveRequest {
    /// Whether the unit should be offered at all.
    active: bool,
}

/// Query parameters for listing leads.
#[derive(Debug, Deserialize)]
struct ListLeadsQuery {
    /// Optional pipeline status filter.
    status: Option<String>,
}

/// Query parameters for listing discount inquiries.
#[derive(Debug, Deserialize)]
struct ListInquiriesQuery {
    /// Optional resolution status filter.
    status: Option<String>,
}

/// Query parameters carrying a review access token.
#[derive(Debug, Deserialize)]
struct TokenQuery {
    /// The access token from the emailed review link.
    token: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } | ApiError::AccessLinkRejected => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BookingConflict { .. } => StatusCode::CONFLICT,
            ApiError::RuleViolation { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "Internal error");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sessions and operators
// ---------------------------------------------------------------------------

/// Handler for POST `/login`.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: LoginResponse =
        handlers::login(&mut persistence, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/logout`.
async fn handle_logout(
    AxumState(state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse = handlers::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/whoami`.
async fn handle_whoami(SessionOperator(_actor, operator): SessionOperator) -> Json<WhoAmIResponse> {
    Json(handlers::whoami(&operator))
}

/// Handler for POST `/operators`.
async fn handle_create_operator(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<CreateOperatorRequest>,
) -> Result<Json<CreateOperatorResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: CreateOperatorResponse =
        handlers::create_operator(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/operators`.
async fn handle_list_operators(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<ListOperatorsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ListOperatorsResponse = handlers::list_operators(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/{login_name}/disable`.
async fn handle_disable_operator(
    AxumState(state): AxumState<AppState>,
    Path(login_name): Path<String>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse =
        handlers::disable_operator(&mut persistence, &actor, &login_name)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/{login_name}/enable`.
async fn handle_enable_operator(
    AxumState(state): AxumState<AppState>,
    Path(login_name): Path<String>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse =
        handlers::enable_operator(&mut persistence, &actor, &login_name)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/password`. Changes the calling
/// operator's own password.
async fn handle_change_password(
    AxumState(state): AxumState<AppState>,
    SessionOperator(_actor, operator): SessionOperator,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse = handlers::change_password(&mut persistence, &operator, &req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/operators/reset_password`.
async fn handle_reset_password(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse = handlers::reset_password(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Handler for GET `/units`.
async fn handle_list_units(
    AxumState(state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
    Query(query): Query<ListUnitsQuery>,
) -> Result<Json<ListUnitsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ListUnitsResponse = handlers::list_units(&mut persistence, query)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/units/import`. The body is the raw CSV file.
async fn handle_import_units(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    body: String,
) -> Result<Json<ImportUnitsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ImportUnitsResponse =
        handlers::import_units(&mut persistence, &actor, &body, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/units/prices`. The body is the raw CSV file.
async fn handle_update_prices(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    body: String,
) -> Result<Json<UpdatePricesResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: UpdatePricesResponse =
        handlers::update_prices(&mut persistence, &actor, &body, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/units/{unit_id}/active`.
async fn handle_set_unit_active(
    AxumState(state): AxumState<AppState>,
    Path(unit_id): Path<i64>,
    SessionOperator(actor, _operator): SessionOperator,
    Json(req): Json<SetUnitActiveRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse = handlers::set_unit_active(
        &mut persistence,
        &actor,
        unit_id,
        req.active,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Leads and campaigns
// ---------------------------------------------------------------------------

/// Handler for POST `/quotes`. Public website intake; no session
/// required. Notification mail goes out after the lead is committed.
async fn handle_submit_quote(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<QuoteSubmission>,
) -> Result<Json<QuoteResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let (response, mails) = handlers::submit_quote(
        &mut persistence,
        state.inquiry_config.fallback_approver.as_deref(),
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    for mail in &mails {
        state.mailer.deliver(mail).await;
    }

    Ok(Json(response))
}

/// Handler for GET `/leads`.
async fn handle_list_leads(
    AxumState(state): AxumState<AppState>,
    SessionOperator(_actor, _operator): SessionOperator,
    Query(query): Query<ListLeadsQuery>,
) -> Result<Json<ListLeadsResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ListLeadsResponse =
        handlers::list_leads(&mut persistence, query.status.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/leads/{lead_id}`.
async fn handle_get_lead(
    AxumState(state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<LeadDetailResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: LeadDetailResponse = handlers::get_lead_detail(&mut persistence, lead_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leads/{lead_id}`. Applies a partial update:
/// status transitions, discounts, notes, remarks, and handoffs.
async fn handle_update_lead(
    AxumState(state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<UpdateLeadRequest>,
) -> Result<Json<UpdateLeadResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: UpdateLeadResponse = handlers::update_lead(
        &mut persistence,
        &actor,
        &operator,
        lead_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/leads/{lead_id}`.
async fn handle_delete_lead(
    AxumState(state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
    SessionOperator(actor, _operator): SessionOperator,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: MessageResponse = handlers::delete_lead(
        &mut persistence,
        &actor,
        lead_id,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leads/{lead_id}/items`.
async fn handle_add_campaign_items(
    AxumState(state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<AddCampaignItemsRequest>,
) -> Result<Json<CampaignChangeResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: CampaignChangeResponse = handlers::add_campaign_items(
        &mut persistence,
        &actor,
        &operator,
        lead_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/leads/{lead_id}/items/{item_id}`.
async fn handle_remove_campaign_item(
    AxumState(state): AxumState<AppState>,
    Path((lead_id, item_id)): Path<(i64, i64)>,
    SessionOperator(actor, operator): SessionOperator,
) -> Result<Json<CampaignChangeResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: CampaignChangeResponse = handlers::remove_campaign_item(
        &mut persistence,
        &actor,
        &operator,
        lead_id,
        item_id,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/leads/{lead_id}/timeline`.
async fn handle_set_timeline(
    AxumState(state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<SetTimelineRequest>,
) -> Result<Json<SetTimelineResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: SetTimelineResponse = handlers::set_timeline(
        &mut persistence,
        &actor,
        &operator,
        lead_id,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/leads/{lead_id}/timeline`.
async fn handle_get_timeline(
    AxumState(state): AxumState<AppState>,
    Path(lead_id): Path<i64>,
    SessionOperator(_actor, _operator): SessionOperator,
) -> Result<Json<TimelineResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: TimelineResponse = handlers::get_timeline(&mut persistence, lead_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Discount inquiries
// ---------------------------------------------------------------------------

/// Handler for POST `/inquiries`. Public website intake; the review
/// request mail goes out after the inquiry is committed.
async fn handle_submit_inquiry(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<InquirySubmission>,
) -> Result<Json<InquiryResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let (response, mail) = handlers::submit_inquiry(
        &mut persistence,
        &state.signer,
        &state.inquiry_config,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    state.mailer.deliver(&mail).await;

    Ok(Json(response))
}

/// Handler for GET `/inquiries/{inquiry_id}/review`. Token-gated, no
/// session: the emailed link is the credential.
async fn handle_review_inquiry(
    AxumState(state): AxumState<AppState>,
    Path(inquiry_id): Path<i64>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ReviewInquiryResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ReviewInquiryResponse = handlers::review_inquiry(
        &mut persistence,
        inquiry_id,
        &query.token,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/inquiries/{inquiry_id}/resolve`. Token-gated;
/// the outcome mail goes out after the resolution is committed.
async fn handle_resolve_inquiry(
    AxumState(state): AxumState<AppState>,
    Path(inquiry_id): Path<i64>,
    Query(query): Query<TokenQuery>,
    Json(req): Json<ResolveInquiryRequest>,
) -> Result<Json<ResolveInquiryResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let (response, mail) = handlers::resolve_inquiry(
        &mut persistence,
        inquiry_id,
        &query.token,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    state.mailer.deliver(&mail).await;

    Ok(Json(response))
}

/// Handler for GET `/inquiries`.
async fn handle_list_inquiries(
    AxumState(state): AxumState<AppState>,
    SessionOperator(actor, _operator): SessionOperator,
    Query(query): Query<ListInquiriesQuery>,
) -> Result<Json<ListInquiriesResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ListInquiriesResponse =
        handlers::list_inquiries(&mut persistence, &actor, query.status.as_deref())?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route(
            "/operators",
            post(handle_create_operator).get(handle_list_operators),
        )
        .route(
            "/operators/{login_name}/disable",
            post(handle_disable_operator),
        )
        .route(
            "/operators/{login_name}/enable",
            post(handle_enable_operator),
        )
        .route("/operators/password", post(handle_change_password))
        .route("/operators/reset_password", post(handle_reset_password))
        .route("/units", get(handle_list_units))
        .route("/units/import", post(handle_import_units))
        .route("/units/prices", post(handle_update_prices))
        .route("/units/{unit_id}/active", post(handle_set_unit_active))
        .route("/quotes", post(handle_submit_quote))
        .route("/leads", get(handle_list_leads))
        .route(
            "/leads/{lead_id}",
            get(handle_get_lead)
                .post(handle_update_lead)
                .delete(handle_delete_lead),
        )
        .route("/leads/{lead_id}/items", post(handle_add_campaign_items))
        .route(
            "/leads/{lead_id}/items/{item_id}",
            delete(handle_remove_campaign_item),
        )
        .route(
            "/leads/{lead_id}/timeline",
            get(handle_get_timeline).post(handle_set_timeline),
        )
        .route(
            "/inquiries",
            post(handle_submit_inquiry).get(handle_list_inquiries),
        )
        .route("/inquiries/{inquiry_id}/review", get(handle_review_inquiry))
        .route(
            "/inquiries/{inquiry_id}/resolve",
            post(handle_resolve_inquiry),
        )
        .with_state(app_state)
}

/// Generates a random alphanumeric secret.
fn generate_secret(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Creates the first super admin when the operator table is empty.
///
/// The generated password is logged once; it is expected to be changed
/// at first login.
async fn bootstrap_admin(app_state: &AppState, login_name: &str) -> Result<(), PersistenceError> {
    let mut persistence = app_state.persistence.lock().await;
    if persistence.count_operators()? > 0 {
        info!(login_name, "Operators already exist; skipping bootstrap");
        return Ok(());
    }

    let password: String = generate_secret(20);
    let email: String = std::env::var("ADMAST_ADMIN_EMAIL")
        .unwrap_or_else(|_| format!("{}@admast.local", login_name.to_lowercase()));
    let operator_id: i64 =
        persistence.create_operator(login_name, login_name, &email, &password, "SUPER_ADMIN")?;
    drop(persistence);

    warn!(
        operator_id,
        login_name,
        password = %password,
        "Bootstrapped the first super admin; log in and change this password now"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing AdMast Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.verify_foreign_key_enforcement()?;

    let signer: TokenSigner = TokenSigner::from_env().unwrap_or_else(|| {
        warn!(
            "ADMAST_TOKEN_SECRET is not set; using an ephemeral secret, \
             review links will not survive a restart"
        );
        TokenSigner::new(&generate_secret(48))
    });

    let inquiry_config: InquiryConfig = InquiryConfig {
        base_url: std::env::var("ADMAST_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", args.host, args.port)),
        fallback_approver: std::env::var("ADMAST_ADMIN_EMAIL").ok(),
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        mailer: Arc::new(Mailer::from_env()),
        signer: Arc::new(signer),
        inquiry_config: Arc::new(inquiry_config),
    };

    if let Some(login_name) = &args.bootstrap_admin {
        bootstrap_admin(&app_state, login_name).await?;
    }

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use admast_domain::InventoryUnit;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const TEST_PASSWORD: &str = "Correct-Horse-42";

    /// Helper to create test app state with in-memory persistence and
    /// mail delivery disabled.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            mailer: Arc::new(Mailer::disabled()),
            signer: Arc::new(TokenSigner::new("test-secret")),
            inquiry_config: Arc::new(InquiryConfig {
                base_url: String::from("https://admast.example"),
                fallback_approver: None,
            }),
        }
    }

    /// Helper to seed an operator directly in the store.
    async fn seed_operator(app_state: &AppState, login: &str, role: &str) {
        let email: String = format!("{}@admast.example", login.to_lowercase());
        app_state
            .persistence
            .lock()
            .await
            .create_operator(login, login, &email, TEST_PASSWORD, role)
            .unwrap();
    }

    /// Helper to seed one inventory unit, returning its ID.
    async fn seed_unit(app_state: &AppState, unit_code: &str) -> i64 {
        let mut unit: InventoryUnit = InventoryUnit::new(
            unit_code,
            String::from("Highway Gantry"),
            String::from("NH-44 near toll plaza"),
            String::from("Punjab"),
            String::from("Ludhiana"),
        );
        unit.discounted_rate = Some(50_000);
        app_state
            .persistence
            .lock()
            .await
            .insert_unit(&unit)
            .unwrap()
    }

    /// Helper to build a request, optionally with a bearer token and a
    /// JSON body.
    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    /// Helper to read a response body as JSON.
    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Helper to log in and return the session token.
    async fn login(app: &Router, login_name: &str) -> String {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/login",
                None,
                Some(json!({"login_name": login_name, "password": TEST_PASSWORD})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        body_json(response).await["session_token"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_login_and_whoami_roundtrip() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "ANITA", "ADMIN").await;
        let app: Router = build_router(app_state);

        let token: String = login(&app, "ANITA").await;

        let response = app
            .oneshot(request("GET", "/whoami", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: Value = body_json(response).await;
        assert_eq!(body["operator"]["login_name"], "ANITA");
        assert_eq!(body["operator"]["role"], "ADMIN");
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "ANITA", "ADMIN").await;
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(request(
                "POST",
                "/login",
                None,
                Some(json!({"login_name": "ANITA", "password": "wrong"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_missing_bearer_token_is_unauthorized() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(request("GET", "/leads", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_quote_lands_in_lead_list() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "ANITA", "ADMIN").await;
        let unit_id: i64 = seed_unit(&app_state, "CHD-001").await;
        let app: Router = build_router(app_state);

        // No Authorization header: quote intake is public
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/quotes",
                None,
                Some(json!({
                    "client_name": "Acme Traders",
                    "email": "buyer@acme.example",
                    "source": "WEBSITE_CART_QUOTE",
                    "unit_ids": [unit_id],
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let lead_id: i64 = body_json(response).await["lead_id"].as_i64().unwrap();

        let token: String = login(&app, "ANITA").await;
        let response = app
            .oneshot(request("GET", "/leads", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: Value = body_json(response).await;
        assert_eq!(body["leads"].as_array().unwrap().len(), 1);
        assert_eq!(body["leads"][0]["lead_id"], lead_id);
        assert_eq!(body["leads"][0]["status"], "NEW");
    }

    #[tokio::test]
    async fn test_sales_cannot_import_units() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "MEENA", "SALES").await;
        let app: Router = build_router(app_state);

        let token: String = login(&app, "MEENA").await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/units/import")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("content-type", "text/csv")
                    .body(Body::from(
                        "unit_code,outlet_name,location_name,state,district\n",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_booking_conflict_returns_409() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "ANITA", "ADMIN").await;
        let unit_id: i64 = seed_unit(&app_state, "CHD-001").await;
        let app: Router = build_router(app_state);

        let mut lead_ids: Vec<i64> = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(request(
                    "POST",
                    "/quotes",
                    None,
                    Some(json!({
                        "client_name": "Acme Traders",
                        "source": "WEBSITE_CART_QUOTE",
                        "unit_ids": [unit_id],
                    })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), HttpStatusCode::OK);
            lead_ids.push(body_json(response).await["lead_id"].as_i64().unwrap());
        }

        let token: String = login(&app, "ANITA").await;
        let book: Value = json!({"status": "PROCESSING"});

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/leads/{}", lead_ids[0]),
                Some(&token),
                Some(book.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(request(
                "POST",
                &format!("/leads/{}", lead_ids[1]),
                Some(&token),
                Some(book),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);

        let body: Value = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("CHD-001"));
    }

    #[tokio::test]
    async fn test_inquiry_review_rejects_bad_token() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "ANITA", "ADMIN").await;
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/inquiries",
                None,
                Some(json!({
                    "client_name": "Acme Traders",
                    "client_email": "buyer@acme.example",
                    "cart": [
                        {"unit_code": "CHD-001", "outlet_name": "Sector 17 Gantry", "rate": 100_000}
                    ],
                    "base_total": 100_000,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let inquiry_id: i64 = body_json(response).await["inquiry_id"].as_i64().unwrap();

        let response = app
            .oneshot(request(
                "GET",
                &format!("/inquiries/{inquiry_id}/review?token=bogus"),
                None,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_lead_is_404() {
        let app_state: AppState = create_test_app_state();
        seed_operator(&app_state, "ANITA", "ADMIN").await;
        let app: Router = build_router(app_state);

        let token: String = login(&app, "ANITA").await;
        let response = app
            .oneshot(request("GET", "/leads/999", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
