//! HTTP routes and handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

use crate::auth::{self, Caller};
use crate::error::AppError;
use crate::models::{
    Business, BusinessPatch, Id, LoginRequest, NewBusiness, NewProduct, NewReview, ProductPatch,
    ReviewPatch, ReviewQuery, SessionResponse,
};
use crate::state::AppState;
use crate::store::BusinessRecord;

type ApiResult<T> = Result<T, AppError>;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);
    let body_limit = RequestBodyLimitLayer::new(state.config.max_body_bytes);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/signup/", post(signup))
        .route("/api/login/", post(login))
        .route("/api/businesses/me/", get(current_business))
        .route("/api/businesses/", get(list_businesses).post(create_business))
        .route(
            "/api/businesses/:id/",
            get(get_business).put(update_business).delete(delete_business),
        )
        .route("/api/products/", get(list_products).post(create_product))
        .route(
            "/api/products/:id/",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/reviews/", get(list_reviews).post(create_review))
        .route(
            "/api/reviews/:id/",
            get(get_review).put(update_review).delete(delete_review),
        )
        .route("/api/admin/reset/", post(reset))
        .fallback(fallback)
        .layer(middleware::from_fn(track_requests))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::counter!(
        "ratesmart_requests_total",
        "method" => method,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    response
}

/// Resolve the caller from the Authorization header
fn caller(state: &AppState, headers: &HeaderMap) -> Caller {
    let Some(token) = auth::extract_bearer_token(headers) else {
        return Caller::Anonymous;
    };
    if auth::is_admin_token(token, &state.config.admin_token) {
        return Caller::Admin;
    }
    match state.store.session_business(token) {
        Some(id) if state.store.business(id).is_ok() => Caller::Business(id),
        _ => Caller::Anonymous,
    }
}

fn require_admin(caller: Caller) -> ApiResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Admin access required"))
    }
}

fn require_authenticated(caller: Caller) -> ApiResult<()> {
    match caller {
        Caller::Anonymous => Err(AppError::unauthorized("Authentication required")),
        _ => Ok(()),
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn fallback() -> AppError {
    AppError::NotFound("Not found".to_string())
}

// --- accounts ---

/// Validate a signup payload, hash the password, and store the business
async fn register(state: &AppState, payload: NewBusiness) -> ApiResult<Business> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let password = payload.password.unwrap_or_default();
    if password.is_empty() {
        return Err(AppError::bad_request("password may not be blank"));
    }

    let record = BusinessRecord {
        name: payload.name.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        phone: payload.phone.unwrap_or_default(),
        country: payload.country.unwrap_or_default(),
        state: payload.state.unwrap_or_default(),
        description: payload.description.unwrap_or_default(),
        hours: payload.hours.unwrap_or_default(),
        password_hash: auth::spawn_hash_password(password).await?,
    };

    Ok(state.store.create_business(record)?)
}

fn open_session(state: &AppState, business: Business) -> SessionResponse {
    let access = auth::new_session_token();
    state.store.insert_session(access.clone(), business.id);
    SessionResponse { access, business }
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<NewBusiness>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let business = register(&state, payload).await?;
    info!(business_id = business.id, "Business signed up");

    Ok((StatusCode::CREATED, Json(open_session(&state, business))))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<SessionResponse>> {
    let Json(payload) = payload?;
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let Some(business) = state.store.business_by_email(&email) else {
        debug!("Login rejected: unknown email");
        return Err(AppError::unauthorized("Invalid credentials"));
    };
    if !auth::spawn_verify_password(password, business.password_hash.clone()).await? {
        debug!(business_id = business.id, "Login rejected: wrong password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    Ok(Json(open_session(&state, business)))
}

async fn current_business(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Business>> {
    let id = caller(&state, &headers)
        .business_id()
        .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

    Ok(Json(state.store.business(id)?))
}

// --- businesses ---

async fn list_businesses(State(state): State<AppState>) -> Json<Vec<Business>> {
    Json(state.store.list_businesses())
}

async fn create_business(
    State(state): State<AppState>,
    payload: Result<Json<NewBusiness>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let business = register(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(business)))
}

async fn get_business(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
) -> ApiResult<Json<Business>> {
    let Path(id) = id?;
    Ok(Json(state.store.business(id)?))
}

async fn update_business(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<BusinessPatch>, JsonRejection>,
) -> ApiResult<Json<Business>> {
    let Path(id) = id?;
    let caller = caller(&state, &headers);
    state.store.business(id)?;
    if !caller.is_admin_or_owner(id) {
        return Err(AppError::forbidden("Permission denied"));
    }

    let Json(patch) = payload?;
    let password_hash = match patch.password.as_deref() {
        Some("") => return Err(AppError::bad_request("password may not be blank")),
        Some(password) => Some(auth::spawn_hash_password(password.to_string()).await?),
        None => None,
    };

    Ok(Json(state.store.update_business(id, patch, password_hash)?))
}

async fn delete_business(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let caller = caller(&state, &headers);
    state.store.business(id)?;
    if !caller.is_admin_or_owner(id) {
        return Err(AppError::forbidden("Permission denied"));
    }

    state.store.delete_business(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- products ---

async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.list_products())
}

async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let product = state.store.create_product(payload)?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    require_authenticated(caller(&state, &headers))?;
    Ok(Json(state.store.product(id)?))
}

async fn update_product(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    require_authenticated(caller(&state, &headers))?;
    let Json(patch) = payload?;

    Ok(Json(state.store.update_product(id, patch)?))
}

async fn delete_product(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    require_authenticated(caller(&state, &headers))?;
    state.store.delete_product(id)?;

    Ok(StatusCode::NO_CONTENT)
}

// --- reviews ---

async fn list_reviews(
    State(state): State<AppState>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    Ok(Json(state.store.list_reviews(query.business_id)))
}

async fn create_review(
    State(state): State<AppState>,
    payload: Result<Json<NewReview>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let review = state.store.create_review(payload)?;
    info!(
        review_id = review.review.id,
        sentiment = review.review.sentiment.as_str(),
        is_fake = review.review.is_fake,
        "Review submitted"
    );

    Ok((StatusCode::CREATED, Json(review)))
}

async fn get_review(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    Ok(Json(state.store.review(id)?))
}

async fn update_review(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
    payload: Result<Json<ReviewPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let caller = caller(&state, &headers);
    let owner = state.store.review_owner(id)?;
    let Json(patch) = payload?;

    let patch = match caller {
        Caller::Admin => patch,
        Caller::Business(business_id) if owner == Some(business_id) => {
            if patch.reply.is_none() {
                return Err(AppError::bad_request("Businesses may only update the reply"));
            }
            patch.reply_only()
        }
        _ => return Err(AppError::forbidden("Permission denied")),
    };

    Ok(Json(state.store.update_review(id, patch)?))
}

async fn delete_review(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    require_admin(caller(&state, &headers))?;
    state.store.delete_review(id)?;

    Ok(StatusCode::NO_CONTENT)
}

// --- admin ---

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<impl IntoResponse> {
    require_admin(caller(&state, &headers))?;
    state.store.reset();
    warn!("All data removed by admin reset");

    Ok(Json(serde_json::json!({ "message": "System reset successfully" })))
}
