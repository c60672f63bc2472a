//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use taxfree_types::{
    AddToCartRequest, AppError, CartFilter, CartItemId, CartListResponse, Category, Country,
    DailyQuery, KeyValueStore, Language, QuoteQuery, RatesResponse, RateTable, SetLanguageRequest,
    Translator, UpdateSettingsRequest,
};

use crate::ShoppingService;

/// Application state shared across handlers.
///
/// One mutation runs at a time.
pub struct AppState<S: KeyValueStore> {
    pub service: Mutex<ShoppingService<S>>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

type AppResult<T> = Result<T, ApiError>;

fn rates_response(table: &RateTable) -> RatesResponse {
    RatesResponse {
        base: table.base().to_string(),
        source: table.source(),
        rates: table.rates().clone(),
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalogs
// ─────────────────────────────────────────────────────────────────────────────

pub async fn countries() -> impl IntoResponse {
    Json(Country::grouped_by_region())
}

pub async fn categories() -> impl IntoResponse {
    Json(Category::all())
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings and rates
// ─────────────────────────────────────────────────────────────────────────────

pub async fn get_settings<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.settings().clone())
}

#[tracing::instrument(skip(state), fields(rate = req.tax_free_rate))]
pub async fn update_settings<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> AppResult<impl IntoResponse> {
    let mut service = state.service.lock().await;
    let settings = service.update_settings(req).await?.clone();
    Ok(Json(settings))
}

pub async fn get_rates<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(rates_response(service.rates()))
}

#[tracing::instrument(skip(state))]
pub async fn refresh_rates<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let mut service = state.service.lock().await;
    Json(rates_response(service.refresh_rates().await))
}

/// Price quote for the `price` query parameter.
pub async fn quote<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<impl IntoResponse> {
    let service = state.service.lock().await;
    Ok(Json(service.quote_input(&query.price)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cart
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_cart<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(filter): Query<CartFilter>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    let items = service.filter_items(&filter);
    Json(CartListResponse { filter, items })
}

#[tracing::instrument(skip(state), fields(price = req.price))]
pub async fn add_to_cart<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<AddToCartRequest>,
) -> AppResult<impl IntoResponse> {
    let mut service = state.service.lock().await;
    let item = service
        .add_to_cart(req.price, req.category.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[tracing::instrument(skip(state), fields(item_id = %id))]
pub async fn remove_item<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let mut service = state.service.lock().await;
    let removed = service.remove_item(&CartItemId::from(id)).await?;
    Ok(Json(removed))
}

#[tracing::instrument(skip(state))]
pub async fn clear_cart<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
) -> AppResult<impl IntoResponse> {
    let mut service = state.service.lock().await;
    let removed = service.clear_cart().await?;
    Ok(Json(serde_json::json!({ "removed": removed })))
}

pub async fn cart_totals<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.totals())
}

pub async fn cart_categories<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
) -> impl IntoResponse {
    let service = state.service.lock().await;
    Json(service.by_category())
}

pub async fn daily_totals<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<DailyQuery>,
) -> AppResult<impl IntoResponse> {
    let service = state.service.lock().await;
    Ok(Json(service.daily_totals(query.days)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────────────────────────────────────

/// Translates a dotted key. Unknown keys echo back unchanged.
pub async fn translate(Path((lang, key)): Path<(String, String)>) -> AppResult<impl IntoResponse> {
    let language: Language = lang.parse().map_err(AppError::from)?;
    let text = Translator::new(language).t(&key).to_string();
    Ok(Json(serde_json::json!({
        "language": language,
        "key": key,
        "text": text
    })))
}

#[tracing::instrument(skip(state))]
pub async fn set_language<S: KeyValueStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SetLanguageRequest>,
) -> AppResult<impl IntoResponse> {
    let mut service = state.service.lock().await;
    let language = service.set_language(req.language).await?;
    Ok(Json(serde_json::json!({ "language": language })))
}
