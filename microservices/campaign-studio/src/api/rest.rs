//! Campaign Studio REST API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use brivas_campaign::{
    content_map_to_delivery, content_map_to_display, placeholders, Campaign, CampaignEditor,
    CampaignPatch, CampaignStore, RetryConfig, RetrySettings, TemplateVariable,
};
use brivas_core::{BrivasError, CampaignId};
use brivas_sms::{compose_message, compute_segmentation, SegmentationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::config::StudioConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CampaignStore>,
    pub config: Arc<StudioConfig>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health))
        .route("/ready", get(ready))
        // SMS
        .route("/v1/sms/preview", post(preview_sms))
        // Templates
        .route("/v1/templates/delivery", post(to_delivery))
        .route("/v1/templates/display", post(to_display))
        // Retry
        .route("/v1/retry/validate", post(validate_retry))
        // Campaigns
        .route(
            "/v1/campaigns/{id}",
            get(get_campaign).put(put_campaign).patch(patch_campaign),
        )
        .with_state(state)
}

/// Error body: `{ "error": CODE, "message": text }`
#[derive(Debug)]
pub struct ApiError(pub BrivasError);

impl From<BrivasError> for ApiError {
    fn from(err: BrivasError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(serde_json::json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

async fn health() -> &'static str { "OK" }
async fn ready() -> &'static str { "OK" }

// SMS preview

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default)]
    pub body: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    #[serde(flatten)]
    pub segmentation: SegmentationResult,
    pub editable_limit: usize,
    pub remaining: i64,
    pub fits_single_segment: bool,
    pub composed: String,
    pub variables: Vec<TemplateVariable>,
}

pub(crate) async fn preview_sms(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> ApiResult<PreviewResponse> {
    let body_chars = req.body.chars().count();
    if body_chars > state.config.max_preview_chars {
        return Err(BrivasError::Validation(format!(
            "preview body is {} characters, at most {} accepted",
            body_chars, state.config.max_preview_chars
        ))
        .into());
    }

    let company_name = req
        .company_name
        .unwrap_or_else(|| state.config.default_company_name.clone());
    let segmentation = compute_segmentation(&req.body, &company_name);

    debug!(
        encoding = %segmentation.encoding,
        total_length = segmentation.total_length,
        "SMS preview"
    );

    Ok(Json(PreviewResponse {
        editable_limit: segmentation.editable_limit(),
        remaining: segmentation.remaining(),
        fits_single_segment: segmentation.fits_single_segment(),
        composed: compose_message(&company_name, &req.body),
        variables: placeholders(&req.body),
        segmentation,
    }))
}

// Templates

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content: BTreeMap<String, String>,
}

pub(crate) async fn to_delivery(Json(req): Json<ContentPayload>) -> Json<ContentPayload> {
    Json(ContentPayload {
        content: content_map_to_delivery(&req.content),
    })
}

pub(crate) async fn to_display(Json(req): Json<ContentPayload>) -> Json<ContentPayload> {
    Json(ContentPayload {
        content: content_map_to_display(&req.content),
    })
}

// Retry

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryValidation {
    pub can_save: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<RetrySettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub(crate) async fn validate_retry(Json(config): Json<RetryConfig>) -> Json<RetryValidation> {
    let bounds = config
        .patterns
        .iter()
        .map(|p| p.validate())
        .chain(std::iter::once(config.cooldown.validate()))
        .find_map(|r| r.err());

    if let Some(errors) = bounds {
        return Json(RetryValidation {
            can_save: false,
            settings: None,
            error: Some(errors.to_string()),
        });
    }

    let settings = config.to_settings();
    Json(RetryValidation {
        can_save: settings.is_some(),
        error: settings
            .is_none()
            .then(|| "retry strategy requires at least one pattern or delay".to_string()),
        settings,
    })
}

// Campaigns

pub(crate) async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Campaign> {
    let campaign = state.store.get(&CampaignId::new(id)).await?;
    Ok(Json(campaign))
}

pub(crate) async fn put_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(campaign): Json<Campaign>,
) -> ApiResult<Campaign> {
    if campaign.id.as_str() != id {
        return Err(BrivasError::Validation(format!(
            "campaign id {} does not match path {}",
            campaign.id, id
        ))
        .into());
    }
    campaign.check()?;

    let stored = state.store.put(campaign).await?;
    info!(campaign_id = %stored.id, "Campaign replaced");
    Ok(Json(stored))
}

pub(crate) async fn patch_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CampaignPatch>,
) -> ApiResult<Campaign> {
    let current = state.store.get(&CampaignId::new(id)).await?;
    let mut editor = CampaignEditor::with_pending(current, patch);
    let saved = editor.save(state.store.as_ref()).await?;
    Ok(Json(saved))
}
