//! `POST /api/detect-fake-news` and `GET /health`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use truthline::models::AnalysisResult;
use truthline::pipeline::{LanguageModel, OpenAiModel, Pipeline, SearchBackend};
use truthline::{ConfigError, PipelineError, Settings};

const GENERIC_FAILURE: &str = "Failed to analyze text. Please try again.";
const TEXT_REQUIRED: &str = "Text is required";

/// Builds the language model for one request's chosen variant.
pub trait ModelProvider: Send + Sync {
    fn model(&self, name: &str) -> Result<Arc<dyn LanguageModel>, ConfigError>;
}

pub struct OpenAiProvider {
    api_key: Option<String>,
    api_base: Option<String>,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.clone(),
            timeout: settings.llm_timeout,
        }
    }
}

impl ModelProvider for OpenAiProvider {
    fn model(&self, name: &str) -> Result<Arc<dyn LanguageModel>, ConfigError> {
        let key = self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)?;
        Ok(Arc::new(OpenAiModel::new(
            key,
            name,
            self.api_base.as_deref(),
            self.timeout,
        )))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub default_model: String,
    pub verify_concurrency: usize,
    pub models: Arc<dyn ModelProvider>,
    pub search: Arc<dyn SearchBackend>,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub raw_analysis: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        tracing::error!(error = %err, "service misconfigured");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

/// Body problems answer with the JSON error shape too. A well-formed body
/// whose `text` has the wrong type is a missing text; anything unreadable gets
/// the generic failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "rejected request body");
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::new(StatusCode::BAD_REQUEST, TEXT_REQUIRED),
            _ => ApiError::new(StatusCode::BAD_REQUEST, GENERIC_FAILURE),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyInput => ApiError::new(StatusCode::BAD_REQUEST, TEXT_REQUIRED),
            other => {
                tracing::error!(error = %other, "error in fake news detection");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/detect-fake-news", post(detect_fake_news))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn detect_fake_news(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let Json(req) = payload?;
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, TEXT_REQUIRED))?;

    let model_name = req.model.unwrap_or_else(|| state.default_model.clone());
    let model = state.models.model(&model_name)?;

    let pipeline = Pipeline::new(model, Arc::clone(&state.search))
        .with_verify_concurrency(state.verify_concurrency);
    let report = pipeline.run_report(&text).await?;

    Ok(Json(DetectResponse {
        success: true,
        analysis: report.analysis,
        raw_analysis: report.raw_analysis,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;
    use truthline::pipeline::{FailingSearch, ScriptedModel, StaticSearch};

    const REPLY: &str = "VERDICT: FAKE NEWS\nCONFIDENCE: 91%\nEXPLANATION: No such event.\nKEY ANALYSIS POINTS:\n• Invented quote";

    /// Hands out one shared scripted model and records which variant was asked for.
    struct FixedProvider {
        model: Option<Arc<ScriptedModel>>,
        requested: Mutex<Vec<String>>,
    }

    impl FixedProvider {
        fn new(model: Option<Arc<ScriptedModel>>) -> Arc<Self> {
            Arc::new(Self {
                model,
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    impl ModelProvider for FixedProvider {
        fn model(&self, name: &str) -> Result<Arc<dyn LanguageModel>, ConfigError> {
            self.requested.lock().unwrap().push(name.to_string());
            let model: Arc<dyn LanguageModel> =
                self.model.clone().ok_or(ConfigError::MissingApiKey)?;
            Ok(model)
        }
    }

    fn app(provider: Arc<FixedProvider>, search: Arc<dyn SearchBackend>) -> Router {
        router(AppState {
            default_model: "gpt-4o".to_string(),
            verify_concurrency: 1,
            models: provider,
            search,
        })
    }

    async fn post_json(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        post_raw(app, Some("application/json"), body.to_string()).await
    }

    async fn post_raw(
        app: Router,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method("POST").uri("/api/detect-fake-news");
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        let request = request.body(Body::from(body)).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn successful_analysis_has_wire_shape() {
        let model = Arc::new(ScriptedModel::new(REPLY));
        let provider = FixedProvider::new(Some(model));
        let search = Arc::new(StaticSearch::new(["snopes.com"]));

        let (status, body) = post_json(
            app(provider.clone(), search),
            serde_json::json!({ "text": "The president banned Mondays.", "model": "gpt-4o-mini" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["analysis"]["verdict"], "FAKE NEWS");
        assert_eq!(body["analysis"]["confidence"], 91);
        assert_eq!(body["analysis"]["keyPoints"][0], "Invented quote");
        assert_eq!(body["analysis"]["sources"][0], "snopes.com");
        assert_eq!(body["rawAnalysis"], REPLY);
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'), "{timestamp}");
        assert_eq!(timestamp.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert_eq!(*provider.requested.lock().unwrap(), vec!["gpt-4o-mini".to_string()]);
    }

    #[tokio::test]
    async fn default_model_used_when_not_given() {
        let provider = FixedProvider::new(Some(Arc::new(ScriptedModel::new(REPLY))));
        let (status, _) = post_json(
            app(provider.clone(), Arc::new(FailingSearch::default())),
            serde_json::json!({ "text": "hello" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(*provider.requested.lock().unwrap(), vec!["gpt-4o".to_string()]);
    }

    #[tokio::test]
    async fn blank_text_is_a_bad_request() {
        let model = Arc::new(ScriptedModel::new(REPLY));
        let provider = FixedProvider::new(Some(model.clone()));
        for body in [serde_json::json!({ "text": "  " }), serde_json::json!({})] {
            let (status, json) =
                post_json(app(provider.clone(), Arc::new(FailingSearch::default())), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"], "Text is required");
        }
        assert_eq!(model.calls(), 0);
        assert!(provider.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_bodies_get_json_errors() {
        let model = Arc::new(ScriptedModel::new(REPLY));
        let provider = FixedProvider::new(Some(model.clone()));
        let cases = [
            (Some("application/json"), "{not json", GENERIC_FAILURE),
            (Some("application/json"), r#"{"text":123}"#, TEXT_REQUIRED),
            (None, r#"{"text":"hello"}"#, GENERIC_FAILURE),
            (Some("text/plain"), r#"{"text":"hello"}"#, GENERIC_FAILURE),
        ];
        for (content_type, body, message) in cases {
            let (status, json) = post_raw(
                app(provider.clone(), Arc::new(FailingSearch::default())),
                content_type,
                body.to_string(),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["error"], message, "{body}");
        }
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_is_a_server_error() {
        let provider = FixedProvider::new(None);
        let (status, json) = post_json(
            app(provider, Arc::new(FailingSearch::default())),
            serde_json::json!({ "text": "some claim" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "API key not found in environment variables");
    }

    #[tokio::test]
    async fn model_failure_is_generic() {
        let provider = FixedProvider::new(Some(Arc::new(ScriptedModel::failing())));
        let (status, json) = post_json(
            app(provider, Arc::new(FailingSearch::default())),
            serde_json::json!({ "text": "some claim" }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], GENERIC_FAILURE);
        assert!(json.get("analysis").is_none());
    }

    #[tokio::test]
    async fn health_is_ok() {
        let provider = FixedProvider::new(None);
        let response = app(provider, Arc::new(FailingSearch::default()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
