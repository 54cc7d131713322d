// 🌐 REST API - IBAN checks over HTTP (feature = "server")
//
// GET  /api/health
// GET  /api/validate/:iban
// POST /api/validate        {"ibans": ["...", "..."]}

use crate::batch::BatchSummary;
use crate::error::IbanError;
use crate::iban::Iban;
use crate::validator::validate;
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Outcome for a single IBAN
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub valid: bool,
    /// Print format, only when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResponse {
    fn from_outcome(outcome: Result<Iban, IbanError>) -> Self {
        match outcome {
            Ok(iban) => CheckResponse {
                valid: true,
                iban: Some(iban.print_format()),
                country_code: Some(iban.country_code().to_string()),
                reason: None,
                message: None,
            },
            Err(err) => CheckResponse {
                valid: false,
                iban: None,
                country_code: None,
                reason: Some(err.reason_code().to_string()),
                message: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub ibans: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<CheckResponse>,
    pub summary: BatchSummary,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/validate/:iban - Validate one IBAN
///
/// Always 200: an invalid IBAN is still a successful answer.
async fn validate_one(Path(iban): Path<String>) -> impl IntoResponse {
    let response = CheckResponse::from_outcome(validate(&iban));
    log::debug!("validate_one: valid={}", response.valid);

    (StatusCode::OK, Json(ApiResponse::ok(response)))
}

/// POST /api/validate - Validate a list of IBANs
async fn validate_many(Json(request): Json<BatchRequest>) -> impl IntoResponse {
    let mut summary = BatchSummary::default();

    let results: Vec<CheckResponse> = request
        .ibans
        .iter()
        .map(|input| {
            let outcome = validate(input);
            summary.record_outcome(&outcome);
            CheckResponse::from_outcome(outcome)
        })
        .collect();

    log::info!("validate_many: {}", summary.summary());

    (StatusCode::OK, Json(ApiResponse::ok(BatchResponse { results, summary })))
}

/// Build the application router
pub fn router() -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/validate", axum::routing::post(validate_many))
        .route("/validate/:iban", get(validate_one));

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn call(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = call(get_request("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_validate_valid_iban() {
        let (status, json) = call(get_request("/api/validate/RS35265100000071202319")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], true);
        assert_eq!(json["data"]["iban"], "RS35 2651 0000 0071 2023 19");
        assert_eq!(json["data"]["country_code"], "RS");
    }

    #[tokio::test]
    async fn test_validate_percent_encoded_spaces() {
        let (_, json) = call(get_request("/api/validate/CY30%209050%200001%200000%200010%200000%200469")).await;

        assert_eq!(json["data"]["valid"], true);
    }

    #[tokio::test]
    async fn test_validate_invalid_iban() {
        let (status, json) = call(get_request("/api/validate/RS35")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], false);
        assert_eq!(json["data"]["reason"], "too_short");
        assert!(json["data"].get("iban").is_none());
    }

    #[tokio::test]
    async fn test_validate_batch() {
        let body = serde_json::json!({
            "ibans": ["RS35265100000071202319", "RS35265100000071202310", "RS351"]
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/validate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, json) = call(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["results"].as_array().unwrap().len(), 3);
        assert_eq!(json["data"]["results"][1]["reason"], "checksum_mismatch");
        assert_eq!(json["data"]["summary"]["valid_count"], 2);
        assert_eq!(json["data"]["summary"]["invalid_count"], 1);
        assert_eq!(json["data"]["summary"]["total"], 3);
        assert_eq!(json["data"]["summary"]["by_country"]["RS"], 2);
        assert_eq!(json["data"]["summary"]["by_reason"]["checksum_mismatch"], 1);
    }
}
