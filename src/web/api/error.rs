use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::analysis::AnalysisError;
use crate::elements::ElementError;
use crate::predict::PredictError;
use crate::sampler::SampleError;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Elements(ElementError),
    Sampling(SampleError),
    Analysis(AnalysisError),
    Predict(PredictError),
    Internal(String),
}

impl From<ElementError> for ApiError {
    fn from(e: ElementError) -> Self {
        ApiError::Elements(e)
    }
}

impl From<SampleError> for ApiError {
    fn from(e: SampleError) -> Self {
        match e {
            SampleError::Elements(e) => ApiError::Elements(e),
            _ => ApiError::Sampling(e),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        ApiError::Analysis(e)
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("validation_failed", &msg),
            ),
            ApiError::Elements(e) => {
                let code = match e {
                    ElementError::MissingElementData(_) => "missing_element_data",
                    ElementError::SynthesisUnsupported => "synthesis_unsupported",
                    _ => "invalid_elements",
                };
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_message(code, &e.to_string()),
                )
            }
            ApiError::Sampling(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("invalid_sampling_request", &e.to_string()),
            ),
            ApiError::Analysis(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("invalid_analysis_request", &e.to_string()),
            ),
            ApiError::Predict(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_message("prediction_failed", &e.to_string()),
            ),
            ApiError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_are_bad_requests() {
        let errors = [
            ApiError::Validation("bad".into()),
            ApiError::Elements(ElementError::NotAnObject),
            ApiError::from(SampleError::InvalidStep(0.0)),
            ApiError::Analysis(AnalysisError::InvalidThreshold(-1.0)),
            ApiError::Predict(PredictError::NoData),
        ];
        for e in errors {
            assert_eq!(e.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn element_errors_from_sampler_keep_their_kind() {
        let e = ApiError::from(SampleError::Elements(ElementError::SynthesisUnsupported));
        assert!(matches!(
            e,
            ApiError::Elements(ElementError::SynthesisUnsupported)
        ));
    }

    #[test]
    fn internal_errors_are_server_errors() {
        let response = ApiError::Internal("join failed".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
