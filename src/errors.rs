use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::discount::DiscountRejection;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::NotFound { .. } => AppError::NotFound(message),
            DomainError::Discount(DiscountRejection::NotFound(_)) => AppError::NotFound(message),
            DomainError::Discount(_) => AppError::Unprocessable(message),
            DomainError::InvalidInput(_) => AppError::BadRequest(message),
            DomainError::Conflict(_) | DomainError::InvalidStateTransition(_) => {
                AppError::Conflict(message)
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(detail) => {
                log::error!("Request failed: {}", detail);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound("Order not found: 1".to_string()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_display() {
        assert_eq!(
            AppError::Internal("msg".to_string()).to_string(),
            "Internal error: msg"
        );
    }

    #[actix_web::test]
    async fn internal_error_body_hides_the_detail() {
        let resp = AppError::Internal("password=hunter2".to_string()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn client_error_body_carries_the_message() {
        let resp = AppError::Conflict("Conflict: username 'amy' is taken".to_string())
            .error_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Conflict: username 'amy' is taken");
    }

    #[test]
    fn domain_not_found_maps_to_404() {
        let app_err: AppError = DomainError::not_found("Product", "abc").into();
        assert!(matches!(app_err, AppError::NotFound(msg) if msg == "Product not found: abc"));
    }

    #[test]
    fn unknown_discount_code_maps_to_404() {
        let app_err: AppError = DomainError::from(DiscountRejection::NotFound("X".into())).into();
        assert_eq!(app_err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_discount_rejections_map_to_422() {
        for rejection in [
            DiscountRejection::Inactive,
            DiscountRejection::Expired,
            DiscountRejection::Exhausted,
            DiscountRejection::PerUserLimitExceeded(1),
        ] {
            let app_err: AppError = DomainError::from(rejection).into();
            assert_eq!(app_err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let app_err: AppError = DomainError::InvalidInput("bad value".to_string()).into();
        assert_eq!(app_err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflicts_and_bad_transitions_map_to_409() {
        let conflict: AppError = DomainError::Conflict("dup".to_string()).into();
        let transition: AppError =
            DomainError::InvalidStateTransition("shipped".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(transition.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("oops".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(msg) if msg == "oops"));
    }
}
