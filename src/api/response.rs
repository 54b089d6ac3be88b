use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::CommandError;

pub const UNEXPECTED_FAULT: &str = "An unexpected fault happened. Try again later.";

/// Envelope returned by every command endpoint. Failures carry the default
/// value of `T`, the nil uuid for command results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage<T> {
    pub successful: bool,
    pub message: String,
    pub data: T,
}

impl<T: Default> ResponseMessage<T> {
    pub fn success(data: T) -> Self {
        Self {
            successful: true,
            message: String::new(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            successful: false,
            message: message.into(),
            data: T::default(),
        }
    }
}

/// Business outcomes are 200s; anything else is logged and hidden
pub fn command_response(command: &str, result: Result<Uuid, CommandError>) -> HttpResponse {
    match result {
        Ok(id) => HttpResponse::Ok().json(ResponseMessage::success(id)),
        Err(e) if e.is_business() => HttpResponse::Ok().json(ResponseMessage::<Uuid>::failure(e.to_string())),
        Err(e) => {
            tracing::error!(command = command, error = %e, "Command failed with an infrastructure error");
            internal_error()
        }
    }
}

pub fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ResponseMessage::<Uuid>::failure(UNEXPECTED_FAULT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistenceError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn body_of(resp: HttpResponse) -> ResponseMessage<Uuid> {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn test_success_envelope() {
        let id = Uuid::new_v4();
        let resp = command_response("enroll_student", Ok(id));

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, ResponseMessage { successful: true, message: String::new(), data: id });
    }

    #[actix_web::test]
    async fn test_business_failure_envelope() {
        let resp = command_response("enroll_student", Err(CommandError::not_found("Course doesn't exist.")));

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_of(resp).await;
        assert!(!body.successful);
        assert_eq!(body.message, "Course doesn't exist.");
        assert_eq!(body.data, Uuid::nil());
    }

    #[actix_web::test]
    async fn test_infrastructure_failure_is_hidden() {
        let err = CommandError::from(PersistenceError::Unavailable("connection refused".to_string()));
        let resp = command_response("enroll_student", Err(err));

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert_eq!(body.message, UNEXPECTED_FAULT);
        assert!(!body.message.contains("connection refused"));
        assert_eq!(body.data, Uuid::nil());
    }

    #[test]
    fn test_failure_serializes_nil_uuid() {
        let json = serde_json::to_value(ResponseMessage::<Uuid>::failure("nope")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "successful": false,
                "message": "nope",
                "data": "00000000-0000-0000-0000-000000000000"
            })
        );
    }
}
