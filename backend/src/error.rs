use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use shared::ErrorResponse;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    #[error("Invalid ID")]
    InvalidId,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Please sign in")]
    Unauthorized,
    #[error("Not allowed")]
    Forbidden,
    #[error("Already voted")]
    Conflict,
    #[error("{0}")]
    RateLimited(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::NotFound => Status::NotFound,
            ApiError::InvalidId => Status::BadRequest,
            ApiError::InvalidInput(_) => Status::BadRequest,
            ApiError::Unauthorized => Status::Unauthorized,
            ApiError::Forbidden => Status::Forbidden,
            ApiError::Conflict => Status::Conflict,
            ApiError::RateLimited(_) => Status::TooManyRequests,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::Conflict,
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => ApiError::NotFound,
            _ => {
                error!("Database error: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<shared::ValidationError> for ApiError {
    fn from(e: shared::ValidationError) -> Self {
        match e {
            shared::ValidationError::VoterMismatch => ApiError::Forbidden,
            other => ApiError::InvalidInput(other.to_string()),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ApiError {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        rocket::Response::build_from(Json(ErrorResponse { error: message }).respond_to(req)?)
            .status(status)
            .ok()
    }
}
