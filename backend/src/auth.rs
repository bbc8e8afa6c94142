use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use shared::{parse_bearer, Identity};

use crate::error::ApiError;
use crate::queries::Queries;
use crate::routes::AppState;

/// The caller resolved from its bearer token.
pub struct Viewer(pub Identity);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Viewer {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(token) = req.headers().get_one("Authorization").and_then(parse_bearer) else {
            return Outcome::Error((Status::Unauthorized, ApiError::Unauthorized));
        };

        let state = match req.guard::<&State<AppState>>().await {
            Outcome::Success(state) => state,
            _ => return Outcome::Error((Status::InternalServerError, ApiError::Internal("app state missing".into()))),
        };

        match Queries::identity_for_token(&state.db, token).await {
            Ok(Some(identity)) => Outcome::Success(Viewer(identity)),
            Ok(None) => Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
            Err(e) => Outcome::Error((e.status(), e)),
        }
    }
}
