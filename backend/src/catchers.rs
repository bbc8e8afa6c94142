use rocket::{Request, catch, serde::json::Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorMessage {
    error: String,
    status: u16,
}

fn message(error: &str, status: u16) -> Json<ErrorMessage> {
    Json(ErrorMessage { error: error.into(), status })
}

#[catch(401)]
pub fn unauthorized(_req: &Request) -> Json<ErrorMessage> {
    message("Please sign in to continue.", 401)
}

#[catch(403)]
pub fn forbidden(req: &Request) -> Json<ErrorMessage> {
    let error_msg = match req.uri().path().segments().nth(1) {
        Some("votes") => "You can only change your own votes.",
        _ => "Access forbidden.",
    };
    message(error_msg, 403)
}

#[catch(409)]
pub fn conflict(_req: &Request) -> Json<ErrorMessage> {
    message("You have already voted on this item.", 409)
}

#[catch(422)]
pub fn unprocessable(_req: &Request) -> Json<ErrorMessage> {
    message("The request body could not be understood.", 422)
}

#[catch(429)]
pub fn too_many_requests(_req: &Request) -> Json<ErrorMessage> {
    message("Rate limit exceeded. Please wait before trying again.", 429)
}

#[catch(400)]
pub fn bad_request(_req: &Request) -> Json<ErrorMessage> {
    message("Invalid request parameters.", 400)
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> Json<ErrorMessage> {
    message("An internal server error occurred.", 500)
}

#[catch(404)]
pub fn not_found(_req: &Request) -> Json<ErrorMessage> {
    message("The requested resource was not found.", 404)
}
