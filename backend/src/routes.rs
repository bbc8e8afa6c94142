use rocket::{State, get, post, patch, delete, http::Status, serde::json::Json};
use tracing::{debug, info, instrument};
use sqlx::PgPool;
use shared::{
    validate_adjustment, validate_new_vote, AdjustCountRequest, Identity, NewVoteRecord, SubjectCount, SubjectKind,
    SubjectSummary, UpdateVoteRequest, VoteRecord,
};
use crate::{
    auth::Viewer,
    config::Settings,
    error::ApiError,
    queries::Queries,
    rate_limiter::RateLimiter,
    utils::{parse_id, parse_optional_id},
};

pub struct AppState {
    pub vote_limiter: RateLimiter,
    pub settings: Settings,
    pub db: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        Self {
            vote_limiter: RateLimiter::new(settings.vote_rate_limit, settings.vote_rate_window_seconds),
            settings,
            db: pool,
        }
    }

    pub fn check_vote_rate(&self, identity: &Identity) -> Result<(), ApiError> {
        self.vote_limiter.check(&format!("vote:{}", identity.user_id))
    }

    /// Count adjustments get their own budget so a click's record write and
    /// its adjustment do not share one.
    pub fn check_adjust_rate(&self, identity: &Identity) -> Result<(), ApiError> {
        self.vote_limiter.check(&format!("adjust:{}", identity.user_id))
    }
}

#[get("/identity")]
pub async fn current_identity(viewer: Option<Viewer>) -> Json<Option<Identity>> {
    Json(viewer.map(|Viewer(identity)| identity))
}

#[get("/subjects/<kind>?<parent>")]
pub async fn list_subjects(
    state: &State<AppState>,
    kind: SubjectKind,
    parent: Option<&str>,
) -> Result<Json<Vec<SubjectSummary>>, ApiError> {
    let parent = parse_optional_id(parent)?;
    Queries::list_subjects(&state.db, kind, parent).await.map(Json)
}

#[get("/subjects/<kind>/<id>")]
pub async fn subject_count(state: &State<AppState>, kind: SubjectKind, id: &str) -> Result<Json<SubjectCount>, ApiError> {
    let id = parse_id(id)?;
    Queries::subject_count(&state.db, kind, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[get("/subjects/<kind>/<id>/summary")]
pub async fn subject_summary(
    state: &State<AppState>,
    kind: SubjectKind,
    id: &str,
) -> Result<Json<SubjectSummary>, ApiError> {
    let id = parse_id(id)?;
    Queries::subject_summary(&state.db, kind, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[get("/votes/<kind>/<subject_id>/<voter_id>")]
pub async fn fetch_vote(
    state: &State<AppState>,
    viewer: Viewer,
    kind: SubjectKind,
    subject_id: &str,
    voter_id: &str,
) -> Result<Json<Option<VoteRecord>>, ApiError> {
    let (subject_id, voter_id) = (parse_id(subject_id)?, parse_id(voter_id)?);
    if voter_id != viewer.0.user_id {
        return Err(ApiError::Forbidden);
    }
    Queries::fetch_vote(&state.db, kind, subject_id, voter_id).await.map(Json)
}

#[instrument(skip(state, viewer, record))]
#[post("/votes/<kind>", format = "json", data = "<record>")]
pub async fn insert_vote(
    state: &State<AppState>,
    viewer: Viewer,
    kind: SubjectKind,
    record: Json<NewVoteRecord>,
) -> Result<Json<VoteRecord>, ApiError> {
    let record = record.into_inner();
    validate_new_vote(&record, &viewer.0)?;
    state.check_vote_rate(&viewer.0)?;

    let created = Queries::insert_vote(&state.db, kind, &record).await?;
    debug!("Inserted vote {} on {}", created.id, record.subject_id);
    Ok(Json(created))
}

#[instrument(skip(state, viewer, request))]
#[patch("/votes/<kind>/<record_id>", format = "json", data = "<request>")]
pub async fn update_vote(
    state: &State<AppState>,
    viewer: Viewer,
    kind: SubjectKind,
    record_id: &str,
    request: Json<UpdateVoteRequest>,
) -> Result<Status, ApiError> {
    let record_id = parse_id(record_id)?;
    state.check_vote_rate(&viewer.0)?;

    if Queries::update_vote(&state.db, kind, record_id, viewer.0.user_id, request.direction).await? {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::NotFound)
    }
}

#[instrument(skip(state, viewer))]
#[delete("/votes/<kind>/<record_id>")]
pub async fn delete_vote(
    state: &State<AppState>,
    viewer: Viewer,
    kind: SubjectKind,
    record_id: &str,
) -> Result<Status, ApiError> {
    let record_id = parse_id(record_id)?;
    state.check_vote_rate(&viewer.0)?;

    if Queries::delete_vote(&state.db, kind, record_id, viewer.0.user_id).await? {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::NotFound)
    }
}

#[instrument(skip(state, viewer, request))]
#[post("/rpc/adjust-count", format = "json", data = "<request>")]
pub async fn adjust_count(
    state: &State<AppState>,
    viewer: Viewer,
    request: Json<AdjustCountRequest>,
) -> Result<Json<SubjectCount>, ApiError> {
    let request = request.into_inner();
    validate_adjustment(&request)?;
    state.check_adjust_rate(&viewer.0)?;

    let count = Queries::adjust_count(&state.db, request.kind, request.subject_id, request.delta)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(
        "{} adjusted {}:{} by {} -> {}",
        viewer.0.user_id, request.kind, request.subject_id, request.delta, count.aggregate_count
    );
    Ok(Json(count))
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
