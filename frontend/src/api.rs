use async_trait::async_trait;
use gloo_net::http::{Method, Request, Response};
use serde::de::DeserializeOwned;
use shared::{
    AdjustCountRequest, Direction, Error, ErrorCode, ErrorResponse, Identity, NewVoteRecord, RemoteVoteService,
    Result, SubjectCount, SubjectKind, SubjectRef, SubjectSummary, UpdateVoteRequest, VoteRecord,
};
use std::rc::Rc;
use uuid::Uuid;
use crate::config::CONFIG;

/// Talks to the vote API on behalf of one viewer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpVoteService {
    token: Option<Rc<str>>,
}

impl HttpVoteService {
    pub fn new(token: Option<Rc<str>>) -> Self {
        Self { token }
    }

    fn authorize(&self, request: Request) -> Request {
        match &self.token {
            Some(token) => request.header("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    pub async fn fetch_subjects(&self, kind: SubjectKind, parent: Option<Uuid>) -> Result<Vec<SubjectSummary>> {
        let url = match parent {
            Some(parent) => format!("{}/subjects/{}?parent={}", CONFIG.api_base_url, kind, parent),
            None => format!("{}/subjects/{}", CONFIG.api_base_url, kind),
        };
        read_json(send(Request::get(&url)).await?).await
    }

    pub async fn fetch_subject(&self, subject: SubjectRef) -> Result<SubjectSummary> {
        let url = format!("{}/subjects/{}/{}/summary", CONFIG.api_base_url, subject.kind, subject.id);
        read_json(send(Request::get(&url)).await?).await
    }
}

async fn send(request: Request) -> Result<Response> {
    let response = request.send().await.map_err(|e| Error::transport(e.to_string()))?;
    if response.ok() {
        return Ok(response);
    }

    let code = ErrorCode::from_status(response.status());
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => code.to_string(),
    };
    Err(Error::new(code, message))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    response.json::<T>().await
        .map_err(|e| Error::with_details(ErrorCode::SystemError, "Unexpected response", e.to_string()))
}

fn with_json<T: serde::Serialize>(request: Request, body: &T) -> Result<Request> {
    request.json(body)
        .map_err(|e| Error::with_details(ErrorCode::InvalidInput, "Could not encode request", e.to_string()))
}

#[async_trait(?Send)]
impl RemoteVoteService for HttpVoteService {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        let request = self.authorize(Request::get(&format!("{}/identity", CONFIG.api_base_url)));
        read_json(send(request).await?).await
    }

    async fn fetch_vote(&self, subject: SubjectRef, voter_id: Uuid) -> Result<Option<VoteRecord>> {
        let url = format!("{}/votes/{}/{}/{}", CONFIG.api_base_url, subject.kind, subject.id, voter_id);
        read_json(send(self.authorize(Request::get(&url))).await?).await
    }

    async fn insert_vote(&self, subject: SubjectRef, record: &NewVoteRecord) -> Result<VoteRecord> {
        let url = format!("{}/votes/{}", CONFIG.api_base_url, subject.kind);
        let request = with_json(self.authorize(Request::post(&url)), record)?;
        read_json(send(request).await?).await
    }

    async fn update_vote(&self, subject: SubjectRef, record_id: Uuid, direction: Direction) -> Result<()> {
        let url = format!("{}/votes/{}/{}", CONFIG.api_base_url, subject.kind, record_id);
        let request = self.authorize(Request::new(&url).method(Method::PATCH));
        send(with_json(request, &UpdateVoteRequest { direction })?).await.map(drop)
    }

    async fn delete_vote(&self, subject: SubjectRef, record_id: Uuid) -> Result<()> {
        let url = format!("{}/votes/{}/{}", CONFIG.api_base_url, subject.kind, record_id);
        send(self.authorize(Request::new(&url).method(Method::DELETE))).await.map(drop)
    }

    async fn adjust_count(&self, subject: SubjectRef, delta: i64) -> Result<()> {
        let url = format!("{}/rpc/adjust-count", CONFIG.api_base_url);
        let body = AdjustCountRequest { kind: subject.kind, subject_id: subject.id, delta };
        send(with_json(self.authorize(Request::post(&url)), &body)?).await.map(drop)
    }

    async fn fetch_count(&self, subject: SubjectRef) -> Result<i64> {
        let url = format!("{}/subjects/{}/{}", CONFIG.api_base_url, subject.kind, subject.id);
        let count: SubjectCount = read_json(send(Request::get(&url)).await?).await?;
        Ok(count.aggregate_count)
    }
}
