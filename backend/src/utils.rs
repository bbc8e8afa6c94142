use crate::error::ApiError;
use uuid::Uuid;

pub fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::InvalidId)
}

pub fn parse_optional_id(id: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    id.map(parse_id).transpose()
}
