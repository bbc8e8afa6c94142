use rocket::request::FromParam;

use crate::models::{SubjectKind, UnknownSubjectKind};

impl<'a> FromParam<'a> for SubjectKind {
    type Error = UnknownSubjectKind;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}
