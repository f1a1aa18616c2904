//! Caller identity extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use regex::Regex;
use std::future::{Ready, ready};
use std::sync::LazyLock;

use super::error::AppError;

/// Header carrying the caller's user id.
pub const AUTHOR_HEADER: &str = "System-Design-User-Id";

static AUTHOR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9a-f]+$").expect("valid author id pattern"));

/// The calling author, taken from [`AUTHOR_HEADER`].
///
/// Handlers that take this extractor reject requests whose header is missing
/// or not lowercase hex with `401 Unauthorized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if AUTHOR_ID.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::Unauthorized(format!(
                "{AUTHOR_HEADER} must be a lowercase hex string"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for AuthorId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.headers().get(AUTHOR_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::Unauthorized(format!("{AUTHOR_HEADER} is not valid text")))
                .and_then(AuthorId::parse),
            None => Err(AppError::Unauthorized(format!("missing {AUTHOR_HEADER} header"))),
        };

        if let Err(err) = &result {
            tracing::debug!(error = %err, "Rejected caller identity");
        }

        ready(result)
    }
}
