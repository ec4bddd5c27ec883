//! # Actor Extraction
//!
//! The caller's identity is the raw value of the `Authorization` header. No
//! verification happens here; the scheduling service rejects requests whose
//! actor id is empty.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;

/// Identity of the caller, taken verbatim from the `Authorization` header.
///
/// Missing or non-UTF-8 headers yield an empty actor id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .unwrap_or_default();

        Ok(ActorId(actor))
    }
}
