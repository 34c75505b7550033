//! Root redirect and place-id validation.
//!
//! Every path gets exactly one of three answers:
//!
//! ```text
//! /                   → 302 <index path>
//! /<place-id>         → 302 <place base>/place/<place-id>
//! /<anything else>    → 400 not a valid place id
//! /<a>/<b>[/...]      → 400 too many components
//! ```

use axum::http::StatusCode;
use futures_util::FutureExt;

use crate::event::{EdgeRequest, EdgeResponse, Outcome};
use crate::routing::{HandlerFuture, RequestHandler};

/// Number of hyphen-separated words in a place id.
const PLACE_ID_WORDS: usize = 3;

/// Why a segment is not a place id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPlaceId {
    WordCount(usize),
    EmptyWord,
    NonLetter,
}

/// Result of checking a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceIdCheck<'a> {
    Valid(&'a str),
    Invalid(InvalidPlaceId),
}

/// `word-word-word`, letters only, any case.
pub fn check_place_id(segment: &str) -> PlaceIdCheck<'_> {
    let words: Vec<&str> = segment.split('-').collect();
    if words.len() != PLACE_ID_WORDS {
        return PlaceIdCheck::Invalid(InvalidPlaceId::WordCount(words.len()));
    }
    if words.iter().any(|w| w.is_empty()) {
        return PlaceIdCheck::Invalid(InvalidPlaceId::EmptyWord);
    }
    if !words.iter().all(|w| w.bytes().all(|b| b.is_ascii_alphabetic())) {
        return PlaceIdCheck::Invalid(InvalidPlaceId::NonLetter);
    }
    PlaceIdCheck::Valid(segment)
}

#[derive(Debug, Clone)]
pub struct RootRedirect {
    index_path: String,
    place_base: String,
}

impl RootRedirect {
    pub fn new(index_path: impl Into<String>, place_base: impl Into<String>) -> Self {
        Self {
            index_path: index_path.into(),
            place_base: place_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn respond(&self, path: &str) -> EdgeResponse {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => EdgeResponse::redirect(&self.index_path),
            [segment] => match check_place_id(segment) {
                PlaceIdCheck::Valid(id) => {
                    EdgeResponse::redirect(&format!("{}/place/{}", self.place_base, id))
                }
                PlaceIdCheck::Invalid(reason) => {
                    tracing::debug!(segment = %segment, reason = ?reason, "Rejected place id");
                    EdgeResponse::json_error(
                        StatusCode::BAD_REQUEST,
                        format!("invalid path: '{}' is not a valid place id", segment),
                    )
                }
            },
            _ => EdgeResponse::json_error(StatusCode::BAD_REQUEST, "invalid path: too many components"),
        }
    }
}

impl RequestHandler for RootRedirect {
    fn handle(&self, request: EdgeRequest) -> HandlerFuture<'_> {
        let response = self.respond(request.path());
        async move { Outcome::Respond(response) }.boxed()
    }
}
