//! Pulls the outfit list out of the text model's free-form reply.
//!
//! The model is asked for a bare JSON array but routinely wraps it in prose or
//! markdown fences, so the reply is searched for the widest `[ ... ]` span and
//! only that span is parsed.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::Outfit;

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\s\S]*\]").expect("array pattern compiles"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Failed to parse outfit suggestions")]
    NoArray,
    #[error("Failed to parse outfit suggestions: {0}")]
    InvalidJson(String),
    #[error("Failed to parse outfit suggestions: no outfits returned")]
    Empty,
}

/// Extracts and decodes the outfit array embedded in `text`.
pub fn extract_json_array(text: &str) -> Result<Vec<Outfit>, ParseError> {
    let found = JSON_ARRAY.find(text).ok_or(ParseError::NoArray)?;
    let outfits: Vec<Outfit> = serde_json::from_str(found.as_str())
        .map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    if outfits.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(outfits)
}
