//! # Cursor Utilities
//!
//! This module provides utilities for encoding and decoding pagination cursors
//! with validation and size checks.

use crate::error::ApiError;
use axum::http::StatusCode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Keyset cursor position: the creation timestamp plus ID of the last row seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorData {
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Encode cursor data as an opaque base64 string
pub fn encode_cursor(created_at: &DateTime<Utc>, id: &Uuid) -> String {
    let cursor_data = CursorData {
        created_at: *created_at,
        id: *id,
    };
    let json = serde_json::to_string(&cursor_data).unwrap();
    base64::engine::general_purpose::STANDARD.encode(json.as_bytes())
}

/// Decode cursor data from an opaque base64 string with validation
pub fn decode_cursor(cursor: &str) -> Result<CursorData, ApiError> {
    // Check cursor length to prevent extremely large inputs
    if cursor.len() > 1000 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "cursor is too long",
        ));
    }

    if cursor.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "cursor cannot be empty",
        ));
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(cursor)
        .map_err(|_| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "cursor is not valid base64",
            )
        })?;

    if decoded.len() > 500 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "decoded cursor is too large",
        ));
    }

    let json = String::from_utf8(decoded).map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "cursor contains invalid UTF-8 data",
        )
    })?;

    serde_json::from_str(&json).map_err(|_| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            "cursor contains invalid JSON structure",
        )
    })
}
