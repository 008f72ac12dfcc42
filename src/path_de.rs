//! Payload decoding with JSON-path context in error messages.
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::raw::Raw;

#[derive(Error, Debug)]
#[error("at JSON path {path} → {message}")]
pub struct DecodeError {
    pub path: String,
    pub message: String,
}

pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| DecodeError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| DecodeError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Decode one JSON document into raw payload data.
pub fn raw_from_str(src: &str) -> Result<Raw, DecodeError> { from_str_with_path(src) }

/// Same, from an already parsed document (e.g. after a JSON pointer or jq step).
pub fn raw_from_value(value: serde_json::Value) -> Result<Raw, DecodeError> {
    serde_path_to_error::deserialize::<_, Raw>(value).map_err(|err| DecodeError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}
