//! Write an item to disk and read it back, as pretty JSON or protobuf bytes.

use std::path::Path;

use prost::Message;
use thiserror::Error;

use crate::grpc::messages;
use crate::model::Item;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot convert item to/from json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot decode binary item: {0}")]
    Decode(#[from] prost::DecodeError),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> DumpError + '_ {
    move |source| DumpError::Io {
        path: path.display().to_string(),
        source,
    }
}

pub fn write_json_file(item: &Item, path: &Path) -> Result<(), DumpError> {
    let json = serde_json::to_string_pretty(item)?;
    std::fs::write(path, json).map_err(io_error(path))
}

pub fn read_json_file(path: &Path) -> Result<Item, DumpError> {
    let json = std::fs::read_to_string(path).map_err(io_error(path))?;
    Ok(serde_json::from_str(&json)?)
}

/// Protobuf wire encoding of the `catalog.v1.Item` message.
pub fn write_binary_file(item: &Item, path: &Path) -> Result<(), DumpError> {
    let bytes = messages::Item::from(item.clone()).encode_to_vec();
    std::fs::write(path, bytes).map_err(io_error(path))
}

pub fn read_binary_file(path: &Path) -> Result<Item, DumpError> {
    let bytes = std::fs::read(path).map_err(io_error(path))?;
    Ok(messages::Item::decode(bytes.as_slice())?.into())
}
