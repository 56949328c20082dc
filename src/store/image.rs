use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BlobWriter, ImageStore};
use crate::error::StoreError;

/// Metadata kept for an uploaded image. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub item_id: String,
    pub media_type: String,
    pub location: String,
}

/// Records image metadata in memory and hands the bytes to a [`BlobWriter`].
pub struct BlobImageStore<W> {
    writer: W,
    images: Mutex<HashMap<String, ImageRecord>>,
}

impl<W: BlobWriter> BlobImageStore<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            images: Mutex::new(HashMap::new()),
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn record(&self, id: &str) -> Result<Option<ImageRecord>, StoreError> {
        let images = self
            .images
            .lock()
            .map_err(|_| StoreError::LockPoisoned("image read"))?;
        Ok(images.get(id).cloned())
    }
}

impl<W: BlobWriter> ImageStore for BlobImageStore<W> {
    fn save(&self, item_id: &str, media_type: &str, data: &[u8]) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let location = self.writer.write(&format!("{id}{media_type}"), data)?;

        let mut images = self
            .images
            .lock()
            .map_err(|_| StoreError::LockPoisoned("image write"))?;
        images.insert(
            id.clone(),
            ImageRecord {
                id: id.clone(),
                item_id: item_id.to_string(),
                media_type: media_type.to_string(),
                location,
            },
        );
        Ok(id)
    }
}
