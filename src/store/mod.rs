//! Storage seams for the catalog service.
//!
//! Each trait has one in-memory implementation guarded by its own lock. The
//! catalog and rating locks are independent, so rating traffic never waits on
//! a catalog scan.

mod blob;
mod catalog;
mod image;
mod rating;
mod user;

pub use blob::{BlobWriter, DirectoryBlobWriter, MemoryBlobWriter};
pub use catalog::{assign_id, InMemoryCatalogStore};
pub use image::{BlobImageStore, ImageRecord};
pub use rating::{InMemoryRatingStore, Rating};
pub use user::{InMemoryUserStore, User};

use crate::context::CallContext;
use crate::error::StoreError;
use crate::model::{Filter, Item};

/// Keyed item storage with copy-in/copy-out semantics.
pub trait CatalogStore: Send + Sync {
    /// Store a copy of `item`, assigning a fresh UUID when its id is empty.
    /// Returns the id the item was stored under.
    fn save(&self, item: &Item) -> Result<String, StoreError>;

    /// A copy of the stored item, or `None` when the id is unknown.
    fn find(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Visit a copy of every item matching `filter`.
    ///
    /// `ctx` is checked before each candidate. An error from `on_match` stops
    /// the scan and is returned unchanged.
    fn search<F, E>(&self, ctx: &CallContext, filter: &Filter, on_match: F) -> Result<(), E>
    where
        F: FnMut(Item) -> Result<(), E>,
        E: From<StoreError>;
}

pub trait RatingStore: Send + Sync {
    /// Fold `score` into the item's running totals and return them.
    fn add(&self, item_id: &str, score: f64) -> Result<Rating, StoreError>;
}

pub trait ImageStore: Send + Sync {
    /// Persist `data` for `item_id` and return the generated image id.
    fn save(&self, item_id: &str, media_type: &str, data: &[u8]) -> Result<String, StoreError>;
}

pub trait UserStore: Send + Sync {
    fn save(&self, user: &User) -> Result<(), StoreError>;
    fn find(&self, username: &str) -> Result<Option<User>, StoreError>;
}
