use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::RatingStore;
use crate::error::StoreError;

/// Running totals for one item. The average is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    pub count: u32,
    pub sum: f64,
}

impl Rating {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

#[derive(Default)]
pub struct InMemoryRatingStore {
    ratings: Mutex<HashMap<String, Rating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStore for InMemoryRatingStore {
    fn add(&self, item_id: &str, score: f64) -> Result<Rating, StoreError> {
        let mut ratings = self
            .ratings
            .lock()
            .map_err(|_| StoreError::LockPoisoned("rating add"))?;

        let rating = ratings.entry(item_id.to_string()).or_default();
        rating.count += 1;
        rating.sum += score;
        Ok(*rating)
    }
}
