use crate::core::rate::RateEntry;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Rate tables of past days, shared between fetches.
///
/// Only successful tables go in here; a past day's rates do not change once
/// published.
#[derive(Clone, Default)]
pub struct RateCache {
    days: Arc<Mutex<HashMap<NaiveDate, Vec<RateEntry>>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, date: NaiveDate) -> Option<Vec<RateEntry>> {
        let days = self.days.lock().await;
        let rates = days.get(&date).cloned();
        if rates.is_some() {
            debug!(%date, "Rate cache HIT");
        } else {
            debug!(%date, "Rate cache MISS");
        }
        rates
    }

    pub async fn put(&self, date: NaiveDate, rates: Vec<RateEntry>) {
        debug!(%date, entries = rates.len(), "Rate cache PUT");
        self.days.lock().await.insert(date, rates);
    }

    pub async fn len(&self) -> usize {
        self.days.lock().await.len()
    }
}
