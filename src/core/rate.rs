//! Exchange rate abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub const MIN_DAYS: i64 = 1;
pub const MAX_DAYS: i64 = 10;
pub const DEFAULT_CURRENCIES: [&str; 2] = ["USD", "EUR"];

/// Date format used by the exchange API and in reports.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// One currency row of a day's rate table, rates are in UAH.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub currency: String,
    pub sale_rate: Option<f64>,
    pub purchase_rate: Option<f64>,
}

/// Outcome of fetching a single day.
#[derive(Debug, Clone, PartialEq)]
pub enum DailyRateResult {
    Rates {
        date: NaiveDate,
        rates: Vec<RateEntry>,
    },
    Failed {
        date: NaiveDate,
        error: String,
    },
}

impl DailyRateResult {
    pub fn date(&self) -> NaiveDate {
        match self {
            DailyRateResult::Rates { date, .. } | DailyRateResult::Failed { date, .. } => *date,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DailyRateResult::Failed { .. })
    }
}

/// What an `exchange` command asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequestSpec {
    days: u32,
    currencies: BTreeSet<String>,
}

impl RateRequestSpec {
    /// Clamps `days` into the supported range and upper-cases the codes.
    /// An empty code list falls back to [`DEFAULT_CURRENCIES`].
    pub fn new<I, S>(days: i64, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut codes: BTreeSet<String> = currencies
            .into_iter()
            .map(|c| c.as_ref().trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            codes = DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect();
        }

        Self {
            days: days.clamp(MIN_DAYS, MAX_DAYS) as u32,
            currencies: codes,
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn currencies(&self) -> &BTreeSet<String> {
        &self.currencies
    }

    pub fn wants(&self, currency: &str) -> bool {
        self.currencies.contains(&currency.to_uppercase())
    }
}

/// Source of daily exchange rate tables.
///
/// Implementations never fail: every problem is reported through
/// [`DailyRateResult::Failed`].
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, date: NaiveDate) -> DailyRateResult;
}
