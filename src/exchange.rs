//! Multi-day exchange rate reports.

use crate::core::rate::{DailyRateResult, RateProvider, RateRequestSpec, format_date};
use chrono::{Duration, Local, NaiveDate};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error};

/// Fetches a range of days in parallel and renders them as one report.
#[derive(Clone)]
pub struct RateAggregator {
    provider: Arc<dyn RateProvider>,
}

impl RateAggregator {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    /// Report for the days before today, most recent first.
    pub async fn aggregate(&self, spec: &RateRequestSpec) -> String {
        self.aggregate_from(spec, Local::now().date_naive()).await
    }

    pub async fn aggregate_from(&self, spec: &RateRequestSpec, today: NaiveDate) -> String {
        let results = self.fetch_days(spec.days(), today).await;
        render_report(&results, spec)
    }

    /// One result per offset `1..=days`, in offset order whatever order the
    /// fetches finish in.
    pub async fn fetch_days(&self, days: u32, today: NaiveDate) -> Vec<DailyRateResult> {
        let dates: Vec<NaiveDate> = (1..=days)
            .map(|offset| today - Duration::days(i64::from(offset)))
            .collect();
        debug!(days, "Fetching exchange rates");

        let tasks = dates.iter().map(|&date| {
            let provider = Arc::clone(&self.provider);
            tokio::spawn(async move { provider.fetch_rates(date).await })
        });

        join_all(tasks)
            .await
            .into_iter()
            .zip(dates)
            .map(|(joined, date)| {
                joined.unwrap_or_else(|e| {
                    error!(%date, error = %e, "Rate fetch task did not complete");
                    DailyRateResult::Failed {
                        date,
                        error: format!("Failed to fetch data: {e}"),
                    }
                })
            })
            .collect()
    }
}

/// Renders day blocks separated by a blank line.
pub fn render_report(results: &[DailyRateResult], spec: &RateRequestSpec) -> String {
    results
        .iter()
        .map(|result| render_day(result, spec))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_day(result: &DailyRateResult, spec: &RateRequestSpec) -> String {
    match result {
        DailyRateResult::Failed { date, error } => format!("{}: {}", format_date(*date), error),
        DailyRateResult::Rates { date, rates } => {
            let mut lines = vec![format!("{}:", format_date(*date))];
            // Requested codes missing from the day's table are left out.
            lines.extend(rates.iter().filter(|r| spec.wants(&r.currency)).map(|r| {
                format!(
                    "{} - Продаж: {} грн, Купівля: {} грн",
                    r.currency,
                    format_rate(r.sale_rate),
                    format_rate(r.purchase_rate)
                )
            }));
            lines.join("\n")
        }
    }
}

// Debug keeps the fractional part of whole rates ("37.0", not "37").
fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| "-".to_string(), |r| format!("{r:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate::RateEntry;
    use async_trait::async_trait;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn entry(currency: &str, sale: f64, purchase: f64) -> RateEntry {
        RateEntry {
            currency: currency.to_string(),
            sale_rate: Some(sale),
            purchase_rate: Some(purchase),
        }
    }

    /// Answers every day with the same table; the closest day is the slowest.
    struct FakeProvider {
        failing: HashSet<NaiveDate>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                failing: HashSet::new(),
            }
        }

        fn failing_on(date: NaiveDate) -> Self {
            Self {
                failing: HashSet::from([date]),
            }
        }
    }

    #[async_trait]
    impl RateProvider for FakeProvider {
        async fn fetch_rates(&self, date: NaiveDate) -> DailyRateResult {
            let offset = (today() - date).num_days() as u64;
            tokio::time::sleep(std::time::Duration::from_millis(20 * (5 - offset.min(4)))).await;

            if self.failing.contains(&date) {
                return DailyRateResult::Failed {
                    date,
                    error: "API request failed with status: 500".to_string(),
                };
            }
            DailyRateResult::Rates {
                date,
                rates: vec![
                    entry("EUR", 44.45, 43.6),
                    entry("PLN", 10.3, 10.0),
                    entry("USD", 41.75, 41.2),
                ],
            }
        }
    }

    fn aggregator(provider: FakeProvider) -> RateAggregator {
        RateAggregator::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_days_keep_offset_order() {
        let results = aggregator(FakeProvider::new())
            .fetch_days(3, today())
            .await;

        let dates: Vec<String> = results.iter().map(|r| format_date(r.date())).collect();
        assert_eq!(dates, vec!["09.03.2024", "08.03.2024", "07.03.2024"]);
    }

    #[tokio::test]
    async fn test_report_format() {
        let spec = RateRequestSpec::new(2, ["usd", "eur"]);
        let report = aggregator(FakeProvider::new())
            .aggregate_from(&spec, today())
            .await;

        assert_eq!(
            report,
            "09.03.2024:\n\
             EUR - Продаж: 44.45 грн, Купівля: 43.6 грн\n\
             USD - Продаж: 41.75 грн, Купівля: 41.2 грн\n\
             \n\
             08.03.2024:\n\
             EUR - Продаж: 44.45 грн, Купівля: 43.6 грн\n\
             USD - Продаж: 41.75 грн, Купівля: 41.2 грн"
        );
    }

    #[tokio::test]
    async fn test_absent_currency_is_silently_omitted() {
        let spec = RateRequestSpec::new(1, ["GBP", "PLN"]);
        let report = aggregator(FakeProvider::new())
            .aggregate_from(&spec, today())
            .await;

        assert_eq!(report, "09.03.2024:\nPLN - Продаж: 10.3 грн, Купівля: 10.0 грн");
    }

    #[tokio::test]
    async fn test_failed_day_does_not_hide_siblings() {
        let failing = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let spec = RateRequestSpec::new(3, ["USD"]);
        let report = aggregator(FakeProvider::failing_on(failing))
            .aggregate_from(&spec, today())
            .await;

        let blocks: Vec<&str> = report.split("\n\n").collect();
        assert_eq!(
            blocks,
            vec![
                "09.03.2024:\nUSD - Продаж: 41.75 грн, Купівля: 41.2 грн",
                "08.03.2024: API request failed with status: 500",
                "07.03.2024:\nUSD - Продаж: 41.75 грн, Купівля: 41.2 грн",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let started = std::time::Instant::now();
        let results = aggregator(FakeProvider::new())
            .fetch_days(4, today())
            .await;

        assert_eq!(results.len(), 4);
        // Sequential fetches would take 20 * (4 + 3 + 2 + 1) ms.
        assert!(started.elapsed() < std::time::Duration::from_millis(190));
    }

    #[test]
    fn test_missing_rate_renders_placeholder() {
        let spec = RateRequestSpec::new(1, ["PLN"]);
        let result = DailyRateResult::Rates {
            date: today(),
            rates: vec![RateEntry {
                currency: "PLN".to_string(),
                sale_rate: None,
                purchase_rate: Some(10.0),
            }],
        };
        assert_eq!(
            render_report(&[result], &spec),
            "10.03.2024:\nPLN - Продаж: - грн, Купівля: 10.0 грн"
        );
    }

    #[test]
    fn test_whole_rates_keep_a_decimal() {
        let spec = RateRequestSpec::new(1, ["USD"]);
        let result = DailyRateResult::Rates {
            date: today(),
            rates: vec![entry("USD", 37.0, 36.5)],
        };
        assert_eq!(
            render_report(&[result], &spec),
            "10.03.2024:\nUSD - Продаж: 37.0 грн, Купівля: 36.5 грн"
        );
    }
}
