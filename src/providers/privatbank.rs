use crate::core::rate::{DailyRateResult, RateEntry, RateProvider, format_date};
use crate::core::RateCache;
use crate::providers::util::RetryPolicy;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Daily UAH exchange rates from the PrivatBank archive API.
pub struct PrivatBankProvider {
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    cache: RateCache,
}

impl PrivatBankProvider {
    pub fn new(base_url: &str, retry: RetryPolicy, cache: RateCache) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("ratechat/0.1")
            .build()?;
        Ok(PrivatBankProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry,
            cache,
        })
    }

    fn url(&self, date: NaiveDate) -> String {
        format!(
            "{}/p24api/exchange_rates?json&date={}",
            self.base_url,
            format_date(date)
        )
    }

    async fn request(&self, date: NaiveDate) -> Result<Vec<RateEntry>, String> {
        let url = self.url(date);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .retry
            .run(|| self.client.get(&url).send())
            .await
            .map_err(|e| format!("Failed to fetch data: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!(
                "API request failed with status: {}",
                status.as_u16()
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to fetch data: {e}"))?;
        let data: PrivatBankResponse = serde_json::from_str(&text)
            .map_err(|e| format!("Failed to parse exchange rates: {e}"))?;

        Ok(data
            .exchange_rate
            .into_iter()
            .filter_map(PrivatBankRate::into_entry)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct PrivatBankResponse {
    #[serde(default, rename = "exchangeRate")]
    exchange_rate: Vec<PrivatBankRate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrivatBankRate {
    currency: Option<String>,
    sale_rate: Option<f64>,
    purchase_rate: Option<f64>,
    #[serde(rename = "saleRateNB")]
    sale_rate_nb: Option<f64>,
    #[serde(rename = "purchaseRateNB")]
    purchase_rate_nb: Option<f64>,
}

impl PrivatBankRate {
    // Commercial rates are only published for a handful of currencies, the
    // national bank rate stands in for the rest.
    fn into_entry(self) -> Option<RateEntry> {
        Some(RateEntry {
            currency: self.currency?,
            sale_rate: self.sale_rate.or(self.sale_rate_nb),
            purchase_rate: self.purchase_rate.or(self.purchase_rate_nb),
        })
    }
}

#[async_trait]
impl RateProvider for PrivatBankProvider {
    #[instrument(name = "PrivatBankFetch", skip(self, date), fields(date = %format_date(date)))]
    async fn fetch_rates(&self, date: NaiveDate) -> DailyRateResult {
        if let Some(rates) = self.cache.get(date).await {
            return DailyRateResult::Rates { date, rates };
        }

        match self.request(date).await {
            Ok(rates) => {
                self.cache.put(date, rates.clone()).await;
                DailyRateResult::Rates { date, rates }
            }
            Err(error) => {
                warn!(%error, "Exchange rate fetch failed");
                DailyRateResult::Failed { date, error }
            }
        }
    }
}
