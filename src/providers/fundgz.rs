//! Real-time fund valuation estimates from the fundgz JSONP endpoint.
//!
//! The endpoint answers `GET /js/<code>.js` with a callback-wrapped payload:
//!
//! ```text
//! jsonpgz({"fundcode":"161725","name":"...","jzrq":"2024-01-01","dwjz":"1.2000",
//!          "gsz":"1.2300","gszzl":"0.45","gztime":"2024-01-01 15:00"});
//! ```
//!
//! Unknown codes produce `jsonpgz();`, errors produce an HTML page.

use crate::core::config::FundgzProviderConfig;
use crate::core::quote::{FundQuote, QuoteOutcome, QuoteProvider};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

const CALLBACK_MARKER: &str = "jsonpgz(";

#[derive(Debug, Deserialize)]
struct FundgzPayload {
    name: String,
    gsz: String,
    gszzl: String,
    dwjz: Option<String>,
    gztime: String,
}

pub struct FundgzProvider {
    base_url: String,
    client: reqwest::Client,
}

impl FundgzProvider {
    pub fn new(config: &FundgzProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(FundgzProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn request(&self, code: &str) -> Result<FundQuote> {
        if code.is_empty() {
            bail!("Empty fund code");
        }

        let url = format!("{}/js/{}.js", self.base_url, code);
        debug!("Requesting valuation from {}", url);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed for fund: {code}"))?
            .text()
            .await
            .with_context(|| format!("Failed to read response body for fund: {code}"))?;

        parse_response(code, &body)
    }
}

#[async_trait]
impl QuoteProvider for FundgzProvider {
    #[instrument(skip(self))]
    async fn fetch_quote(&self, code: &str) -> QuoteOutcome {
        match self.request(code).await {
            Ok(quote) => {
                debug!(
                    "Fetched {} ({}): {} {:+}%",
                    quote.code, quote.name, quote.current_valuation, quote.change_percent
                );
                QuoteOutcome::Available(quote)
            }
            Err(e) => {
                debug!(error = ?e, "Quote unavailable");
                QuoteOutcome::Unavailable
            }
        }
    }
}

/// Extracts the JSON text between the callback marker and the closing `);`.
fn unwrap_callback(body: &str) -> Option<&str> {
    let (_, rest) = body.split_once(CALLBACK_MARKER)?;
    Some(rest.trim_end().trim_end_matches([')', ';']))
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| anyhow!("Field '{field}' is not numeric: '{value}'"))
}

/// Parses a full response body into a quote for `code`.
pub(crate) fn parse_response(code: &str, body: &str) -> Result<FundQuote> {
    let payload = unwrap_callback(body).ok_or_else(|| {
        anyhow!("Response for fund {code} has no '{CALLBACK_MARKER}' marker: '{body}'")
    })?;

    let data: FundgzPayload = serde_json::from_str(payload)
        .with_context(|| format!("Failed to parse payload for fund {code}: '{payload}'"))?;

    let previous_nav = data
        .dwjz
        .as_deref()
        .map(|v| parse_number("dwjz", v))
        .transpose()?;

    Ok(FundQuote {
        code: code.to_string(),
        name: data.name,
        current_valuation: parse_number("gsz", &data.gsz)?,
        change_percent: parse_number("gszzl", &data.gszzl)?,
        previous_nav,
        as_of: data.gztime,
    })
}
