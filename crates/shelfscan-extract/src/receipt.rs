//! Structured receipt fields derived from recognized text.

use std::sync::LazyLock;

use jiff::ToSpan;
use jiff::civil::Date;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shelfscan_core::{Confidence, DateMention, ImageSource, RecognitionEngine};

use crate::TRACING_TARGET;
use crate::scan::{MoneyMention, scan_dates, scan_money};

static PURE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})$").expect("pure date regex")
});

static PURE_PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$?\s?\d[\d,]*\.\d{2}$").expect("pure price regex"));

/// Structured fields derived from one receipt.
///
/// All fields are derived, request-scoped values; nothing here is persisted
/// by the pipeline. Fields that could not be derived are `None`, which
/// downstream callers must treat as "unknown" rather than failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptFields {
    /// The first valid date found in the text.
    pub purchase_date: Option<Date>,
    /// One year after the purchase date. Leap-day purchases resolve to the
    /// nearest valid date in the target year.
    pub warranty_expiration: Option<Date>,
    /// The largest amount on the receipt, formatted with two decimals.
    pub purchase_price: Option<String>,
    /// The first non-empty line, assumed to be the header/letterhead.
    pub store_name: Option<String>,
    /// Best-effort product description line.
    pub product_name: Option<String>,
    /// All valid date mentions, in encounter order.
    pub dates: Vec<DateMention>,
    /// All money mentions, largest first.
    pub prices: Vec<MoneyMention>,
    /// The raw recognized text these fields were derived from.
    pub text: String,
    /// Confidence reported by the recognition engine, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Human-readable failure description when recognition failed outright.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReceiptFields {
    /// Creates an error-shaped result: every derived field null, empty
    /// mention lists, `error` set.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            purchase_date: None,
            warranty_expiration: None,
            purchase_price: None,
            store_name: None,
            product_name: None,
            dates: Vec::new(),
            prices: Vec::new(),
            text: String::new(),
            confidence: None,
            error: Some(message.into()),
        }
    }
}

/// Derives structured receipt fields from recognized text.
///
/// Total function: ambiguity (no date, no price, no usable line) shows up as
/// `None`/empty fields, never as an error. Heuristics preserved as stated
/// contracts: the largest amount is taken to be the total, and the first
/// non-empty line the store header. Neither is robust to every receipt
/// layout.
pub fn parse_receipt_text(text: &str, confidence: Option<Confidence>) -> ReceiptFields {
    let dates = scan_dates(text);
    let prices = scan_money(text);

    let purchase_date = dates.first().map(|mention| mention.parsed);
    let warranty_expiration = purchase_date.map(|date| date.saturating_add(1.year()));
    let purchase_price = prices.first().map(|mention| format!("{:.2}", mention.parsed));

    let store_name = store_line(text).map(str::to_string);
    let product_name = product_line(text).map(str::to_string);

    tracing::debug!(
        target: TRACING_TARGET,
        dates = dates.len(),
        prices = prices.len(),
        has_store = store_name.is_some(),
        has_product = product_name.is_some(),
        "derived receipt fields"
    );

    ReceiptFields {
        purchase_date,
        warranty_expiration,
        purchase_price,
        store_name,
        product_name,
        dates,
        prices,
        text: text.to_string(),
        confidence,
        error: None,
    }
}

/// Runs a recognition engine over an image and derives receipt fields.
///
/// Drives the full engine lifecycle for a one-shot parse. Engine failures at
/// any stage are caught and converted to an error-shaped result; this
/// function never returns an error.
pub async fn parse_receipt<E>(engine: &E, image: &ImageSource) -> ReceiptFields
where
    E: RecognitionEngine + ?Sized,
{
    let outcome = run_engine(engine, image).await;

    if let Err(error) = engine.terminate().await {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "engine teardown failed after receipt parse"
        );
    }

    match outcome {
        Ok((text, confidence)) => {
            parse_receipt_text(&text, Some(Confidence::from_score(confidence)))
        }
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "recognition failed, returning error-shaped fields"
            );
            ReceiptFields::from_error(error.to_string())
        }
    }
}

async fn run_engine<E>(engine: &E, image: &ImageSource) -> shelfscan_core::Result<(String, f64)>
where
    E: RecognitionEngine + ?Sized,
{
    engine.load_language().await?;
    engine.initialize().await?;
    let output = engine.recognize(image).await?;
    Ok((output.text, output.confidence))
}

/// First non-empty line, taken as-is.
fn store_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// First line after the store line that carries a description rather than a
/// bare date, price, or number.
fn product_line(text: &str) -> Option<&str> {
    let store = store_line(text)?;
    let mut past_store = false;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        if !past_store && line == store {
            past_store = true;
            continue;
        }
        if is_informational(line) {
            continue;
        }
        return Some(line);
    }
    None
}

/// True for lines that are purely a date, a price, or otherwise free of
/// letters (quantities, separators, phone numbers).
fn is_informational(line: &str) -> bool {
    !line.chars().any(|c| c.is_ascii_alphabetic())
        || PURE_DATE_RE.is_match(line)
        || PURE_PRICE_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use shelfscan_core::mock::{FailAt, MockEngine};

    use super::*;

    const RECEIPT: &str = "HOME DEPOT\n11/12/2025\nKitchenAid Stand Mixer $394.39\nTotal: $394.39";

    #[test]
    fn derives_all_fields_from_receipt_text() {
        let fields = parse_receipt_text(RECEIPT, Some(Confidence::from_score(93.0)));

        assert_eq!(fields.purchase_date, Some(Date::constant(2025, 11, 12)));
        assert_eq!(fields.warranty_expiration, Some(Date::constant(2026, 11, 12)));
        assert_eq!(fields.purchase_price.as_deref(), Some("394.39"));
        assert!(fields.store_name.as_deref().unwrap().contains("HOME DEPOT"));
        assert!(
            fields
                .product_name
                .as_deref()
                .unwrap()
                .contains("KitchenAid Stand Mixer")
        );
        assert_eq!(fields.dates.len(), 1);
        assert_eq!(fields.dates[0].parsed, Date::constant(2025, 11, 12));
        assert_eq!(fields.prices[0].parsed, 394.39);
        assert!(fields.error.is_none());
    }

    #[test]
    fn leap_day_warranty_resolves_to_nearest_valid_date() {
        let fields = parse_receipt_text("STORE\n02/29/2024\nWidget $9.99", None);
        assert_eq!(fields.purchase_date, Some(Date::constant(2024, 2, 29)));
        assert_eq!(fields.warranty_expiration, Some(Date::constant(2025, 2, 28)));
    }

    #[test]
    fn ambiguity_is_none_not_error() {
        let fields = parse_receipt_text("", None);
        assert!(fields.purchase_date.is_none());
        assert!(fields.warranty_expiration.is_none());
        assert!(fields.purchase_price.is_none());
        assert!(fields.store_name.is_none());
        assert!(fields.product_name.is_none());
        assert!(fields.dates.is_empty());
        assert!(fields.prices.is_empty());
        assert!(fields.error.is_none());
    }

    #[test]
    fn product_line_skips_dates_prices_and_numbers() {
        let text = "ACME HARDWARE\n01/05/2025\n$12.00\n123456\nCordless Drill\n";
        let fields = parse_receipt_text(text, None);
        assert_eq!(fields.product_name.as_deref(), Some("Cordless Drill"));

        let no_product = "ACME HARDWARE\n01/05/2025\n$12.00\n";
        assert!(parse_receipt_text(no_product, None).product_name.is_none());
    }

    #[tokio::test]
    async fn engine_output_flows_into_fields() {
        let engine = MockEngine::with_text(RECEIPT).with_confidence(88.0);
        let image = ImageSource::from_bytes(&b"img"[..]);

        let fields = parse_receipt(&engine, &image).await;
        assert_eq!(fields.purchase_price.as_deref(), Some("394.39"));
        assert_eq!(fields.confidence, Some(Confidence::Score(88.0)));
        assert_eq!(engine.terminate_calls(), 1);
    }

    #[tokio::test]
    async fn language_load_failure_yields_error_shape() {
        let engine = MockEngine::with_text(RECEIPT).failing_at(FailAt::LoadLanguage);
        let image = ImageSource::from_bytes(&b"img"[..]);

        let fields = parse_receipt(&engine, &image).await;
        assert!(fields.error.is_some());
        assert!(fields.purchase_date.is_none());
        assert!(fields.purchase_price.is_none());
        assert!(fields.dates.is_empty());
        assert!(fields.prices.is_empty());
    }
}
