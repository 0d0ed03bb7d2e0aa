// src/domain/listing.rs

use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Sin título";

/// One search result, normalised at the ingestion boundary.
/// The rest of the pipeline never has to re-check for missing fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    title: String,
    snippet: Option<String>,
    address: Option<String>,
    price: f64,
}

impl ListingRecord {
    pub fn new(
        title: impl Into<String>,
        snippet: Option<String>,
        address: Option<String>,
        price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            snippet,
            address,
            price: if price.is_finite() { price } else { 0.0 },
        }
    }

    /// Builds a record from a loosely-typed search entry.
    /// Missing or mistyped fields fall back to their defaults; this never fails.
    pub fn from_raw(raw: &Value) -> Self {
        let title = non_empty_str(raw.get("title"))
            .unwrap_or(DEFAULT_TITLE)
            .to_string();

        let snippet = non_empty_str(raw.get("snippet")).map(str::to_string);

        // "direccion" / "precio" are the keys the Spanish dashboards wrote.
        let address = non_empty_str(raw.get("address"))
            .or_else(|| non_empty_str(raw.get("direccion")))
            .map(str::to_string);

        let price_field = raw
            .get("price")
            .filter(|v| !v.is_null())
            .or_else(|| raw.get("precio"));

        Self::new(title, snippet, address, coerce_price(price_field))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Price for display; a zero price reads as "N/D".
    pub fn price_label(&self) -> String {
        if self.price == 0.0 {
            "N/D".to_string()
        } else {
            format_amount(self.price)
        }
    }
}

/// Coerces a price of unreliable type to a number.
/// Absent, null, non-numeric and non-finite values all become `0.0`.
pub fn coerce_price(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed.filter(|p| p.is_finite()).unwrap_or(0.0)
}

/// Whole amounts print without decimals, everything else with two.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
