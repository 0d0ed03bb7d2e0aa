use crate::domain::query::DEFAULT_QUERY_TEMPLATE;
use crate::domain::QueryBuilder;
use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

pub const DEFAULT_CITY: &str = "Ciudad de Guatemala";
pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub max_workers: usize,

    pub serper_api_key: String,
    pub serper_endpoint: String,
    pub search_country: Option<String>,
    pub search_language: Option<String>,

    pub default_city: String,
    pub query: QueryBuilder,

    pub geocoding_enabled: bool,
    pub nominatim_endpoint: String,
    pub geocoder_user_agent: String,
    /// Where the map centres when nothing could be geocoded.
    pub map_center: (f64, f64),

    pub openai_api_key: Option<String>,
    pub openai_endpoint: String,
    pub prediction_model: String,

    pub preserve_batch_on_failure: bool,
    pub session_ttl_secs: i64,
    pub http_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            max_workers: 8,
            serper_api_key: String::new(),
            serper_endpoint: SERPER_ENDPOINT.to_string(),
            search_country: None,
            search_language: None,
            default_city: DEFAULT_CITY.to_string(),
            query: QueryBuilder::default(),
            geocoding_enabled: true,
            nominatim_endpoint: NOMINATIM_ENDPOINT.to_string(),
            geocoder_user_agent: "property-compare/0.1".to_string(),
            map_center: (14.634915, -90.506882),
            openai_api_key: None,
            openai_endpoint: OPENAI_ENDPOINT.to_string(),
            prediction_model: "gpt-4o-mini".to_string(),
            preserve_batch_on_failure: false,
            session_ttl_secs: 60 * 60,
            http_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        let template =
            env::var("QUERY_TEMPLATE").unwrap_or_else(|_| DEFAULT_QUERY_TEMPLATE.to_string());
        let query = QueryBuilder::new(template)
            .ok_or_else(|| anyhow!("QUERY_TEMPLATE must contain {{location}}"))?;

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_workers: parse_var("MAX_WORKERS", defaults.max_workers)?,
            serper_api_key: env::var("SERPER_API_KEY").context("SERPER_API_KEY must be set")?,
            serper_endpoint: env::var("SERPER_ENDPOINT").unwrap_or(defaults.serper_endpoint),
            search_country: optional_var("SEARCH_COUNTRY"),
            search_language: optional_var("SEARCH_LANGUAGE"),
            default_city: optional_var("DEFAULT_CITY").unwrap_or(defaults.default_city),
            query,
            geocoding_enabled: parse_var("GEOCODING_ENABLED", defaults.geocoding_enabled)?,
            nominatim_endpoint: env::var("NOMINATIM_ENDPOINT")
                .unwrap_or(defaults.nominatim_endpoint),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or(defaults.geocoder_user_agent),
            map_center: (
                parse_var("MAP_CENTER_LAT", defaults.map_center.0)?,
                parse_var("MAP_CENTER_LON", defaults.map_center.1)?,
            ),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_endpoint: env::var("OPENAI_ENDPOINT").unwrap_or(defaults.openai_endpoint),
            prediction_model: env::var("PREDICTION_MODEL").unwrap_or(defaults.prediction_model),
            preserve_batch_on_failure: parse_var(
                "PRESERVE_BATCH_ON_FAILURE",
                defaults.preserve_batch_on_failure,
            )?,
            session_ttl_secs: parse_var("SESSION_TTL_SECS", defaults.session_ttl_secs)?,
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        })
    }
}

/// Unset or blank variables read as `None`.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
