use crate::config::AppConfig;
use crate::geocode::{Geocoder, NominatimGeocoder};
use crate::predict::{OpenAiPredictor, TrendPredictor};
use crate::search::{SearchProvider, SerperClient};
use crate::session::SessionRegistry;
use anyhow::{Context, Result};
use std::time::Duration;

/// Everything a request handler needs. Built once in `main` and shared by
/// reference with every worker.
pub struct App {
    pub config: AppConfig,
    pub sessions: SessionRegistry,
    pub search: Box<dyn SearchProvider>,
    pub geocoder: Option<Box<dyn Geocoder>>,
    pub predictor: Option<Box<dyn TrendPredictor>>,
}

impl App {
    pub fn new(
        config: AppConfig,
        search: Box<dyn SearchProvider>,
        geocoder: Option<Box<dyn Geocoder>>,
        predictor: Option<Box<dyn TrendPredictor>>,
    ) -> Self {
        let sessions = SessionRegistry::new(config.session_ttl_secs);
        Self {
            config,
            sessions,
            search,
            geocoder,
            predictor,
        }
    }

    /// Wires the hosted collaborators described by `config`.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let search = SerperClient::new(
            config.serper_api_key.clone(),
            config.serper_endpoint.clone(),
            config.search_country.clone(),
            config.search_language.clone(),
            timeout,
        )
        .context("Failed to build search client")?;

        let geocoder: Option<Box<dyn Geocoder>> = if config.geocoding_enabled {
            let geocoder = NominatimGeocoder::new(
                config.nominatim_endpoint.clone(),
                &config.geocoder_user_agent,
                timeout,
            )
            .context("Failed to build geocoder")?;
            Some(Box::new(geocoder))
        } else {
            None
        };

        let predictor: Option<Box<dyn TrendPredictor>> = match &config.openai_api_key {
            Some(key) => {
                let predictor = OpenAiPredictor::new(
                    key.clone(),
                    config.openai_endpoint.clone(),
                    config.prediction_model.clone(),
                    timeout,
                )
                .context("Failed to build prediction client")?;
                Some(Box::new(predictor))
            }
            None => None,
        };

        tracing::info!(
            geocoding = geocoder.is_some(),
            prediction = predictor.is_some(),
            model = %config.prediction_model,
            "collaborators ready"
        );

        Ok(Self::new(config, Box::new(search), geocoder, predictor))
    }
}
