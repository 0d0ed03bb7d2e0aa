// src/predict.rs
use crate::domain::listing::format_amount;
use crate::domain::ComparisonSeries;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Empty completion")]
    EmptyCompletion,
}

/// Free-text price-trend commentary from a hosted model.
pub trait TrendPredictor: Send + Sync {
    fn predict(&self, prompt: &str) -> Result<String, PredictError>;
}

pub struct OpenAiPredictor {
    api_key: String,
    endpoint: String,
    model: String,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiPredictor {
    pub fn new(
        api_key: String,
        endpoint: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, PredictError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_key,
            endpoint,
            model,
            client,
        })
    }
}

impl TrendPredictor for OpenAiPredictor {
    fn predict(&self, prompt: &str) -> Result<String, PredictError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "Eres un analista del mercado inmobiliario. Responde en español, en pocas frases.",
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| PredictError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(PredictError::ApiError(format!("{status} - {text}")));
        }

        let body: ChatResponse = resp
            .json()
            .map_err(|e| PredictError::ApiError(e.to_string()))?;

        first_completion(body)
    }
}

fn first_completion(body: ChatResponse) -> Result<String, PredictError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(PredictError::EmptyCompletion)
}

/// Prompt asking for a short trend outlook over the compared listings.
pub fn trend_prompt(city: &str, series: &ComparisonSeries) -> String {
    let mut prompt = format!(
        "Estas son propiedades seleccionadas en {city} con su precio publicado \
         (0 significa precio no disponible):\n"
    );

    for (label, value) in series.pairs() {
        let _ = writeln!(prompt, "- {label}: {}", format_amount(value));
    }

    if let Some(avg) = series.average() {
        let _ = writeln!(prompt, "Precio promedio: {}", format_amount(avg));
    }

    prompt.push_str("¿Qué tendencia de precios esperas para estas propiedades en los próximos meses?");
    prompt
}
