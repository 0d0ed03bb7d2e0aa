// src/geocode.rs
use crate::domain::ListingRecord;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Geocoder returned HTTP {0}")]
    Status(u16),

    #[error("Unexpected geocoder response: {0}")]
    UnexpectedShape(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn osm_link(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=16/{lat}/{lon}",
            lat = self.lat,
            lon = self.lon
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub coordinates: Coordinates,
    pub popup: String,
}

pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: String, user_agent: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self { client, endpoint })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Status(resp.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = resp
            .json()
            .map_err(|e| GeocodeError::UnexpectedShape(e.to_string()))?;

        places.first().map(parse_place).transpose()
    }
}

fn parse_place(place: &NominatimPlace) -> Result<Coordinates, GeocodeError> {
    let lat = place
        .lat
        .parse()
        .map_err(|_| GeocodeError::UnexpectedShape(format!("bad latitude {:?}", place.lat)))?;
    let lon = place
        .lon
        .parse()
        .map_err(|_| GeocodeError::UnexpectedShape(format!("bad longitude {:?}", place.lon)))?;

    Ok(Coordinates { lat, lon })
}

/// Geocodes every record that carries an address.
/// Records without an address, without a match, or whose lookup failed are skipped.
pub fn map_markers<'a, I>(records: I, geocoder: &dyn Geocoder) -> Vec<MapMarker>
where
    I: IntoIterator<Item = &'a ListingRecord>,
{
    let mut markers = Vec::new();

    for record in records {
        let Some(address) = record.address() else {
            continue;
        };

        match geocoder.geocode(address) {
            Ok(Some(coordinates)) => markers.push(MapMarker {
                coordinates,
                popup: format!("{}: ${}", record.title(), record.price_label()),
            }),
            Ok(None) => tracing::debug!(address, "no geocoding match"),
            Err(e) => tracing::warn!(address, error = %e, "geocoding failed"),
        }
    }

    markers
}
