use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;
use crate::database::models::bootcamp::Location;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(String),

    #[error("no geocoding results for the given address")]
    NoResults,
}

/// Opaque capability: address string -> coordinates + normalized address
/// components. Injected so tests can substitute a fixture.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError>;
}

/// Geocoder backed by a Nominatim-style HTTP endpoint
pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodeError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
    address: Option<SearchAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchAddress {
    road: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
    country_code: Option<String>,
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<Location, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let results: Vec<SearchResult> = self
            .client
            .get(&url)
            .query(&[
                ("q", address),
                ("format", "json"),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| GeocodeError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let Some(first) = results.into_iter().next() else {
            return Err(GeocodeError::NoResults);
        };

        let latitude = first
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Request("malformed latitude in response".to_string()))?;
        let longitude = first
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Request("malformed longitude in response".to_string()))?;

        let addr = first.address.unwrap_or_default();
        Ok(Location {
            latitude: Some(latitude),
            longitude: Some(longitude),
            formatted_address: first.display_name,
            street: addr.road,
            city: addr.city.or(addr.town).or(addr.village),
            state: addr.state,
            zipcode: addr.postcode,
            country: addr.country_code.map(|c| c.to_uppercase()),
        })
    }
}
