use crate::domain::ports::{GeoPoint, GeocodingService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

pub struct HttpGeocoder {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpGeocoder {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Deserialize)]
struct GeocodeHit {
    lat: f64,
    lon: f64,
    #[serde(default)]
    display_name: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeHit>,
}

#[async_trait]
impl GeocodingService for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, AppError> {
        let res = self.client.get(&self.api_url)
            .query(&[("q", address), ("key", &self.api_key), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Geocoder connection error: {}", e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Geocoder failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        let body: GeocodeResponse = res.json().await
            .map_err(|e| AppError::Upstream(format!("Geocoder returned invalid JSON: {}", e)))?;

        // first hit wins; an empty result set is a business outcome, not an error
        Ok(body.results.into_iter().next().map(|hit| GeoPoint {
            lat: hit.lat,
            lon: hit.lon,
            formatted_address: hit.display_name,
        }))
    }
}
