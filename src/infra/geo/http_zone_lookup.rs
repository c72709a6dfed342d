use crate::domain::ports::ZoneLookupService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

pub struct HttpZoneLookup {
    client: Client,
    api_url: String,
}

impl HttpZoneLookup {
    pub fn new(api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
        }
    }
}

#[derive(Deserialize)]
struct ZoneLookupResponse {
    zone: Option<String>,
}

#[async_trait]
impl ZoneLookupService for HttpZoneLookup {
    async fn locate(&self, lat: f64, lon: f64) -> Result<Option<String>, AppError> {
        let res = self.client.get(&self.api_url)
            .query(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Zone lookup connection error: {}", e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Zone lookup failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        let body: ZoneLookupResponse = res.json().await
            .map_err(|e| AppError::Upstream(format!("Zone lookup returned invalid JSON: {}", e)))?;

        Ok(body.zone)
    }
}
