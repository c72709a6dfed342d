use crate::domain::ports::{CheckoutSession, PaymentService};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct HttpPaymentService {
    client: Client,
    api_url: String,
    secret_key: String,
    frontend_url: String,
}

impl HttpPaymentService {
    pub fn new(api_url: String, secret_key: String, frontend_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            secret_key,
            frontend_url,
        }
    }
}

#[derive(Serialize)]
struct SessionMetadata {
    offer_token: String,
}

#[derive(Serialize)]
struct CreateSessionPayload {
    amount_cents: i64,
    currency: String,
    description: String,
    metadata: SessionMetadata,
    success_url: String,
    cancel_url: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    url: String,
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn create_checkout_session(
        &self,
        offer_token: &str,
        amount_cents: i64,
        description: &str,
    ) -> Result<CheckoutSession, AppError> {
        let payload = CreateSessionPayload {
            amount_cents,
            currency: "eur".to_string(),
            description: description.to_string(),
            metadata: SessionMetadata {
                offer_token: offer_token.to_string(),
            },
            success_url: format!("{}/booking/confirmed", self.frontend_url),
            cancel_url: format!("{}/booking/cancelled", self.frontend_url),
        };

        let res = self.client.post(format!("{}/checkout/sessions", self.api_url))
            .header("Authorization", format!("Bearer {}", self.secret_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment service connection error: {}", e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment session creation failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        let session: SessionResponse = res.json().await
            .map_err(|e| AppError::Upstream(format!("Payment service returned invalid JSON: {}", e)))?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }
}
