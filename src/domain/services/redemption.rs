use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::booking::Booking;
use crate::domain::ports::{BookingRepository, OfferRepository, RequestRepository};
use crate::domain::services::token::{self, KIND_OFFER};
use crate::error::AppError;

/// Converts exactly one offer into a booking. The in-application checks
/// here fail fast with good messages; the actual at-most-one guarantee is
/// the store's unique constraint on the booking's physical window, which
/// surfaces as `AppError::Conflict` from `BookingRepository::create`.
pub struct RedemptionService {
    offer_repo: Arc<dyn OfferRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    request_repo: Arc<dyn RequestRepository>,
}

impl RedemptionService {
    pub fn new(
        offer_repo: Arc<dyn OfferRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        request_repo: Arc<dyn RequestRepository>,
    ) -> Self {
        Self {
            offer_repo,
            booking_repo,
            request_repo,
        }
    }

    pub async fn redeem(
        &self,
        offer_token: &str,
        secret: &str,
        payment_session_id: Option<&str>,
    ) -> Result<Booking, AppError> {
        let payload = token::verify(offer_token, secret)?;
        if payload.kind != KIND_OFFER {
            return Err(AppError::Validation("Not an offer token".to_string()));
        }

        // At-least-once webhook delivery: a replay of the same payment
        // event short-circuits to the booking it already produced.
        if let Some(session_id) = payment_session_id {
            if let Some(existing) = self.booking_repo.find_by_payment_session(session_id).await? {
                info!(booking_id = %existing.id, session_id, "payment event already processed");
                return Ok(existing);
            }
        }

        let offer = self
            .offer_repo
            .find_by_token(offer_token)
            .await?
            .ok_or(AppError::NotFound("Offer not found".to_string()))?;

        if !offer.is_active {
            return Err(AppError::Conflict(
                "Offer is no longer active — the slot was taken".to_string(),
            ));
        }

        let request = self
            .request_repo
            .find_by_id(&offer.request_id)
            .await?
            .ok_or(AppError::NotFound("Booking request not found".to_string()))?;

        let booking = Booking::from_offer(&offer, &request, payment_session_id);
        let created = self.booking_repo.create(&booking).await?;

        let deactivated = self
            .offer_repo
            .deactivate_siblings(
                &offer.zone_code,
                &offer.appointment_type,
                offer.service_date,
                offer.slot_index,
            )
            .await?;
        info!(
            booking_id = %created.id,
            slot_code = %created.slot_code,
            deactivated,
            "booking committed, sibling offers deactivated"
        );
        if deactivated == 0 {
            warn!(offer_id = %offer.id, "redeemed offer was not among the deactivated rows");
        }

        self.request_repo.mark_booked(&offer.request_id).await?;

        Ok(created)
    }
}
