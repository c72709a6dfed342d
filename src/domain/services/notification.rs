use std::sync::Arc;

use serde::Serialize;
use tera::Tera;
use tracing::warn;

use crate::domain::models::booking::Booking;
use crate::domain::models::offer::Offer;
use crate::domain::models::request::BookingRequest;
use crate::domain::ports::{EmailService, SmsService};

/// Outcome of a best-effort delivery. Failures are captured here and
/// surfaced in the response payload; they never abort the business flow.
#[derive(Debug, Serialize, Clone)]
pub struct DeliveryReport {
    pub channel: String,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryReport {
    fn sent(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            sent: true,
            error: None,
        }
    }

    fn failed(channel: &str, error: String) -> Self {
        Self {
            channel: channel.to_string(),
            sent: false,
            error: Some(error),
        }
    }

    fn skipped(channel: &str, reason: &str) -> Self {
        Self {
            channel: channel.to_string(),
            sent: false,
            error: Some(reason.to_string()),
        }
    }
}

pub struct NotificationService {
    email: Arc<dyn EmailService>,
    sms: Arc<dyn SmsService>,
    templates: Arc<Tera>,
    frontend_url: String,
}

impl NotificationService {
    pub fn new(
        email: Arc<dyn EmailService>,
        sms: Arc<dyn SmsService>,
        templates: Arc<Tera>,
        frontend_url: String,
    ) -> Self {
        Self {
            email,
            sms,
            templates,
            frontend_url,
        }
    }

    pub async fn send_offer_list(
        &self,
        request: &BookingRequest,
        primary: &[Offer],
        more: &[Offer],
    ) -> DeliveryReport {
        if request.contact_method == "sms" {
            let Some(phone) = request.customer_phone.as_deref() else {
                return DeliveryReport::skipped("sms", "no phone number on file");
            };
            let body = self.offer_sms_body(request, primary, more);
            return match self.sms.send(phone, &body).await {
                Ok(()) => DeliveryReport::sent("sms"),
                Err(e) => {
                    warn!(request_id = %request.id, "offer SMS delivery failed: {}", e);
                    DeliveryReport::failed("sms", e.to_string())
                }
            };
        }

        let mut context = tera::Context::new();
        context.insert("customer_name", &request.customer_name);
        context.insert("primary", &self.offer_lines(primary));
        context.insert("more", &self.offer_lines(more));

        let html = match self.templates.render("offers.html", &context) {
            Ok(html) => html,
            Err(e) => {
                warn!(request_id = %request.id, "offer template render failed: {:?}", e);
                return DeliveryReport::failed("email", format!("template error: {}", e));
            }
        };

        match self
            .email
            .send(&request.customer_email, "Your appointment options", &html)
            .await
        {
            Ok(()) => DeliveryReport::sent("email"),
            Err(e) => {
                warn!(request_id = %request.id, "offer email delivery failed: {}", e);
                DeliveryReport::failed("email", e.to_string())
            }
        }
    }

    pub async fn send_confirmation(&self, booking: &Booking) -> DeliveryReport {
        let mut context = tera::Context::new();
        context.insert("customer_name", &booking.customer_name);
        context.insert("service_date", &booking.service_date.format("%Y-%m-%d").to_string());
        context.insert("start_time", &booking.start_time.format("%H:%M").to_string());
        context.insert("end_time", &booking.end_time.format("%H:%M").to_string());
        context.insert("zone_code", &booking.zone_code);

        let html = match self.templates.render("confirmation.html", &context) {
            Ok(html) => html,
            Err(e) => {
                warn!(booking_id = %booking.id, "confirmation template render failed: {:?}", e);
                return DeliveryReport::failed("email", format!("template error: {}", e));
            }
        };

        match self
            .email
            .send(&booking.customer_email, "Your repair appointment is confirmed", &html)
            .await
        {
            Ok(()) => DeliveryReport::sent("email"),
            Err(e) => {
                warn!(booking_id = %booking.id, "confirmation email delivery failed: {}", e);
                DeliveryReport::failed("email", e.to_string())
            }
        }
    }

    pub async fn send_reminder(&self, booking: &Booking, reminder_type: &str) -> DeliveryReport {
        let mut context = tera::Context::new();
        context.insert("customer_name", &booking.customer_name);
        context.insert("service_date", &booking.service_date.format("%Y-%m-%d").to_string());
        context.insert("start_time", &booking.start_time.format("%H:%M").to_string());
        context.insert("reminder_type", reminder_type);

        let html = match self.templates.render("reminder.html", &context) {
            Ok(html) => html,
            Err(e) => {
                warn!(booking_id = %booking.id, "reminder template render failed: {:?}", e);
                return DeliveryReport::failed("email", format!("template error: {}", e));
            }
        };

        match self
            .email
            .send(&booking.customer_email, "Reminder: your repair appointment", &html)
            .await
        {
            Ok(()) => DeliveryReport::sent("email"),
            Err(e) => {
                warn!(booking_id = %booking.id, "reminder email delivery failed: {}", e);
                DeliveryReport::failed("email", e.to_string())
            }
        }
    }

    fn offer_lines(&self, offers: &[Offer]) -> Vec<OfferLine> {
        offers
            .iter()
            .map(|o| OfferLine {
                service_date: o.service_date.format("%A, %Y-%m-%d").to_string(),
                window: format!(
                    "{} - {}",
                    o.start_time.format("%H:%M"),
                    o.end_time.format("%H:%M")
                ),
                link: format!("{}/offer/{}", self.frontend_url, o.offer_token),
            })
            .collect()
    }

    fn offer_sms_body(&self, request: &BookingRequest, primary: &[Offer], more: &[Offer]) -> String {
        let mut lines = vec![format!("Hi {}, your repair appointment options:", request.customer_name)];
        for line in self.offer_lines(primary).iter().chain(self.offer_lines(more).iter()) {
            lines.push(format!("{} {}: {}", line.service_date, line.window, line.link));
        }
        lines.join("\n")
    }
}

#[derive(Serialize)]
struct OfferLine {
    service_date: String,
    window: String,
    link: String,
}
