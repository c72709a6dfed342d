use std::sync::Arc;
use std::time::Duration;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::time::sleep;
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::reminder::{REMINDER_1H, REMINDER_24H};
use crate::error::AppError;
use crate::state::AppState;

/// Reminder dispatcher. The external trigger here is a plain interval
/// loop; idempotency per (booking, reminder type) comes from the
/// attempted-insert-first claim in the reminder log, so overlapping runs
/// send each message at most once.
pub async fn start_reminder_worker(state: Arc<AppState>) {
    info!("Starting reminder worker...");

    loop {
        if let Err(e) = dispatch_due_reminders(&state).await {
            error!("Reminder pass failed: {:?}", e);
        }
        sleep(Duration::from_secs(60)).await;
    }
}

pub async fn dispatch_due_reminders(state: &Arc<AppState>) -> Result<(), AppError> {
    let tz: Tz = state.config.business_timezone.parse().unwrap_or(chrono_tz::UTC);
    let today = Utc::now().with_timezone(&tz).date_naive();

    // today covers the 1-hour window, tomorrow the 24-hour one
    for date in [today, today + ChronoDuration::days(1)] {
        let bookings = state.booking_repo.list_for_date(date).await?;

        for booking in bookings {
            let local_start = booking.service_date.and_time(booking.start_time);
            let Some(start) = tz.from_local_datetime(&local_start).single() else {
                warn!(booking_id = %booking.id, "skipping booking with ambiguous local start time");
                continue;
            };

            let minutes_until = (start.with_timezone(&Utc) - Utc::now()).num_minutes();
            let reminder_type = if (0..=60).contains(&minutes_until) {
                REMINDER_1H
            } else if (61..=1440).contains(&minutes_until) {
                REMINDER_24H
            } else {
                continue;
            };

            if !state.reminder_repo.try_claim(&booking.id, reminder_type).await? {
                continue;
            }

            let span = info_span!(
                "reminder_dispatch",
                booking_id = %booking.id,
                reminder_type = %reminder_type
            );

            async {
                info!("Sending reminder");
                let report = state.notification_service.send_reminder(&booking, reminder_type).await;
                if !report.sent {
                    // the claim stands; at-most-once wins over retry here
                    warn!("Reminder delivery failed: {:?}", report.error);
                }
            }
            .instrument(span)
            .await;
        }
    }

    Ok(())
}
