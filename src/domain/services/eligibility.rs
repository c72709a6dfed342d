use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::models::booking::Booking;
use crate::domain::models::slot::{Slot, SLOTS_PER_DAY};
use crate::domain::models::zone::{ServiceZone, ZoneDirectory, FLEX_WEEKDAY};

/// A zone runs jobs on its own main weekday and on the shared flex day,
/// nothing else. The rule always applies to the slot's own zone, so
/// borrowing capacity from a neighbour never crosses the weekday partition.
pub fn is_weekday_eligible(zone: &ServiceZone, date: NaiveDate) -> bool {
    let weekday = date.weekday();
    weekday == zone.main_weekday || weekday == FLEX_WEEKDAY
}

/// All template slots for one zone over the horizon, eligible dates only.
pub fn generate_zone_slots(zone: &ServiceZone, from: NaiveDate, horizon_days: u32) -> Vec<Slot> {
    let mut slots = Vec::new();
    for offset in 0..horizon_days {
        let date = from + Duration::days(offset as i64);
        if !is_weekday_eligible(zone, date) {
            continue;
        }
        for index in 1..=SLOTS_PER_DAY {
            slots.push(Slot::from_template(&zone.code, date, index));
        }
    }
    slots
}

/// Candidate pool for a request: the customer's zone plus its pressure-valve
/// fallbacks, each under its own weekday rule, in chronological order.
pub fn candidate_slots(
    directory: &ZoneDirectory,
    zone: &ServiceZone,
    from: NaiveDate,
    horizon_days: u32,
) -> Vec<Slot> {
    let mut slots = Vec::new();
    for z in directory.reachable(zone) {
        slots.extend(generate_zone_slots(z, from, horizon_days));
    }
    slots.sort_by(|a, b| {
        (a.service_date, a.slot_index, a.zone_code.as_str())
            .cmp(&(b.service_date, b.slot_index, b.zone_code.as_str()))
    });
    slots
}

/// Drops slots already consumed by an active booking. Conflict detection is
/// an exact window match on zone, date and start/end wall-clock time: slots
/// come from one fixed template, so equality and overlap coincide.
pub fn exclude_booked(slots: Vec<Slot>, bookings: &[Booking]) -> Vec<Slot> {
    slots
        .into_iter()
        .filter(|slot| {
            !bookings.iter().any(|b| {
                b.status != "cancelled"
                    && b.zone_code == slot.zone_code
                    && b.service_date == slot.service_date
                    && b.start_time == slot.start_time
                    && b.end_time == slot.end_time
            })
        })
        .collect()
}
