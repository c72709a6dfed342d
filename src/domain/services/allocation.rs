use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::domain::models::request::AppointmentType;
use crate::domain::models::slot::{Daypart, Slot};
use crate::domain::models::zone::{ServiceZone, FLEX_WEEKDAY};

#[derive(Debug, Clone, Default)]
pub struct AllocatedSlots {
    pub primary: Vec<Slot>,
    pub more: Vec<Slot>,
}

/// Deterministic five-pick selection over the eligible pool. Every pick
/// excludes previously chosen slots by physical window identity
/// (`service_date` + `slot_index`), so two zones sharing a calendar window
/// never produce duplicate proposals.
///
/// 1. earliest own-zone morning slot on the zone's main weekday
/// 2. earliest own-zone afternoon slot on the main weekday
/// 3. earliest remaining slot anywhere in the pool (pressure valve)
/// 4. same date as pick 3, opposite daypart; else next earliest remaining
/// 5. earliest remaining flex-day slot; else next earliest remaining
///
/// Picks 1-3 are `primary`, 4-5 are `more`; missing picks shrink the lists.
/// The unattended flow (`no_one_home`) never gets a `more` list.
pub fn allocate(eligible: &[Slot], zone: &ServiceZone, appointment_type: AppointmentType) -> AllocatedSlots {
    let mut ordered: Vec<&Slot> = eligible.iter().collect();
    ordered.sort_by(|a, b| {
        (a.service_date, a.slot_index, a.zone_code.as_str())
            .cmp(&(b.service_date, b.slot_index, b.zone_code.as_str()))
    });

    let mut picked: HashSet<(NaiveDate, i32)> = HashSet::new();

    let p1 = take_first(&ordered, &mut picked, |s| {
        s.zone_code == zone.code
            && s.service_date.weekday() == zone.main_weekday
            && s.daypart() == Daypart::Morning
    });
    let p2 = take_first(&ordered, &mut picked, |s| {
        s.zone_code == zone.code
            && s.service_date.weekday() == zone.main_weekday
            && s.daypart() == Daypart::Afternoon
    });
    let p3 = take_first(&ordered, &mut picked, |_| true);

    let mut p4 = None;
    if let Some(anchor) = &p3 {
        let date = anchor.service_date;
        let part = anchor.daypart().opposite();
        p4 = take_first(&ordered, &mut picked, |s| {
            s.service_date == date && s.daypart() == part
        });
    }
    if p4.is_none() {
        p4 = take_first(&ordered, &mut picked, |_| true);
    }

    let mut p5 = take_first(&ordered, &mut picked, |s| {
        s.service_date.weekday() == FLEX_WEEKDAY
    });
    if p5.is_none() {
        p5 = take_first(&ordered, &mut picked, |_| true);
    }

    let primary: Vec<Slot> = [p1, p2, p3].into_iter().flatten().take(3).collect();

    let more: Vec<Slot> = if appointment_type == AppointmentType::NoOneHome {
        Vec::new()
    } else {
        [p4, p5].into_iter().flatten().take(2).collect()
    };

    AllocatedSlots { primary, more }
}

fn take_first(
    ordered: &[&Slot],
    picked: &mut HashSet<(NaiveDate, i32)>,
    pred: impl Fn(&Slot) -> bool,
) -> Option<Slot> {
    let found = ordered
        .iter()
        .find(|s| !picked.contains(&(s.service_date, s.slot_index)) && pred(s))?;
    picked.insert((found.service_date, found.slot_index));
    Some((*found).clone())
}
