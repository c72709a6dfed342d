use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

pub const SLOTS_PER_DAY: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Daypart {
    Morning,
    Afternoon,
}

impl Daypart {
    pub fn opposite(self) -> Self {
        match self {
            Daypart::Morning => Daypart::Afternoon,
            Daypart::Afternoon => Daypart::Morning,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Daypart::Morning => "morning",
            Daypart::Afternoon => "afternoon",
        }
    }
}

/// One candidate appointment window from the fixed daily template:
/// eight two-hour windows starting hourly from 08:00 through 15:00.
/// Slots are computed, never persisted as their own rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub zone_code: String,
    pub service_date: NaiveDate,
    pub slot_index: i32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Slot {
    pub fn from_template(zone_code: &str, service_date: NaiveDate, slot_index: i32) -> Self {
        let (start_time, end_time) = template_window(slot_index);
        Self {
            zone_code: zone_code.to_string(),
            service_date,
            slot_index,
            start_time,
            end_time,
        }
    }

    /// Windows 1-4 start before noon.
    pub fn daypart(&self) -> Daypart {
        if self.slot_index <= 4 {
            Daypart::Morning
        } else {
            Daypart::Afternoon
        }
    }

    /// Derived key of the physical calendar window, e.g. `2026-02-09#3`.
    pub fn slot_code(&self) -> String {
        slot_code(self.service_date, self.slot_index)
    }
}

pub fn slot_code(service_date: NaiveDate, slot_index: i32) -> String {
    format!("{}#{}", service_date.format("%Y-%m-%d"), slot_index)
}

fn template_window(slot_index: i32) -> (NaiveTime, NaiveTime) {
    let start_hour = 7 + slot_index.clamp(1, SLOTS_PER_DAY) as u32;
    (
        NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(start_hour + 2, 0, 0).unwrap(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_windows() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        let first = Slot::from_template("B", date, 1);
        assert_eq!(first.start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(first.end_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(first.daypart(), Daypart::Morning);

        let last = Slot::from_template("B", date, 8);
        assert_eq!(last.start_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(last.end_time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert_eq!(last.daypart(), Daypart::Afternoon);

        let noon = Slot::from_template("B", date, 5);
        assert_eq!(noon.daypart(), Daypart::Afternoon);
    }

    #[test]
    fn test_slot_code_format() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
        assert_eq!(Slot::from_template("B", date, 3).slot_code(), "2026-02-09#3");
    }
}
