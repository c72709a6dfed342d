use chrono::Weekday;
use serde::Serialize;

/// Wednesday is shared capacity: every zone may run jobs on it.
pub const FLEX_WEEKDAY: Weekday = Weekday::Wed;

#[derive(Debug, Clone, Serialize)]
pub struct ServiceZone {
    pub code: String,
    pub name: String,
    #[serde(skip)]
    pub main_weekday: Weekday,
    pub adjacent: Vec<String>,
    pub second_tier: Vec<String>,
}

/// Fixed territory layout. Zones are laid out west to east (A-B-C-D),
/// adjacency is 1 hop along that line, second tier is 2 hops. `X` holds
/// test/debug data and never borrows capacity from real zones.
#[derive(Debug, Clone)]
pub struct ZoneDirectory {
    zones: Vec<ServiceZone>,
}

impl ZoneDirectory {
    pub fn standard() -> Self {
        let zones = vec![
            zone("A", "North", Weekday::Thu, &["B"], &["C"]),
            zone("B", "Central", Weekday::Mon, &["A", "C"], &["D"]),
            zone("C", "East", Weekday::Tue, &["B", "D"], &["A"]),
            zone("D", "South", Weekday::Fri, &["C"], &["B"]),
            zone("X", "Test", FLEX_WEEKDAY, &[], &[]),
        ];
        Self { zones }
    }

    pub fn get(&self, code: &str) -> Option<&ServiceZone> {
        self.zones.iter().find(|z| z.code == code)
    }

    pub fn all(&self) -> &[ServiceZone] {
        &self.zones
    }

    /// The zone itself plus its pressure-valve fallbacks, deduplicated,
    /// in declaration order.
    pub fn reachable<'a>(&'a self, origin: &'a ServiceZone) -> Vec<&'a ServiceZone> {
        let mut out: Vec<&ServiceZone> = vec![origin];
        for code in origin.adjacent.iter().chain(origin.second_tier.iter()) {
            if let Some(z) = self.get(code) {
                if !out.iter().any(|existing| existing.code == z.code) {
                    out.push(z);
                }
            }
        }
        out
    }
}

fn zone(code: &str, name: &str, main_weekday: Weekday, adjacent: &[&str], second_tier: &[&str]) -> ServiceZone {
    ServiceZone {
        code: code.to_string(),
        name: name.to_string(),
        main_weekday,
        adjacent: adjacent.iter().map(|s| s.to_string()).collect(),
        second_tier: second_tier.iter().map(|s| s.to_string()).collect(),
    }
}
