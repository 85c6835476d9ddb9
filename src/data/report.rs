//! Read-only report projections over a fleet snapshot.
//!
//! These carry no state of their own: a collaborator hands in the current
//! snapshot and gets tabular rows back for formatting. Classification is
//! re-derived with the same limits the monitor uses.

use super::dwell::parse_dwell;
use super::status::{classify, Limits, UnitStatus};
use crate::source::{FleetSnapshot, UnitSnapshot};

/// One tabular row describing a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRow {
    pub unit_id: String,
    pub status: UnitStatus,
    pub speed_kmh: f64,
    pub driver: String,
    pub dwell_minutes: u64,
    pub reference: String,
    /// Display-only extras carried through from the feed.
    pub plate: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub eta_minutes: Option<u64>,
    /// Link to the unit's position, as shown in unit detail views.
    pub maps_link: String,
}

fn row(unit_id: &str, unit: &UnitSnapshot, limits: &Limits) -> UnitRow {
    UnitRow {
        unit_id: unit_id.to_string(),
        status: classify(unit, limits),
        speed_kmh: unit.speed(),
        driver: unit.driver.clone(),
        dwell_minutes: parse_dwell(&unit.dwell_raw),
        reference: unit.reference.clone(),
        plate: unit.plate.clone(),
        origin: unit.origin.clone(),
        destination: unit.destination.clone(),
        eta_minutes: unit.eta_minutes,
        maps_link: format!(
            "https://maps.google.com/?q={},{}",
            unit.position.lat, unit.position.lon
        ),
    }
}

/// All units, in snapshot (unit id) order.
pub fn all_units(snapshot: &FleetSnapshot, limits: &Limits) -> Vec<UnitRow> {
    snapshot.iter().map(|(id, unit)| row(id, unit, limits)).collect()
}

/// Units stopped past their dwell limit, sorted by dwell minutes descending.
pub fn dwell_exceeded(snapshot: &FleetSnapshot, limits: &Limits) -> Vec<UnitRow> {
    let mut rows: Vec<UnitRow> = snapshot
        .iter()
        .map(|(id, unit)| row(id, unit, limits))
        .filter(|r| r.status.is_dwell_exceeded())
        .collect();
    rows.sort_by(|a, b| b.dwell_minutes.cmp(&a.dwell_minutes));
    rows
}

/// Units currently flagged for maintenance.
pub fn in_maintenance(snapshot: &FleetSnapshot, limits: &Limits) -> Vec<UnitRow> {
    snapshot
        .iter()
        .map(|(id, unit)| row(id, unit, limits))
        .filter(|r| r.status == UnitStatus::InMaintenance)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopped(dwell: &str) -> UnitSnapshot {
        UnitSnapshot {
            driver: "Luis".to_string(),
            dwell_raw: dwell.to_string(),
            ..Default::default()
        }
    }

    fn fleet() -> FleetSnapshot {
        let mut snapshot = FleetSnapshot::new();
        snapshot.insert("U-1".to_string(), stopped("5h"));
        snapshot.insert("U-2".to_string(), stopped("10m"));
        snapshot.insert("U-3".to_string(), stopped("8h"));
        snapshot.insert(
            "U-4".to_string(),
            UnitSnapshot {
                in_maintenance: true,
                // Maintenance excludes a unit from the dwell view even when
                // its dwell is over the limit
                dwell_raw: "9h".to_string(),
                ..Default::default()
            },
        );
        snapshot
    }

    #[test]
    fn test_dwell_exceeded_sorted_descending() {
        let rows = dwell_exceeded(&fleet(), &Limits::default());
        let ids: Vec<&str> = rows.iter().map(|r| r.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["U-3", "U-1"]);
    }

    #[test]
    fn test_maintenance_view() {
        let rows = in_maintenance(&fleet(), &Limits::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit_id, "U-4");
    }

    #[test]
    fn test_all_units_in_id_order() {
        let rows = all_units(&fleet(), &Limits::default());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].unit_id, "U-1");
        assert_eq!(rows[3].unit_id, "U-4");
    }

    #[test]
    fn test_maps_link() {
        let mut snapshot = FleetSnapshot::new();
        let mut unit = stopped("0m");
        unit.position.lat = 19.43;
        unit.position.lon = -99.13;
        snapshot.insert("U-1".to_string(), unit);

        let rows = all_units(&snapshot, &Limits::default());
        assert_eq!(rows[0].maps_link, "https://maps.google.com/?q=19.43,-99.13");
    }
}
