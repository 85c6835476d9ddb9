//! Shared types for fleet telemetry snapshots.
//!
//! These types match the JSON produced by the upstream tracking feed. Field
//! aliases accept the feed's original Spanish keys so an unmodified
//! `unidades.json` deserializes directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel driver value used by the feed for an unassigned unit.
pub const UNASSIGNED_DRIVER: &str = "Sin Asignar";

/// A complete snapshot of fleet state, keyed by unit id.
///
/// Unit ids are short strings, unique within a snapshot and stable across
/// ticks. If the feed reuses or renames an id, prior history and alert
/// cooldown association is not reconciled.
pub type FleetSnapshot = BTreeMap<String, UnitSnapshot>;

/// GPS position of a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

/// Telemetry for one unit at one point in time.
///
/// Every field is optional in the feed; missing values degrade to safe
/// defaults (zero speed, unassigned driver, zero dwell) rather than failing
/// deserialization for the whole snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitSnapshot {
    /// Current speed in km/h. Negative or non-finite values from the feed
    /// are treated as zero.
    #[serde(default, alias = "velocidad")]
    pub speed_kmh: f64,

    /// Driver of record. Empty or the feed sentinel means unassigned.
    #[serde(default, alias = "chofer")]
    pub driver: String,

    /// Unit is flagged for maintenance.
    #[serde(default, alias = "en_mantenimiento")]
    pub in_maintenance: bool,

    /// Free-form dwell duration token, e.g. "1d2h30m".
    #[serde(default, alias = "tiempo_detenido")]
    pub dwell_raw: String,

    /// Per-unit dwell limit override in minutes.
    #[serde(default, alias = "limite_detencion", skip_serializing_if = "Option::is_none")]
    pub dwell_limit_minutes: Option<u64>,

    /// Free-text location description.
    #[serde(default, alias = "referencia")]
    pub reference: String,

    #[serde(default, alias = "posicion")]
    pub position: Position,

    // Display-only fields, never used by classification.
    #[serde(default, alias = "placas", skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(default, alias = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, alias = "origen", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, alias = "destino", skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, alias = "eta_minutos", skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<u64>,
}

impl UnitSnapshot {
    /// Speed clamped to the non-negative finite range.
    pub fn speed(&self) -> f64 {
        if self.speed_kmh.is_finite() && self.speed_kmh > 0.0 {
            self.speed_kmh
        } else {
            0.0
        }
    }

    /// Whether a real driver is assigned.
    pub fn has_driver(&self) -> bool {
        let driver = self.driver.trim();
        !driver.is_empty() && driver != UNASSIGNED_DRIVER
    }

    /// Dwell limit for this unit, falling back to the fleet default.
    ///
    /// The result is always positive: a zero override is treated as absent.
    pub fn dwell_limit(&self, default_minutes: u64) -> u64 {
        match self.dwell_limit_minutes {
            Some(limit) if limit > 0 => limit,
            _ => default_minutes.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_feed_shape() {
        let json = r#"{
            "U-101": {
                "placas": "ABC-123",
                "origen": "CDMX",
                "destino": "Monterrey",
                "posicion": { "lat": 19.43, "lon": -99.13 },
                "eta_minutos": 240,
                "chofer": "Juan Perez",
                "velocidad": 88.5,
                "tiempo_detenido": "0m",
                "referencia": "Km 42 carretera 57"
            }
        }"#;

        let snapshot: FleetSnapshot = serde_json::from_str(json).unwrap();
        let unit = snapshot.get("U-101").unwrap();
        assert_eq!(unit.plate.as_deref(), Some("ABC-123"));
        assert_eq!(unit.speed(), 88.5);
        assert!(unit.has_driver());
        assert!(!unit.in_maintenance);
        assert_eq!(unit.eta_minutes, Some(240));
    }

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{ "U-1": {} }"#;
        let snapshot: FleetSnapshot = serde_json::from_str(json).unwrap();
        let unit = snapshot.get("U-1").unwrap();
        assert_eq!(unit.speed(), 0.0);
        assert!(!unit.has_driver());
        assert_eq!(unit.dwell_raw, "");
        assert_eq!(unit.dwell_limit(120), 120);
    }

    #[test]
    fn test_sentinel_driver_is_unassigned() {
        let unit = UnitSnapshot {
            driver: UNASSIGNED_DRIVER.to_string(),
            ..Default::default()
        };
        assert!(!unit.has_driver());
    }

    #[test]
    fn test_negative_speed_clamped() {
        let unit = UnitSnapshot {
            speed_kmh: -3.0,
            ..Default::default()
        };
        assert_eq!(unit.speed(), 0.0);
    }

    #[test]
    fn test_zero_limit_override_falls_back() {
        let unit = UnitSnapshot {
            dwell_limit_minutes: Some(0),
            ..Default::default()
        };
        assert_eq!(unit.dwell_limit(120), 120);
        // Default itself is kept positive even if misconfigured to zero
        assert_eq!(unit.dwell_limit(0), 1);
    }
}
