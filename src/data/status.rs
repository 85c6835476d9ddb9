//! Unit status classification.
//!
//! This module maps one unit snapshot to an operational status using a
//! strict priority chain with configurable limits.

use serde::Serialize;

use super::dwell::parse_dwell;
use crate::source::UnitSnapshot;

/// Limits for status classification.
///
/// These determine when a unit is considered speeding or dwelling too long.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Speed above which a unit is in violation, in km/h.
    pub speed_limit_kmh: f64,
    /// Dwell limit applied when a unit carries no per-unit override, in minutes.
    pub dwell_default_minutes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            speed_limit_kmh: 100.0,
            dwell_default_minutes: 120,
        }
    }
}

/// Operational status of a unit, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UnitStatus {
    /// Flagged for maintenance; dominates every other condition.
    InMaintenance,
    /// Moving above the fleet speed limit.
    SpeedViolation { speed_kmh: f64 },
    /// Moving with no driver of record.
    UnauthorizedMovement,
    /// Stopped past its dwell limit.
    DwellExceeded {
        dwell_minutes: u64,
        limit_minutes: u64,
    },
    /// Stopped within its dwell limit.
    Stopped { dwell_raw: String },
    /// Moving normally with an assigned driver.
    EnRoute,
}

impl UnitStatus {
    /// Returns a short label for display and history rows.
    pub fn symbol(&self) -> &'static str {
        match self {
            UnitStatus::InMaintenance => "MAINT",
            UnitStatus::SpeedViolation { .. } => "SPEED",
            UnitStatus::UnauthorizedMovement => "UNAUTH",
            UnitStatus::DwellExceeded { .. } => "DWELL",
            UnitStatus::Stopped { .. } => "STOP",
            UnitStatus::EnRoute => "ROUTE",
        }
    }

    /// Whether this status qualifies for a dwell alert.
    pub fn is_dwell_exceeded(&self) -> bool {
        matches!(self, UnitStatus::DwellExceeded { .. })
    }
}

/// Classify one unit snapshot against the given limits.
///
/// Evaluated as a strict priority chain, first match wins. The function is
/// total: malformed or absent fields degrade to safe defaults instead of
/// failing classification for the whole snapshot.
pub fn classify(unit: &UnitSnapshot, limits: &Limits) -> UnitStatus {
    if unit.in_maintenance {
        return UnitStatus::InMaintenance;
    }

    let speed = unit.speed();
    if speed > limits.speed_limit_kmh {
        return UnitStatus::SpeedViolation { speed_kmh: speed };
    }

    if speed > 0.0 && !unit.has_driver() {
        return UnitStatus::UnauthorizedMovement;
    }

    if speed == 0.0 {
        let dwell_minutes = parse_dwell(&unit.dwell_raw);
        let limit_minutes = unit.dwell_limit(limits.dwell_default_minutes);
        if dwell_minutes > limit_minutes {
            return UnitStatus::DwellExceeded {
                dwell_minutes,
                limit_minutes,
            };
        }
        return UnitStatus::Stopped {
            dwell_raw: unit.dwell_raw.clone(),
        };
    }

    UnitStatus::EnRoute
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> UnitSnapshot {
        UnitSnapshot {
            driver: "Ana Torres".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_maintenance_dominates_speeding() {
        let u = UnitSnapshot {
            in_maintenance: true,
            speed_kmh: 200.0,
            ..unit()
        };
        assert_eq!(classify(&u, &Limits::default()), UnitStatus::InMaintenance);
    }

    #[test]
    fn test_speed_violation() {
        let u = UnitSnapshot {
            speed_kmh: 130.0,
            ..unit()
        };
        assert_eq!(
            classify(&u, &Limits::default()),
            UnitStatus::SpeedViolation { speed_kmh: 130.0 }
        );
    }

    #[test]
    fn test_moving_without_driver() {
        let u = UnitSnapshot {
            speed_kmh: 50.0,
            driver: String::new(),
            ..Default::default()
        };
        assert_eq!(
            classify(&u, &Limits::default()),
            UnitStatus::UnauthorizedMovement
        );
    }

    #[test]
    fn test_dwell_exceeded() {
        let u = UnitSnapshot {
            speed_kmh: 0.0,
            dwell_raw: "3h".to_string(),
            dwell_limit_minutes: Some(120),
            ..unit()
        };
        assert_eq!(
            classify(&u, &Limits::default()),
            UnitStatus::DwellExceeded {
                dwell_minutes: 180,
                limit_minutes: 120
            }
        );
    }

    #[test]
    fn test_stopped_within_limit() {
        let u = UnitSnapshot {
            dwell_raw: "45m".to_string(),
            ..unit()
        };
        assert_eq!(
            classify(&u, &Limits::default()),
            UnitStatus::Stopped {
                dwell_raw: "45m".to_string()
            }
        );
    }

    #[test]
    fn test_en_route() {
        let u = UnitSnapshot {
            speed_kmh: 80.0,
            ..unit()
        };
        assert_eq!(classify(&u, &Limits::default()), UnitStatus::EnRoute);
    }

    #[test]
    fn test_stopped_without_driver_is_not_unauthorized() {
        // Unauthorized movement requires movement
        let u = UnitSnapshot::default();
        assert_eq!(
            classify(&u, &Limits::default()),
            UnitStatus::Stopped {
                dwell_raw: String::new()
            }
        );
    }

    #[test]
    fn test_per_unit_override_beats_default() {
        let u = UnitSnapshot {
            dwell_raw: "2h".to_string(),
            dwell_limit_minutes: Some(30),
            ..unit()
        };
        assert!(classify(&u, &Limits::default()).is_dwell_exceeded());
    }
}
