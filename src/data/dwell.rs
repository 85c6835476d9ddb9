//! Dwell token parsing.
//!
//! Telemetry feeds report how long a unit has been stopped as a free-form
//! token like `"1d2h30m"`. This parser is total: anything it cannot make
//! sense of contributes zero minutes rather than an error.

/// Suffix to minutes multiplier.
const UNITS: &[(char, u64)] = &[('d', 1440), ('h', 60), ('m', 1)];

/// Parse a dwell token like "1d2h30m" into total minutes.
///
/// Each `<digits>d`, `<digits>h`, `<digits>m` component is matched
/// independently, in any order. Duplicated suffixes take the last match.
/// Unknown text between components is ignored. An empty or missing token
/// parses as zero.
pub fn parse_dwell(token: &str) -> u64 {
    let mut parts: [Option<u64>; 3] = [None; 3];

    let mut digits = String::new();
    for ch in token.trim().chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if let Some(idx) = UNITS.iter().position(|(suffix, _)| *suffix == ch) {
            if !digits.is_empty() {
                // u64 parse of ASCII digits only fails on overflow
                if let Ok(value) = digits.parse::<u64>() {
                    parts[idx] = Some(value);
                }
            }
        }
        digits.clear();
    }

    UNITS
        .iter()
        .zip(parts.iter())
        .map(|((_, multiplier), value)| value.unwrap_or(0).saturating_mul(*multiplier))
        .fold(0u64, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_zero() {
        assert_eq!(parse_dwell(""), 0);
        assert_eq!(parse_dwell("   "), 0);
    }

    #[test]
    fn test_full_token() {
        assert_eq!(parse_dwell("2d3h15m"), 2 * 1440 + 3 * 60 + 15);
    }

    #[test]
    fn test_minutes_only() {
        assert_eq!(parse_dwell("45m"), 45);
    }

    #[test]
    fn test_hours_only() {
        assert_eq!(parse_dwell("3h"), 180);
    }

    #[test]
    fn test_order_independent() {
        assert_eq!(parse_dwell("3h2d"), parse_dwell("2d3h"));
        assert_eq!(parse_dwell("15m1h"), 75);
    }

    #[test]
    fn test_unknown_suffixes_ignored() {
        assert_eq!(parse_dwell("5x30m"), 30);
        assert_eq!(parse_dwell("approx 2h"), 120);
    }

    #[test]
    fn test_garbage_is_zero() {
        assert_eq!(parse_dwell("no idea"), 0);
        assert_eq!(parse_dwell("dhm"), 0);
    }

    #[test]
    fn test_duplicate_suffix_last_wins() {
        assert_eq!(parse_dwell("1h2h"), 120);
    }
}
