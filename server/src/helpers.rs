use std::{
    fmt::Display,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

/// Parses an optional raw variable value, falling back to `default` when it is
/// absent, empty or malformed.
pub fn parse_or_default<T>(var_name: &str, value: Option<&str>, default: T) -> T
where
    T: Display + FromStr,
    <T as FromStr>::Err: Display,
{
    let value = match value.map(str::trim).filter(|val| !val.is_empty()) {
        Some(value) => value,
        None => return default,
    };

    match T::from_str(value) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(
                "Error reading \"{}\" env var. Defaulting to \"{}\". Error details: {}",
                var_name,
                default,
                error
            );
            default
        }
    }
}

/// Accepts the usual spellings of a boolean flag, including integers (non-zero is true).
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    match value.parse::<i64>() {
        Ok(number) => number != 0,
        Err(_) => matches!(value.as_str(), "true" | "yes" | "y" | "on"),
    }
}

/// Current UTC wall-clock time in fractional epoch seconds.
///
/// Both the sample timestamps and the window cutoff are taken from this clock.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_or_missing_values_fall_back_to_default() {
        assert_eq!(parse_or_default("X", None, 300u64), 300);
        assert_eq!(parse_or_default("X", Some("  "), 300u64), 300);
        assert_eq!(parse_or_default("X", Some("five"), 300u64), 300);
        assert_eq!(parse_or_default("X", Some(" 60 "), 300u64), 60);
    }

    #[test]
    fn flags_accept_numbers_and_words() {
        assert!(parse_flag("1"));
        assert!(parse_flag("42"));
        assert!(parse_flag("True"));
        assert!(parse_flag(" on "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("nope"));
    }

    #[test]
    fn unix_now_is_after_2020() {
        assert!(unix_now() > 1_577_836_800.0);
    }
}
