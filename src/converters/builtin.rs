//! Converters registered by default.

use super::{BUILTIN_PRIORITY, ConverterRegistry, FromStrConverter};
use crate::error::ConversionError;
use std::path::PathBuf;
use std::time::Duration;

type Converted<T> = Result<T, ConversionError>;

pub(super) fn register_all(registry: &mut ConverterRegistry) {
    registry.register(BUILTIN_PRIORITY, |v: &str| -> Converted<String> {
        Ok(v.to_string())
    });
    registry.register(BUILTIN_PRIORITY, convert_bool);
    registry.register(BUILTIN_PRIORITY, convert_char);
    registry.register(BUILTIN_PRIORITY, |v: &str| -> Converted<PathBuf> {
        Ok(PathBuf::from(v))
    });
    registry.register(BUILTIN_PRIORITY, parse_duration);
    registry.register(BUILTIN_PRIORITY, FromStrConverter::<f32>::new());
    registry.register(BUILTIN_PRIORITY, FromStrConverter::<f64>::new());

    macro_rules! integers {
        ($($t:ty),*) => {
            $(
                registry.register(BUILTIN_PRIORITY, |v: &str| -> Converted<$t> {
                    let v = v.trim();
                    let (negative, digits) = match v.strip_prefix('-') {
                        Some(rest) => (true, rest),
                        None => (false, v.strip_prefix('+').unwrap_or(v)),
                    };
                    let parsed = match digits
                        .strip_prefix("0x")
                        .or_else(|| digits.strip_prefix("0X"))
                    {
                        Some(hex) if negative => <$t>::from_str_radix(&format!("-{}", hex), 16),
                        Some(hex) => <$t>::from_str_radix(hex, 16),
                        None => v.parse::<$t>(),
                    };
                    parsed.map_err(|e| ConversionError::new(e.to_string()))
                });
            )*
        };
    }

    integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
}

fn convert_bool(value: &str) -> Converted<bool> {
    let value = value.trim();
    Ok(["true", "1", "yes", "y", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t)))
}

fn convert_char(value: &str) -> Converted<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConversionError::new(format!(
            "expected exactly one character, got '{}'",
            value
        ))),
    }
}

/// Parse a duration.
///
/// Accepted forms:
/// - a bare number of seconds (`30`)
/// - a number with a unit suffix: `ms`, `s`, `m`, `h`, `d` (`250ms`, `5m`)
/// - an ISO-8601 duration (`PT1H30M`, `P1DT2H`, `PT0.5S`)
///
/// # Errors
///
/// Returns a `ConversionError` for anything else.
///
/// # Examples
///
/// ```rust
/// use ordinal_config::converters::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
/// assert_eq!(parse_duration("PT1M30S").unwrap(), Duration::from_secs(90));
/// ```
pub fn parse_duration(value: &str) -> Converted<Duration> {
    let value = value.trim();
    let invalid = || ConversionError::new(format!("invalid duration '{}'", value));

    if value.starts_with(['P', 'p']) {
        return parse_iso_duration(&value[1..]).ok_or_else(invalid);
    }

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let amount: u64 = number.parse().map_err(|_| invalid())?;

    let scale = |factor: u64| {
        amount
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| ConversionError::new(format!("duration '{}' is too large", value)))
    };

    match unit {
        "" | "s" => Ok(Duration::from_secs(amount)),
        "ms" => Ok(Duration::from_millis(amount)),
        "m" => scale(60),
        "h" => scale(3600),
        "d" => scale(86_400),
        _ => Err(invalid()),
    }
}

/// Parse the part of an ISO-8601 duration after the leading `P`.
fn parse_iso_duration(body: &str) -> Option<Duration> {
    let upper = body.to_ascii_uppercase();
    let (date, time) = match upper.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (upper.as_str(), None),
    };

    let mut seconds = 0f64;
    let mut seen = false;

    if !date.is_empty() {
        let days: f64 = date.strip_suffix('D')?.parse().ok()?;
        seconds += days * 86_400.0;
        seen = true;
    }

    if let Some(mut time) = time {
        if time.is_empty() {
            return None;
        }
        while !time.is_empty() {
            let end = time.find(['H', 'M', 'S'])?;
            let amount: f64 = time[..end].parse().ok()?;
            seconds += match &time[end..=end] {
                "H" => amount * 3600.0,
                "M" => amount * 60.0,
                _ => amount,
            };
            time = &time[end + 1..];
            seen = true;
        }
    }

    if !seen || seconds < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(seconds).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ConverterRegistry {
        ConverterRegistry::with_builtins()
    }

    #[test]
    fn test_bool_values() {
        let registry = registry();
        for truthy in ["true", "TRUE", "1", "yes", "Y", "on"] {
            assert!(registry.convert::<bool>("k", truthy).unwrap(), "{truthy}");
        }
        for falsy in ["false", "0", "no", "off", "banana"] {
            assert!(!registry.convert::<bool>("k", falsy).unwrap(), "{falsy}");
        }
    }

    #[test]
    fn test_integers() {
        let registry = registry();
        assert_eq!(registry.convert::<i32>("k", " -42 ").unwrap(), -42);
        assert_eq!(registry.convert::<u8>("k", "0xff").unwrap(), 255);
        assert_eq!(registry.convert::<i16>("k", "-0x10").unwrap(), -16);
        assert_eq!(registry.convert::<u64>("k", "+7").unwrap(), 7);
        assert!(registry.convert::<u8>("k", "256").is_err());
        assert!(registry.convert::<u32>("k", "-1").is_err());
    }

    #[test]
    fn test_floats_strings_paths() {
        let registry = registry();
        assert_eq!(registry.convert::<f64>("k", "2.5").unwrap(), 2.5);
        assert_eq!(registry.convert::<String>("k", " keep ").unwrap(), " keep ");
        assert_eq!(
            registry.convert::<PathBuf>("k", "/etc/app").unwrap(),
            PathBuf::from("/etc/app")
        );
    }

    #[test]
    fn test_char() {
        let registry = registry();
        assert_eq!(registry.convert::<char>("k", "x").unwrap(), 'x');
        assert!(registry.convert::<char>("k", "xy").is_err());
        assert!(registry.convert::<char>("k", "").is_err());
    }

    #[test]
    fn test_duration_forms() {
        assert_eq!(parse_duration("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("PT1H30M").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("P1DT1S").unwrap(), Duration::from_secs(86_401));
        assert_eq!(parse_duration("pt0.5s").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_durations() {
        for bad in ["", "5x", "ms", "P", "PT", "PT5", "P1H", "-5s"] {
            assert!(parse_duration(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_oversized_durations_are_errors() {
        for huge in [
            "999999999999999999m",
            "18446744073709551615h",
            "999999999999999999d",
            "PT1e400S",
            "P99999999999999999999D",
        ] {
            assert!(parse_duration(huge).is_err(), "{huge}");
        }
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }
}
