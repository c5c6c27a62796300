use chrono::Duration;

use crate::error::{internal::InternalError, AppError};

/// Parses a u64 value from String
///
/// # Arguments
/// - `value` - The String to attempt to parse into `u64`
///
/// # Returns
/// - `Ok(u64)` - Successfully parsed String to `u64`
/// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse
///   the string as a u64
pub fn parse_u64_from_string(value: String) -> Result<u64, AppError> {
    let result = value
        .parse::<u64>()
        .map_err(|e| InternalError::ParseStringId { value, source: e })?;

    Ok(result)
}

/// Parses a human duration string such as "30m", "1d", or "1d 6h 30m".
///
/// Accepted unit suffixes are `s` (seconds), `m` (minutes), `h` (hours) and
/// `d` (days). Segments may be separated by whitespace or run together. The
/// whole string must be consumed and the total must be positive.
///
/// # Arguments
/// - `input` - The duration string to parse
///
/// # Returns
/// - `Ok(Duration)` - Total duration across all segments
/// - `Err(AppError::InvalidArgument)` - Empty input, unknown suffix, missing
///   digits, or a zero total
pub fn parse_duration(input: &str) -> Result<Duration, AppError> {
    let invalid =
        || AppError::InvalidArgument(format!("Invalid duration '{}'. Use e.g. 10s, 30m, 6h, 1d.", input));

    let mut total_seconds: i64 = 0;
    let mut digits = String::new();
    let mut seen_segment = false;

    for ch in input.trim().chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_whitespace() {
            if !digits.is_empty() {
                // A number with no unit, e.g. "10 m" is fine but "10" alone is not.
                return Err(invalid());
            }
        } else {
            let value: i64 = digits.parse().map_err(|_| invalid())?;
            digits.clear();

            let unit_seconds = match ch {
                's' | 'S' => 1,
                'm' | 'M' => 60,
                'h' | 'H' => 3600,
                'd' | 'D' => 86_400,
                _ => return Err(invalid()),
            };

            total_seconds = total_seconds
                .checked_add(value.checked_mul(unit_seconds).ok_or_else(invalid)?)
                .ok_or_else(invalid)?;
            seen_segment = true;
        }
    }

    if !digits.is_empty() || !seen_segment || total_seconds <= 0 {
        return Err(invalid());
    }

    Ok(Duration::seconds(total_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_units() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::seconds(10));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("6h").unwrap(), Duration::hours(6));
        assert_eq!(parse_duration("1d").unwrap(), Duration::days(1));
    }

    #[test]
    fn parses_compound_segments() {
        assert_eq!(
            parse_duration("1d 6h 30m").unwrap(),
            Duration::days(1) + Duration::hours(6) + Duration::minutes(30)
        );
        assert_eq!(
            parse_duration("1h30m").unwrap(),
            Duration::minutes(90)
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("banana").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("10x").is_err());
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("m10").is_err());
    }

    #[test]
    fn parses_stored_ids() {
        assert_eq!(parse_u64_from_string("123456789".to_string()).unwrap(), 123456789);
        assert!(parse_u64_from_string("not-an-id".to_string()).is_err());
    }
}
