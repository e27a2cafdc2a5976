use chrono::{DateTime, NaiveTime, TimeZone, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence, starting at a random offset
///
/// IDs from one process are unique as long as it issues at most 4096 per
/// millisecond.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::LazyLock;
    use std::sync::atomic::{AtomicU32, Ordering};

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    static SEQUENCE: LazyLock<AtomicU32> =
        LazyLock::new(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x1000)));

    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = i64::from(SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xFFF); // 12 bits
    (ts << 12) | seq
}

/// Millisecond timestamp as a UTC datetime (epoch on out-of-range input)
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}

/// Start of the UTC day containing `millis`
pub fn start_of_day_millis(millis: i64) -> i64 {
    millis_to_utc(millis)
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

/// Normalise a storefront slug: lowercase, anything outside `[a-z0-9-]`
/// becomes `-`.
pub fn sanitize_slug(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// `#rrggbb` colour check
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_is_positive_and_safe_for_js() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1_i64 << 53));
    }

    #[test]
    fn test_snowflake_ids_unique_within_burst() {
        // A large checkout: one order id plus a line id per item, many times over
        let ids: Vec<i64> = (0..2048).map(|_| snowflake_id()).collect();
        let unique: std::collections::HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_start_of_day() {
        // 2025-03-14 15:09:26.535 UTC
        let ts = 1_741_964_966_535;
        assert_eq!(start_of_day_millis(ts), 1_741_910_400_000);
        assert_eq!(start_of_day_millis(1_741_910_400_000), 1_741_910_400_000);
    }

    #[test]
    fn test_sanitize_slug() {
        assert_eq!(sanitize_slug("Chez Luca"), "chez-luca");
        assert_eq!(sanitize_slug("  Pizza_Bar #1 "), "pizza-bar--1");
        assert_eq!(sanitize_slug("already-ok-42"), "already-ok-42");
        assert_eq!(sanitize_slug("Café"), "caf-");
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#ff5500"));
        assert!(is_hex_color("#A1b2C3"));
        assert!(!is_hex_color("ff5500"));
        assert!(!is_hex_color("#fff"));
        assert!(!is_hex_color("#gg0000"));
    }
}
