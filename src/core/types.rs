//! Common types used across VitalGuard modules.

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Milliseconds elapsed between two timestamps, saturating at zero.
pub fn millis_between(earlier: Timestamp, later: Timestamp) -> u64 {
    later
        .signed_duration_since(earlier)
        .num_milliseconds()
        .max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_between() {
        let start = now();
        let end = start + chrono::Duration::milliseconds(250);
        assert_eq!(millis_between(start, end), 250);
    }

    #[test]
    fn test_millis_between_saturates() {
        let start = now();
        let end = start - chrono::Duration::milliseconds(250);
        assert_eq!(millis_between(start, end), 0);
    }
}
