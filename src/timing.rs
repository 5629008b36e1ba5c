//! Millisecond arithmetic on the wrapping uptime counter.
//!
//! The firmware runs indefinitely, so the 32-bit millisecond counter
//! wraps roughly every 49.7 days.  Every timing comparison in the crate
//! must go through these helpers:
//!
//! ```text
//!   now.wrapping_sub(since) >= duration   correct across the wrap
//!   since + duration <= now               WRONG once `since + duration` overflows
//! ```

/// Milliseconds elapsed from `since` to `now`, tolerant of wraparound.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// `true` once at least `duration` ms have passed since `since`.
#[inline]
pub const fn has_elapsed(now: u32, since: u32, duration: u32) -> bool {
    elapsed_ms(now, since) >= duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_without_wrap() {
        assert_eq!(elapsed_ms(1500, 1000), 500);
        assert!(has_elapsed(1750, 1000, 750));
        assert!(!has_elapsed(1749, 1000, 750));
    }

    #[test]
    fn elapsed_across_wrap() {
        let since = u32::MAX - 99;
        let now = 400;
        assert_eq!(elapsed_ms(now, since), 500);
        assert!(has_elapsed(now, since, 500));
        assert!(!has_elapsed(now, since, 501));
    }
}
