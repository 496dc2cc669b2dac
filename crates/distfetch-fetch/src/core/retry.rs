use std::time::Duration;

/// Delay before moving on to the next candidate, using exponential
/// backoff: `base * 2^failures`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use distfetch_fetch::retry_delay;
///
/// assert_eq!(retry_delay(0, Duration::from_millis(100)), Duration::from_millis(100));
/// assert_eq!(retry_delay(1, Duration::from_millis(100)), Duration::from_millis(200));
/// assert_eq!(retry_delay(2, Duration::from_millis(100)), Duration::from_millis(400));
/// ```
pub fn retry_delay(failures: u32, base: Duration) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(failures))
}
