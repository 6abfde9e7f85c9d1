/// Returns the current timestamp in microseconds since the UNIX epoch
/// (January 1, 1970).
///
/// Falls back to `0` for clocks set before the epoch.
///
/// # Example:
/// ```rust
/// use h224::utils::now;
/// let timestamp = now(); // Gets the current time in microseconds
/// ```
pub fn now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_micros()).unwrap_or(0)
}
