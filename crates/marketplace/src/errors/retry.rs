/// Classification for retry policy.
///
/// Used by [`with_retry`](crate::retry::with_retry) to decide whether a
/// failed attempt is worth repeating.
///
/// # Behavior Summary
///
/// | Class | Retry? | Backoff |
/// |-------|--------|---------|
/// | `Never` | No | - |
/// | `WithBackoff` | Yes | base_delay * 2^attempt |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad input, rejected credential, missing resource.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Retry with exponential backoff.
    ///
    /// Used for transient errors like rate limiting (429), timeouts, and
    /// 5xx provider responses. Each attempt doubles the delay of the
    /// previous one.
    WithBackoff,
}
