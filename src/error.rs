//! Machine-readable error codes shared by the crate's error enums.

/// Stable code plus a retry hint for an error, so hosts can branch without
/// matching on display strings.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
