//! Request middleware: identity resolution and rate limiting.

pub mod identity;
pub mod rate_limit;
