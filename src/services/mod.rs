pub mod gateway;
pub mod prompt;
pub mod rate_limiter;
pub mod validation;
