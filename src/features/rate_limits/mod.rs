pub mod limiter;

pub use limiter::{EndpointClass, FixedWindowLimiter, RateLimitDecision, RateLimitPolicy};
