//! Per-user request rate limiting.

mod limiter;
mod window;

pub use limiter::RateLimiter;
pub use window::{Quota, SlidingWindow};
