//! Rate limiting module
//!
//! Admission control for incoming scrape requests. Each client gets a fixed
//! number of requests per trailing time window; state lives in memory for the
//! lifetime of the process.

mod sliding_window;

pub use sliding_window::{Admission, SlidingWindowLimiter};
