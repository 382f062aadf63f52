mod client;
mod throttle;

pub use client::ThrottledClient;
pub use throttle::Throttle;
