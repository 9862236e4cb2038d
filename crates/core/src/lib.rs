#![forbid(unsafe_code)]

pub mod model;
pub mod threshold;
pub mod time;

pub use time::Clock;
