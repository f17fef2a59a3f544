#![forbid(unsafe_code)]

pub mod model;
pub mod nav;
pub mod progress;
pub mod time;

pub use time::Clock;
