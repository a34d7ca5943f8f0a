#![forbid(unsafe_code)]

pub mod catalog;
pub mod certificate;
pub mod error;
pub mod model;
pub mod playback;
pub mod time;

pub use error::Error;
pub use time::Clock;
