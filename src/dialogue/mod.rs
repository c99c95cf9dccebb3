//! Local dialogue handling: canned replies and pattern recognizers

pub mod canned;
pub mod patterns;

pub use canned::{CannedEntry, CannedResponder, CannedValue};
pub use patterns::{
    extract_weather_city, is_gibberish, is_pronunciation_request, pronunciation_target,
    WeatherQuery,
};
