//! Format handlers

mod json;
#[cfg(feature = "sjson")]
mod sjson;
#[cfg(feature = "yaml")]
mod yaml;

pub use self::json::JsonHandler;
#[cfg(feature = "sjson")]
pub use self::sjson::SjsonHandler;
#[cfg(feature = "yaml")]
pub use self::yaml::YamlHandler;
