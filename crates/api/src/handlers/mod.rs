pub mod health;
pub mod zones;

pub use health::health_check;
pub use zones::reload_zones;
