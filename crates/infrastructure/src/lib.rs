pub mod dns;
pub mod system;
pub mod zones;
