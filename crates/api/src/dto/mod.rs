pub mod reload;

pub use reload::{HealthResponse, ReloadResponse};
