mod reload;

pub use reload::{ReloadSummary, ReloadZonesUseCase};
