use proxyzone_dns_application::use_cases::ReloadZonesUseCase;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub reload_zones: Arc<ReloadZonesUseCase>,
}
