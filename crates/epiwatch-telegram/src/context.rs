//! Shared application context injected into command handlers and the
//! scheduled delivery task — one owned service object, no ambient state.

use epiwatch_core::EpiwatchConfig;
use epiwatch_registry::RegistryService;

pub struct AppContext {
    pub config: EpiwatchConfig,
    pub registry: RegistryService,
}
