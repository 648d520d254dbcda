pub mod config;
pub mod error;
pub mod export;
pub mod imaging;
pub mod input_config;
pub mod pr_analysis;
pub mod receipt;
pub mod routes;
pub mod service;
pub mod styles;
pub mod telemetry;

use std::sync::Arc;

use config::Config;
use input_config::InputConfigStore;
use service::ReceiptService;
use styles::StyleStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service: Arc<ReceiptService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let service = ReceiptService::new(
            StyleStore::new(config.styles_dir.clone()),
            InputConfigStore::new(config.receipt_input_path.clone()),
            config.image_settings(),
        );

        Self {
            config,
            service: Arc::new(service),
        }
    }
}
