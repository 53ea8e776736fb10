use std::sync::Arc;

use sr_service::ScholarService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ScholarService>,
}
impl AppState {
	pub fn new(config: sr_config::Config) -> color_eyre::Result<Self> {
		let service = ScholarService::from_config(config)?;

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: ScholarService) -> Self {
		Self { service: Arc::new(service) }
	}
}
