use std::{ops::Deref, sync::Arc};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use sr_engine::SearchEngine;

use crate::{Error, Result};

/// Shared engine client plus a bound on concurrently leased sessions.
#[derive(Clone)]
pub struct EnginePool {
	engine: Arc<dyn SearchEngine>,
	permits: Arc<Semaphore>,
}
impl EnginePool {
	pub fn new(engine: Arc<dyn SearchEngine>, max_sessions: u32) -> Self {
		Self { engine, permits: Arc::new(Semaphore::new(max_sessions.max(1) as usize)) }
	}

	/// Waits for a free session. The session is returned when the lease drops.
	pub async fn acquire(&self) -> Result<EngineLease> {
		let permit = self.permits.clone().acquire_owned().await.map_err(|_| {
			Error::EngineUnavailable { message: "Engine pool is closed.".to_string() }
		})?;

		Ok(EngineLease { engine: self.engine.clone(), _permit: permit })
	}

	pub fn available(&self) -> usize {
		self.permits.available_permits()
	}
}

pub struct EngineLease {
	engine: Arc<dyn SearchEngine>,
	_permit: OwnedSemaphorePermit,
}
impl Deref for EngineLease {
	type Target = dyn SearchEngine;

	fn deref(&self) -> &Self::Target {
		self.engine.as_ref()
	}
}
