pub mod builder;
pub mod fetch;
pub mod fusion;
pub mod recommend;
pub mod rehydrate;
pub mod search;
pub mod sync;

mod error;
mod pool;

pub use error::{Error, Result};
pub use pool::{EngineLease, EnginePool};
pub use recommend::{MatchItem, MatchResponse, RecommendRequest};
pub use search::{SearchItem, SearchRequest, SearchResponse};
pub use sync::SyncReport;

use std::sync::Arc;

use time::{Date, OffsetDateTime};

use sr_config::Config;
use sr_domain::{Record, fields::TEXT_FIELD};
use sr_engine::{SearchEngine, elasticsearch::ElasticsearchClient};
use sr_store::{JsonlRecordStore, RecordStore};

use crate::builder::QueryBuilder;

pub struct ScholarService {
	pub cfg: Config,
	pub engine: EnginePool,
	pub store: Arc<dyn RecordStore>,
	builder: QueryBuilder,
}
impl ScholarService {
	pub fn new(cfg: Config, engine: Arc<dyn SearchEngine>, store: Arc<dyn RecordStore>) -> Self {
		let builder = QueryBuilder::from_config(&cfg.search);
		let engine = EnginePool::new(engine, cfg.engine.max_sessions);

		Self { cfg, engine, store, builder }
	}

	/// Wires the Elasticsearch client and the JSON-lines record store from configuration.
	pub fn from_config(cfg: Config) -> Result<Self> {
		let engine = ElasticsearchClient::new(&cfg.engine)?;
		let store = JsonlRecordStore::new(cfg.sync.source_dir.clone());

		Ok(Self::new(cfg, Arc::new(engine), Arc::new(store)))
	}

	fn resolve_size(&self, size: Option<u32>) -> Result<u32> {
		let size = size.unwrap_or(self.cfg.search.default_size);

		if size == 0 || size > self.cfg.search.max_size {
			return Err(Error::InvalidRequest {
				message: format!("size must be between 1 and {}.", self.cfg.search.max_size),
			});
		}

		Ok(size)
	}
}

fn validate_collection(raw: &str) -> Result<&str> {
	let collection = raw.trim();

	if !sr_config::is_index_name(collection) {
		return Err(Error::InvalidRequest {
			message: format!("collection '{raw}' is not a valid collection name."),
		});
	}

	Ok(collection)
}

fn public_source(mut source: Record) -> Record {
	source.remove(TEXT_FIELD);

	source
}

fn today() -> Date {
	OffsetDateTime::now_utc().date()
}
