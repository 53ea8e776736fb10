use sr_service::{ScholarService, SyncReport};

#[derive(Debug, Default)]
pub struct SyncSummary {
	pub reports: Vec<SyncReport>,
	pub failed: Vec<String>,
}

/// Syncs every configured collection once. A failing collection does not stop the others.
pub async fn sync_all(service: &ScholarService) -> SyncSummary {
	let mut summary = SyncSummary::default();

	for collection in &service.cfg.sync.collections {
		match service.sync_collection(collection).await {
			Ok(report) => summary.reports.push(report),
			Err(err) => {
				tracing::warn!(collection = %collection, error = %err, "Collection sync failed.");

				summary.failed.push(collection.clone());
			},
		}
	}

	summary
}

#[cfg(test)]
mod tests {
	use std::{env, fs, sync::Arc};

	use sr_config::{Config, Engine, Search, Service, SyncSource};
	use sr_store::JsonlRecordStore;
	use sr_testkit::MemoryEngine;

	use super::*;

	#[tokio::test]
	async fn failing_collection_does_not_block_others() {
		let dir = env::temp_dir().join(format!("sr_worker_test_{}", std::process::id()));

		fs::create_dir_all(&dir).expect("Failed to create source dir.");
		fs::write(dir.join("scholarships.jsonl"), "{\"id\": \"a\", \"Country\": \"UK\"}\n")
			.expect("Failed to write export.");

		let cfg = Config {
			service: Service {
				http_bind: "127.0.0.1:0".to_string(),
				admin_bind: "127.0.0.1:0".to_string(),
				log_level: "info".to_string(),
			},
			engine: Engine {
				url: "http://localhost:9200".to_string(),
				username: None,
				password: None,
				timeout_ms: 1_000,
				max_sessions: 1,
				accept_invalid_certs: false,
			},
			search: Search {
				default_size: 10,
				max_size: 20,
				deadline_oversample: 5,
				recommend_collection: "scholarships".to_string(),
				keyword_fuzziness: "AUTO".to_string(),
			},
			sync: SyncSource {
				source_dir: dir.clone(),
				batch_size: 10,
				collections: vec!["missing".to_string(), "scholarships".to_string()],
			},
		};
		let engine = Arc::new(MemoryEngine::new());
		let service =
			ScholarService::new(cfg, engine.clone(), Arc::new(JsonlRecordStore::new(&dir)));
		let summary = sync_all(&service).await;

		fs::remove_dir_all(&dir).expect("Failed to clean up.");

		assert_eq!(summary.failed, vec!["missing".to_string()]);
		assert_eq!(summary.reports.len(), 1);
		assert_eq!(engine.document_count("scholarships"), 1);
		assert_eq!(serde_json::to_value(&summary.reports[0]).expect("json")["indexed"], 1);
	}
}
