use std::collections::HashMap;

use sr_domain::Record;
use sr_engine::SearchEngine;

pub const BATCH_LOAD_FAILED: &str =
	"Unable to batch load sources; using inline engine sources when available.";

#[derive(Debug, Default)]
pub struct Rehydrated {
	pub sources: HashMap<String, Record>,
	pub warnings: Vec<String>,
}

/// Resolves `ids` with a single multi-get. Never fails: a failed call yields an empty
/// mapping plus a warning.
pub async fn rehydrate(engine: &dyn SearchEngine, collection: &str, ids: &[String]) -> Rehydrated {
	if ids.is_empty() {
		return Rehydrated::default();
	}

	match engine.multi_get(collection, ids).await {
		Ok(sources) => {
			let mut warnings = Vec::new();

			if sources.len() < ids.len() {
				tracing::debug!(
					collection,
					requested = ids.len(),
					resolved = sources.len(),
					"Partial source resolution."
				);

				warnings.push(format!("Resolved {} of {} requested sources.", sources.len(), ids.len()));
			}

			Rehydrated { sources, warnings }
		},
		Err(err) => {
			tracing::warn!(collection, error = %err, "Batch source lookup failed.");

			Rehydrated { sources: HashMap::new(), warnings: vec![BATCH_LOAD_FAILED.to_string()] }
		},
	}
}

#[cfg(test)]
mod tests {
	use sr_testkit::MemoryEngine;

	use super::*;

	#[tokio::test]
	async fn empty_page_skips_lookup() {
		let engine = MemoryEngine::new();
		let out = rehydrate(&engine, "scholarships", &[]).await;

		assert!(out.sources.is_empty());
		assert_eq!(engine.multi_get_calls(), 0);
	}

	#[tokio::test]
	async fn partial_resolution_warns_with_counts() {
		let engine = MemoryEngine::new();

		engine.insert("scholarships", "a", serde_json::json!({ "Country": "UK" }));

		let ids = vec!["a".to_string(), "missing".to_string()];
		let out = rehydrate(&engine, "scholarships", &ids).await;

		assert_eq!(out.sources.len(), 1);
		assert_eq!(out.warnings, vec!["Resolved 1 of 2 requested sources.".to_string()]);
		assert_eq!(engine.multi_get_calls(), 1);
	}

	#[tokio::test]
	async fn failure_degrades_to_warning() {
		let engine = MemoryEngine::new();

		engine.set_fail_multi_get(true);

		let out = rehydrate(&engine, "scholarships", &["a".to_string()]).await;

		assert!(out.sources.is_empty());
		assert_eq!(out.warnings, vec![BATCH_LOAD_FAILED.to_string()]);
	}
}
