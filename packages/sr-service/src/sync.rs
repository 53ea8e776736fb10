use serde::Serialize;

use crate::{Result, ScholarService, validate_collection};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
	pub collection: String,
	pub read: u64,
	pub indexed: u64,
	pub batches: u64,
}

impl ScholarService {
	/// Streams one collection from the record store into its index, `sync.batch_size`
	/// records per bulk call.
	pub async fn sync_collection(&self, collection: &str) -> Result<SyncReport> {
		let collection = validate_collection(collection)?;
		let batch_size = self.cfg.sync.batch_size.max(1);
		let records = self.store.open(collection)?;
		let lease = self.engine.acquire().await?;
		let mut report = SyncReport { collection: collection.to_string(), ..Default::default() };
		let mut batch = Vec::with_capacity(batch_size);

		for record in records {
			batch.push(record?);

			report.read += 1;

			if batch.len() >= batch_size {
				report.indexed += lease.index_many(&batch, collection).await?;
				report.batches += 1;

				batch.clear();
			}
		}

		if !batch.is_empty() {
			report.indexed += lease.index_many(&batch, collection).await?;
			report.batches += 1;
		}

		tracing::info!(
			collection,
			read = report.read,
			indexed = report.indexed,
			batches = report.batches,
			"Collection synced."
		);

		Ok(report)
	}
}
