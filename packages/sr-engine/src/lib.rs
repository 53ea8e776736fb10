pub mod elasticsearch;
pub mod query;

mod error;

pub use error::{Error, Result};

use std::{collections::HashMap, future::Future, pin::Pin};

use sr_domain::{Record, page::ResultPage};

use crate::query::CompiledQuery;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Search engine collaborator.
///
/// Calls may fail and are not retried here; retry policy belongs to the transport.
pub trait SearchEngine
where
	Self: Send + Sync,
{
	/// Runs one query against the index backing `collection`.
	fn execute<'a>(
		&'a self,
		query: &'a CompiledQuery,
		collection: &'a str,
		size: u32,
		offset: u32,
	) -> BoxFuture<'a, Result<ResultPage>>;

	/// Batch lookup. Identifiers the engine cannot resolve are omitted from the map.
	fn multi_get<'a>(
		&'a self,
		collection: &'a str,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, Record>>>;

	/// Bulk-indexes `(id, record)` pairs into `index`, returning the number indexed.
	fn index_many<'a>(
		&'a self,
		records: &'a [(String, Record)],
		index: &'a str,
	) -> BoxFuture<'a, Result<u64>>;
}
