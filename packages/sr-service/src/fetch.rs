use sr_domain::{deadline, page::ResultPage};
use sr_engine::{SearchEngine, query::CompiledQuery};

use crate::{Result, builder::SearchPlan, fusion};

/// Issues one engine request. Failures surface as `EngineUnavailable`; nothing is retried.
pub async fn fetch(
	engine: &dyn SearchEngine,
	query: &CompiledQuery,
	collection: &str,
	size: u32,
	offset: u32,
) -> Result<ResultPage> {
	let page = engine.execute(query, collection, size, offset).await.inspect_err(|err| {
		tracing::warn!(collection, error = %err, "Search request failed.");
	})?;

	Ok(page)
}

pub async fn run_plan(
	engine: &dyn SearchEngine,
	plan: &SearchPlan,
	collection: &str,
	size: u32,
	offset: u32,
) -> Result<ResultPage> {
	match plan {
		SearchPlan::Empty => Ok(ResultPage::new(0, Vec::new(), offset, size)),
		SearchPlan::Keyword(query) | SearchPlan::Filter(query) =>
			fetch(engine, query, collection, size, offset).await,
		SearchPlan::Fused { keyword, filter } => {
			let (keyword_page, filter_page) = tokio::try_join!(
				fetch(engine, keyword, collection, size, offset),
				fetch(engine, filter, collection, size, offset),
			)?;

			tracing::debug!(
				collection,
				keyword_hits = keyword_page.items.len(),
				filter_hits = filter_page.items.len(),
				"Fusing keyword and filter legs."
			);

			Ok(fusion::fuse(keyword_page, &filter_page, offset, size))
		},
		SearchPlan::DeadlineBrowse { query, fetch_size, order } => {
			let mut page = fetch(engine, query, collection, *fetch_size, 0).await?;

			deadline::sort_hits(&mut page.items, *order);

			let items =
				page.items.into_iter().skip(offset as usize).take(size as usize).collect();

			Ok(ResultPage::new(page.total, items, offset, size))
		},
	}
}
