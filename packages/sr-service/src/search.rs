use serde::{Deserialize, Serialize};

use sr_domain::{
	Record,
	deadline::DeadlineSort,
	filter::{FilterInput, FilterSet, Operator},
	summary::ScholarshipSummary,
};

use crate::{
	Result, ScholarService,
	builder::{PlanInput, SearchPlan},
	fetch, public_source, rehydrate, today, validate_collection,
};

pub const SORT_IGNORED: &str = "sort_by is only applied when no keyword or filters are supplied.";

#[derive(Clone, Debug, Deserialize)]
pub struct SearchRequest {
	pub collection: String,
	#[serde(default)]
	pub q: Option<String>,
	#[serde(default)]
	pub filters: Option<Vec<FilterInput>>,
	/// How criteria combine. Defaults to `AND`; values within one criterion default to `OR`.
	#[serde(default = "default_inter_field_operator")]
	pub inter_field_operator: Operator,
	#[serde(default)]
	pub size: Option<u32>,
	#[serde(default)]
	pub offset: u32,
	#[serde(default)]
	pub sort_by: Option<DeadlineSort>,
}

/// One page of search results.
///
/// When both a keyword and filters are supplied, `total` counts the hits that survived
/// fusion on this page. Otherwise it is the engine's total for the query.
#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub total: u64,
	pub items: Vec<SearchItem>,
	pub has_next: bool,
	pub next_offset: Option<u64>,
	pub warnings: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchItem {
	pub id: String,
	pub score: f64,
	pub source: Option<Record>,
	pub summary: Option<ScholarshipSummary>,
}

fn default_inter_field_operator() -> Operator {
	Operator::And
}

impl ScholarService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let collection = validate_collection(&req.collection)?;
		let size = self.resolve_size(req.size)?;
		let filters =
			FilterSet::from_inputs(req.filters.as_deref().unwrap_or_default(), req.inter_field_operator)?;
		let plan = self.builder.plan(PlanInput {
			filters: &filters,
			keyword: req.q.as_deref(),
			collection,
			size,
			offset: req.offset,
			sort: req.sort_by,
		});
		let mut warnings = Vec::new();

		if req.sort_by.is_some() && !matches!(plan, SearchPlan::DeadlineBrowse { .. }) {
			warnings.push(SORT_IGNORED.to_string());
		}

		tracing::debug!(
			collection,
			criteria = filters.len(),
			size,
			offset = req.offset,
			"Planning search."
		);

		if plan == SearchPlan::Empty {
			return Ok(SearchResponse {
				total: 0,
				items: Vec::new(),
				has_next: false,
				next_offset: None,
				warnings,
			});
		}

		let lease = self.engine.acquire().await?;
		let page = fetch::run_plan(&*lease, &plan, collection, size, req.offset).await?;
		let missing: Vec<String> =
			page.items.iter().filter(|hit| hit.source.is_none()).map(|hit| hit.id.clone()).collect();
		let mut rehydrated = rehydrate::rehydrate(&*lease, collection, &missing).await;

		drop(lease);

		warnings.append(&mut rehydrated.warnings);

		let today = today();
		let items = page
			.items
			.into_iter()
			.map(|hit| {
				let source =
					hit.source.or_else(|| rehydrated.sources.remove(&hit.id)).map(public_source);
				let summary =
					source.as_ref().map(|source| ScholarshipSummary::from_record(source, today));

				SearchItem { id: hit.id, score: hit.score, source, summary }
			})
			.collect();

		Ok(SearchResponse {
			total: page.total,
			items,
			has_next: page.has_next,
			next_offset: page.next_offset,
			warnings,
		})
	}
}
