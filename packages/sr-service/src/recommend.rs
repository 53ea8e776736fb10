use serde::{Deserialize, Serialize};

use sr_domain::{Record, explain, profile::ProfileInput, summary::ScholarshipSummary};

use crate::{
	Result, ScholarService,
	builder::{PlanInput, SearchPlan},
	fetch, public_source, rehydrate, today,
};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RecommendRequest {
	#[serde(default)]
	pub profile: Option<ProfileInput>,
	#[serde(default)]
	pub size: Option<u32>,
	#[serde(default)]
	pub offset: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchResponse {
	pub total: u64,
	pub items: Vec<MatchItem>,
	pub has_next: bool,
	pub next_offset: Option<u64>,
	pub warnings: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MatchItem {
	pub id: String,
	pub score: f64,
	/// Reason tokens; informational only, never used for ranking.
	pub matched_fields: Vec<String>,
	pub source: Option<Record>,
	pub summary: Option<ScholarshipSummary>,
}

impl ScholarService {
	/// Profile-driven recommendations from the configured collection.
	///
	/// A profile with nothing to filter on and no keywords yields an empty page without an
	/// engine call.
	pub async fn recommend(&self, req: RecommendRequest) -> Result<MatchResponse> {
		let size = self.resolve_size(req.size)?;
		let profile = req.profile.unwrap_or_default().parse()?;
		let filters = profile.to_filter_set();
		let collection = self.cfg.search.recommend_collection.as_str();
		let plan = self.builder.plan(PlanInput {
			filters: &filters,
			keyword: profile.keywords.as_deref(),
			collection,
			size,
			offset: req.offset,
			sort: None,
		});

		if plan == SearchPlan::Empty {
			tracing::debug!("Profile has no usable preferences.");

			return Ok(MatchResponse {
				total: 0,
				items: Vec::new(),
				has_next: false,
				next_offset: None,
				warnings: Vec::new(),
			});
		}

		let lease = self.engine.acquire().await?;
		let page = fetch::run_plan(&*lease, &plan, collection, size, req.offset).await?;
		let ids = page.ids();
		let mut rehydrated = rehydrate::rehydrate(&*lease, collection, &ids).await;

		drop(lease);

		let today = today();
		let items = page
			.items
			.into_iter()
			.map(|hit| {
				let source = rehydrated.sources.remove(&hit.id).or(hit.source).map(public_source);
				let matched_fields = source
					.as_ref()
					.map(|source| explain::explain(Some(&profile), source))
					.unwrap_or_default();
				let summary =
					source.as_ref().map(|source| ScholarshipSummary::from_record(source, today));

				MatchItem { id: hit.id, score: hit.score, matched_fields, source, summary }
			})
			.collect();

		tracing::info!(
			collection,
			total = page.total,
			criteria = filters.len(),
			"Recommendations resolved."
		);

		Ok(MatchResponse {
			total: page.total,
			items,
			has_next: page.has_next,
			next_offset: page.next_offset,
			warnings: rehydrated.warnings,
		})
	}
}
