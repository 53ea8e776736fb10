//! Compiles filters and keywords into executable plans.

use sr_domain::{
	deadline::DeadlineSort,
	fields::{COLLECTION_FIELD, TEXT_FIELD},
	filter::{Condition, FilterCriterion, FilterSet, Operator},
};
use sr_engine::query::{BoolQuery, Clause, CompiledQuery};

#[derive(Clone, Debug, PartialEq)]
pub enum SearchPlan {
	/// Nothing to search for. Resolves to an empty page without touching the engine.
	Empty,
	Keyword(CompiledQuery),
	Filter(CompiledQuery),
	/// Both legs run independently and are intersected afterwards.
	Fused { keyword: CompiledQuery, filter: CompiledQuery },
	/// Scope-only query, over-fetched from offset zero and sorted client-side.
	DeadlineBrowse { query: CompiledQuery, fetch_size: u32, order: DeadlineSort },
}

pub struct PlanInput<'a> {
	pub filters: &'a FilterSet,
	pub keyword: Option<&'a str>,
	pub collection: &'a str,
	pub size: u32,
	pub offset: u32,
	pub sort: Option<DeadlineSort>,
}

#[derive(Clone, Debug)]
pub struct QueryBuilder {
	fuzziness: String,
	oversample: u32,
}
impl QueryBuilder {
	pub fn new(fuzziness: impl Into<String>, oversample: u32) -> Self {
		Self { fuzziness: fuzziness.into(), oversample: oversample.max(1) }
	}

	pub fn from_config(cfg: &sr_config::Search) -> Self {
		Self::new(cfg.keyword_fuzziness.clone(), cfg.deadline_oversample)
	}

	pub fn plan(&self, input: PlanInput<'_>) -> SearchPlan {
		let keyword = input.keyword.map(str::trim).filter(|keyword| !keyword.is_empty());

		match (keyword, input.filters.is_empty()) {
			(Some(keyword), false) => SearchPlan::Fused {
				keyword: self.keyword_query(keyword, input.collection),
				filter: self.filter_query(input.filters, input.collection),
			},
			(Some(keyword), true) => SearchPlan::Keyword(self.keyword_query(keyword, input.collection)),
			(None, false) => SearchPlan::Filter(self.filter_query(input.filters, input.collection)),
			(None, true) => match input.sort {
				Some(order) => SearchPlan::DeadlineBrowse {
					query: scope_query(input.collection),
					fetch_size: input
						.size
						.saturating_mul(self.oversample)
						.max(input.offset.saturating_add(input.size)),
					order,
				},
				None => SearchPlan::Empty,
			},
		}
	}

	pub fn keyword_query(&self, keyword: &str, collection: &str) -> CompiledQuery {
		CompiledQuery::Bool(BoolQuery {
			must: vec![Clause::Match {
				field: TEXT_FIELD.to_string(),
				query: keyword.to_string(),
				operator: Operator::Or,
				fuzziness: Some(self.fuzziness.clone()),
			}],
			filter: vec![collection_clause(collection)],
			..Default::default()
		})
	}

	/// An empty set compiles to [`CompiledQuery::MatchNone`], never to a match-all.
	pub fn filter_query(&self, filters: &FilterSet, collection: &str) -> CompiledQuery {
		if filters.is_empty() {
			return CompiledQuery::MatchNone;
		}

		let leaves: Vec<Clause> = filters.criteria().iter().map(criterion_clause).collect();
		let mut query = BoolQuery { filter: vec![collection_clause(collection)], ..Default::default() };

		match filters.inter_field_operator {
			Operator::And => query.must = leaves,
			Operator::Or => {
				query.should = leaves;
				query.minimum_should_match = Some(1);
			},
		}

		CompiledQuery::Bool(query)
	}
}

pub fn scope_query(collection: &str) -> CompiledQuery {
	CompiledQuery::Bool(BoolQuery { filter: vec![collection_clause(collection)], ..Default::default() })
}

pub fn criterion_clause(criterion: &FilterCriterion) -> Clause {
	match &criterion.condition {
		Condition::Terms { values, operator } => Clause::Match {
			field: criterion.field.clone(),
			query: values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
			operator: *operator,
			fuzziness: None,
		},
		Condition::Range { min, max } =>
			Clause::Range { field: criterion.field.clone(), gte: *min, lte: *max },
	}
}

fn collection_clause(collection: &str) -> Clause {
	Clause::Term { field: COLLECTION_FIELD.to_string(), value: collection.to_string() }
}

#[cfg(test)]
mod tests {
	use sr_domain::filter::{FilterValue, RangeBound};

	use super::*;

	fn builder() -> QueryBuilder {
		QueryBuilder::new("AUTO", 5)
	}

	fn input<'a>(filters: &'a FilterSet, keyword: Option<&'a str>) -> PlanInput<'a> {
		PlanInput { filters, keyword, collection: "scholarships", size: 10, offset: 0, sort: None }
	}

	fn two_criteria(operator: Operator) -> FilterSet {
		FilterSet::with_criteria(
			vec![
				FilterCriterion::terms(
					"Country",
					vec![FilterValue::String("UK".to_string()), FilterValue::String("Ireland".to_string())],
					Operator::Or,
				),
				FilterCriterion::range("Min_GPA", Some(RangeBound::Number(3.0)), None),
			],
			operator,
		)
	}

	#[test]
	fn nothing_to_search_plans_empty() {
		let filters = FilterSet::default();

		assert_eq!(builder().plan(input(&filters, Some("   "))), SearchPlan::Empty);
	}

	#[test]
	fn and_places_leaves_in_must_with_scope_in_filter() {
		let filters = two_criteria(Operator::And);
		let SearchPlan::Filter(query) = builder().plan(input(&filters, None)) else {
			panic!("expected a filter plan");
		};

		assert_eq!(
			query.to_dsl(),
			serde_json::json!({
				"bool": {
					"must": [
						{ "match": { "Country": { "query": "UK Ireland", "operator": "or" } } },
						{ "range": { "Min_GPA": { "gte": 3.0 } } }
					],
					"filter": [ { "term": { "collection": "scholarships" } } ]
				}
			})
		);
	}

	#[test]
	fn or_requires_one_leaf_and_keeps_scope_required() {
		let filters = two_criteria(Operator::Or);
		let SearchPlan::Filter(CompiledQuery::Bool(query)) = builder().plan(input(&filters, None))
		else {
			panic!("expected a filter plan");
		};

		assert_eq!(query.should.len(), 2);
		assert_eq!(query.minimum_should_match, Some(1));
		assert!(query.must.is_empty());
		assert_eq!(query.filter, vec![collection_clause("scholarships")]);
	}

	#[test]
	fn keyword_with_filters_plans_two_legs() {
		let filters = two_criteria(Operator::Or);
		let plan = builder().plan(input(&filters, Some("data science")));

		let SearchPlan::Fused { keyword: CompiledQuery::Bool(keyword), .. } = plan else {
			panic!("expected a fused plan");
		};

		assert_eq!(
			keyword.must,
			vec![Clause::Match {
				field: "__text".to_string(),
				query: "data science".to_string(),
				operator: Operator::Or,
				fuzziness: Some("AUTO".to_string()),
			}]
		);
	}

	#[test]
	fn deadline_browse_over_fetches() {
		let filters = FilterSet::default();
		let mut plan_input = input(&filters, None);

		plan_input.sort = Some(DeadlineSort::DeadlineAsc);
		plan_input.offset = 60;

		let SearchPlan::DeadlineBrowse { fetch_size, .. } = builder().plan(plan_input) else {
			panic!("expected a browse plan");
		};

		assert_eq!(fetch_size, 70);

		let mut plan_input = input(&filters, None);

		plan_input.sort = Some(DeadlineSort::DeadlineDesc);

		let SearchPlan::DeadlineBrowse { fetch_size, .. } = builder().plan(plan_input) else {
			panic!("expected a browse plan");
		};

		assert_eq!(fetch_size, 50);
	}

	#[test]
	fn empty_filter_set_never_matches_everything() {
		assert_eq!(
			builder().filter_query(&FilterSet::default(), "scholarships"),
			CompiledQuery::MatchNone
		);
	}
}
