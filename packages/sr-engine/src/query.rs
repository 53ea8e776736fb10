//! Engine-native boolean query tree and its Elasticsearch DSL rendering.

use serde_json::{Map, Value};

use sr_domain::filter::{Operator, RangeBound};

#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
	/// Analyzed full-text match; `operator` joins the query terms.
	Match { field: String, query: String, operator: Operator, fuzziness: Option<String> },
	/// Inclusive range; absent bounds are omitted from the request.
	Range { field: String, gte: Option<RangeBound>, lte: Option<RangeBound> },
	/// Exact keyword match.
	Term { field: String, value: String },
}
impl Clause {
	pub fn field(&self) -> &str {
		match self {
			Self::Match { field, .. } | Self::Range { field, .. } | Self::Term { field, .. } => field,
		}
	}

	pub fn to_dsl(&self) -> Value {
		match self {
			Self::Match { field, query, operator, fuzziness } => {
				let mut body = Map::new();

				body.insert("query".to_string(), Value::String(query.clone()));
				body.insert(
					"operator".to_string(),
					Value::String(operator.as_engine_str().to_string()),
				);

				if let Some(fuzziness) = fuzziness {
					body.insert("fuzziness".to_string(), Value::String(fuzziness.clone()));
				}

				serde_json::json!({ "match": { field: body } })
			},
			Self::Range { field, gte, lte } => {
				let mut body = Map::new();

				if let Some(bound) = gte {
					body.insert("gte".to_string(), bound_to_dsl(bound));
				}
				if let Some(bound) = lte {
					body.insert("lte".to_string(), bound_to_dsl(bound));
				}

				serde_json::json!({ "range": { field: body } })
			},
			Self::Term { field, value } => serde_json::json!({ "term": { field: value } }),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoolQuery {
	pub must: Vec<Clause>,
	pub should: Vec<Clause>,
	pub filter: Vec<Clause>,
	pub minimum_should_match: Option<u32>,
}
impl BoolQuery {
	pub fn to_dsl(&self) -> Value {
		let mut body = Map::new();

		for (key, clauses) in [("must", &self.must), ("should", &self.should), ("filter", &self.filter)]
		{
			if !clauses.is_empty() {
				body.insert(key.to_string(), Value::Array(clauses.iter().map(Clause::to_dsl).collect()));
			}
		}

		if let Some(minimum) = self.minimum_should_match {
			body.insert("minimum_should_match".to_string(), Value::from(minimum));
		}

		serde_json::json!({ "bool": body })
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum CompiledQuery {
	Bool(BoolQuery),
	/// Matches nothing. Stands in wherever an unscoped "match all" would otherwise appear.
	MatchNone,
}
impl CompiledQuery {
	pub fn to_dsl(&self) -> Value {
		match self {
			Self::Bool(query) => query.to_dsl(),
			Self::MatchNone => serde_json::json!({ "match_none": {} }),
		}
	}
}

fn bound_to_dsl(bound: &RangeBound) -> Value {
	match bound {
		RangeBound::Number(value) => Value::from(*value),
		RangeBound::Date(date) => Value::String(date.to_string()),
	}
}
