//! In-memory [`SearchEngine`] for tests.
//!
//! Evaluates compiled queries with the same boolean semantics the real engine applies:
//! `must` and `filter` clauses are required, `should` clauses need `minimum_should_match`
//! hits. Scores are the number of matched query tokens, so ranking is deterministic.

use std::{
	collections::{HashMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use serde_json::Value;

use sr_domain::{
	Record, deadline,
	fields::{COLLECTION_FIELD, TEXT_FIELD},
	filter::RangeBound,
	page::{ResultPage, SearchHit},
	record,
};
use sr_engine::{
	BoxFuture, Error, Result, SearchEngine,
	query::{BoolQuery, Clause, CompiledQuery},
};

#[derive(Default)]
pub struct MemoryEngine {
	indices: Mutex<HashMap<String, Vec<(String, Record)>>>,
	executed: Mutex<Vec<CompiledQuery>>,
	execute_calls: AtomicUsize,
	multi_get_calls: AtomicUsize,
	fail_execute: AtomicBool,
	fail_multi_get: AtomicBool,
	omit_sources: AtomicBool,
}
impl MemoryEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Indexes one record the way a bulk sync would, replacing any record with the same id.
	pub fn insert(&self, collection: &str, id: &str, source: Value) {
		let Value::Object(source) = source else {
			panic!("Test records must be JSON objects.");
		};
		let mut indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());
		let docs = indices.entry(collection.to_string()).or_default();
		let doc = stamp(source, collection);

		match docs.iter_mut().find(|(existing, _)| existing == id) {
			Some(slot) => slot.1 = doc,
			None => docs.push((id.to_string(), doc)),
		}
	}

	pub fn set_fail_execute(&self, fail: bool) {
		self.fail_execute.store(fail, Ordering::SeqCst);
	}

	pub fn set_fail_multi_get(&self, fail: bool) {
		self.fail_multi_get.store(fail, Ordering::SeqCst);
	}

	/// Drops `_source` from search hits so callers must rehydrate.
	pub fn set_omit_sources(&self, omit: bool) {
		self.omit_sources.store(omit, Ordering::SeqCst);
	}

	pub fn execute_calls(&self) -> usize {
		self.execute_calls.load(Ordering::SeqCst)
	}

	pub fn multi_get_calls(&self) -> usize {
		self.multi_get_calls.load(Ordering::SeqCst)
	}

	pub fn executed_queries(&self) -> Vec<CompiledQuery> {
		self.executed.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn document_count(&self, collection: &str) -> usize {
		let indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());

		indices.get(collection).map(Vec::len).unwrap_or(0)
	}

	fn run(&self, query: &CompiledQuery, collection: &str, size: u32, offset: u32) -> ResultPage {
		let indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());
		let omit_sources = self.omit_sources.load(Ordering::SeqCst);
		let mut matches: Vec<SearchHit> = indices
			.get(collection)
			.map(|docs| {
				docs.iter()
					.filter_map(|(id, doc)| {
						score_query(query, doc).map(|score| SearchHit {
							id: id.clone(),
							score,
							source: (!omit_sources).then(|| doc.clone()),
						})
					})
					.collect()
			})
			.unwrap_or_default();

		matches.sort_by(|a, b| b.score.total_cmp(&a.score));

		let total = matches.len() as u64;
		let items = matches.into_iter().skip(offset as usize).take(size as usize).collect();

		ResultPage::new(total, items, offset, size)
	}
}
impl SearchEngine for MemoryEngine {
	fn execute<'a>(
		&'a self,
		query: &'a CompiledQuery,
		collection: &'a str,
		size: u32,
		offset: u32,
	) -> BoxFuture<'a, Result<ResultPage>> {
		self.execute_calls.fetch_add(1, Ordering::SeqCst);
		self.executed.lock().unwrap_or_else(|err| err.into_inner()).push(query.clone());

		let result = if self.fail_execute.load(Ordering::SeqCst) {
			Err(injected("search"))
		} else {
			Ok(self.run(query, collection, size, offset))
		};

		Box::pin(async move { result })
	}

	fn multi_get<'a>(
		&'a self,
		collection: &'a str,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, Record>>> {
		self.multi_get_calls.fetch_add(1, Ordering::SeqCst);

		let result = if self.fail_multi_get.load(Ordering::SeqCst) {
			Err(injected("mget"))
		} else {
			let indices = self.indices.lock().unwrap_or_else(|err| err.into_inner());
			let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();

			Ok(indices
				.get(collection)
				.map(|docs| {
					docs.iter()
						.filter(|(id, _)| wanted.contains(id.as_str()))
						.map(|(id, doc)| (id.clone(), doc.clone()))
						.collect()
				})
				.unwrap_or_default())
		};

		Box::pin(async move { result })
	}

	fn index_many<'a>(
		&'a self,
		records: &'a [(String, Record)],
		index: &'a str,
	) -> BoxFuture<'a, Result<u64>> {
		for (id, source) in records {
			self.insert(index, id, Value::Object(source.clone()));
		}

		let indexed = records.len() as u64;

		Box::pin(async move { Ok(indexed) })
	}
}

fn injected(operation: &'static str) -> Error {
	Error::Status { operation, status: 503, body: "injected failure".to_string() }
}

fn stamp(mut source: Record, collection: &str) -> Record {
	source.remove(TEXT_FIELD);

	let text = record::flatten_text(&source);

	source.insert(TEXT_FIELD.to_string(), Value::String(text));
	source.insert(COLLECTION_FIELD.to_string(), Value::String(collection.to_string()));

	source
}

fn score_query(query: &CompiledQuery, doc: &Record) -> Option<f64> {
	match query {
		CompiledQuery::MatchNone => None,
		CompiledQuery::Bool(query) => score_bool(query, doc),
	}
}

fn score_bool(query: &BoolQuery, doc: &Record) -> Option<f64> {
	let mut score = 0.0;

	for clause in &query.must {
		score += score_clause(clause, doc)?;
	}
	for clause in &query.filter {
		score_clause(clause, doc)?;
	}

	let mut matched_should = 0;

	for clause in &query.should {
		if let Some(clause_score) = score_clause(clause, doc) {
			matched_should += 1;
			score += clause_score;
		}
	}

	let required = match query.minimum_should_match {
		Some(minimum) => minimum as usize,
		None if query.must.is_empty() && query.filter.is_empty() && !query.should.is_empty() => 1,
		None => 0,
	};

	(matched_should >= required).then_some(score)
}

fn score_clause(clause: &Clause, doc: &Record) -> Option<f64> {
	match clause {
		Clause::Match { field, query, operator, .. } => {
			let haystack: HashSet<String> = doc
				.get(field)
				.and_then(record::text_of)
				.map(|text| record::tokens(&text).into_iter().collect())
				.unwrap_or_default();
			let wanted = record::tokens(query);
			let hits = wanted.iter().filter(|token| haystack.contains(*token)).count();
			let passes = match operator {
				sr_domain::filter::Operator::And => !wanted.is_empty() && hits == wanted.len(),
				sr_domain::filter::Operator::Or => hits > 0,
			};

			passes.then_some(hits as f64)
		},
		Clause::Range { field, gte, lte } => {
			let value = doc.get(field)?;
			let lower = gte.map(|bound| within(value, &bound, true)).unwrap_or(true);
			let upper = lte.map(|bound| within(value, &bound, false)).unwrap_or(true);

			(lower && upper).then_some(1.0)
		},
		Clause::Term { field, value } =>
			(doc.get(field).and_then(Value::as_str) == Some(value.as_str())).then_some(1.0),
	}
}

fn within(value: &Value, bound: &RangeBound, lower: bool) -> bool {
	match bound {
		RangeBound::Number(limit) => record::number_of(value)
			.map(|number| if lower { number >= *limit } else { number <= *limit })
			.unwrap_or(false),
		RangeBound::Date(limit) => value
			.as_str()
			.and_then(deadline::parse_date)
			.map(|date| if lower { date >= *limit } else { date <= *limit })
			.unwrap_or(false),
	}
}
