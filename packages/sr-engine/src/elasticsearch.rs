//! Elasticsearch REST transport.

use std::{collections::HashMap, time::Duration as StdDuration};

use reqwest::{Client, RequestBuilder, Response, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

use sr_domain::{
	Record,
	fields::{COLLECTION_FIELD, NAME_FIELD, TEXT_FIELD},
	page::{ResultPage, SearchHit},
	record,
};

use crate::{BoxFuture, Error, Result, SearchEngine, query::CompiledQuery};

const MAX_ERROR_BODY_CHARS: usize = 1_024;

#[derive(Debug, Deserialize)]
struct SearchBody {
	hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
	total: Option<TotalHits>,
	#[serde(default)]
	hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
	Object { value: u64 },
	Count(u64),
}

#[derive(Debug, Deserialize)]
struct RawHit {
	#[serde(rename = "_id")]
	id: String,
	#[serde(rename = "_score")]
	score: Option<f64>,
	#[serde(rename = "_source")]
	source: Option<Record>,
}

#[derive(Debug, Deserialize)]
struct MgetBody {
	#[serde(default)]
	docs: Vec<MgetDoc>,
}

#[derive(Debug, Deserialize)]
struct MgetDoc {
	#[serde(rename = "_id")]
	id: String,
	#[serde(default)]
	found: bool,
	#[serde(rename = "_source")]
	source: Option<Record>,
}

#[derive(Debug, Deserialize)]
struct BulkBody {
	#[serde(default)]
	errors: bool,
	#[serde(default)]
	items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
	status: u16,
	#[serde(rename = "_id")]
	id: Option<String>,
	error: Option<Value>,
}

pub struct ElasticsearchClient {
	client: Client,
	base_url: String,
	credentials: Option<(String, Option<String>)>,
}
impl ElasticsearchClient {
	pub fn new(cfg: &sr_config::Engine) -> Result<Self> {
		let client = Client::builder()
			.timeout(StdDuration::from_millis(cfg.timeout_ms))
			.danger_accept_invalid_certs(cfg.accept_invalid_certs)
			.build()?;
		let credentials = cfg
			.username
			.as_ref()
			.map(|user| (user.clone(), cfg.password.clone()));

		Ok(Self { client, base_url: cfg.url.trim_end_matches('/').to_string(), credentials })
	}

	fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
		match self.credentials.as_ref() {
			Some((user, pass)) => builder.basic_auth(user, pass.as_ref()),
			None => builder,
		}
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{path}", self.base_url)
	}

	/// Creates `index` with the catch-all text mapping unless it already exists.
	pub async fn ensure_index(&self, index: &str) -> Result<()> {
		let res = self.authorize(self.client.head(self.url(index))).send().await?;

		if res.status().is_success() {
			return Ok(());
		}
		if res.status() != StatusCode::NOT_FOUND {
			return Err(status_error("index_exists", res).await);
		}

		let res = self
			.authorize(self.client.put(self.url(index)))
			.json(&index_definition())
			.send()
			.await?;

		if res.status() == StatusCode::BAD_REQUEST {
			let body = res.text().await.unwrap_or_default();

			if body.contains("resource_already_exists_exception") {
				return Ok(());
			}

			return Err(Error::Status {
				operation: "create_index",
				status: StatusCode::BAD_REQUEST.as_u16(),
				body: truncate(body),
			});
		}

		ensure_success("create_index", res).await?;

		tracing::info!(index, "Created search index.");

		Ok(())
	}

	pub async fn search(
		&self,
		query: &CompiledQuery,
		collection: &str,
		size: u32,
		offset: u32,
	) -> Result<ResultPage> {
		let body = serde_json::json!({
			"query": query.to_dsl(),
			"size": size,
			"from": offset,
			"track_total_hits": true,
		});
		let res = self
			.authorize(self.client.post(self.url(&format!("{collection}/_search"))))
			.json(&body)
			.send()
			.await?;

		if res.status() == StatusCode::NOT_FOUND {
			tracing::debug!(collection, "Search index does not exist yet.");

			return Ok(ResultPage::new(0, Vec::new(), offset, size));
		}

		let json: Value = ensure_success("search", res).await?.json().await?;
		let (total, items) = parse_search_response(json)?;

		tracing::debug!(collection, total, returned = items.len(), "Search executed.");

		Ok(ResultPage::new(total, items, offset, size))
	}

	pub async fn mget(&self, collection: &str, ids: &[String]) -> Result<HashMap<String, Record>> {
		if ids.is_empty() {
			return Ok(HashMap::new());
		}

		let res = self
			.authorize(self.client.post(self.url(&format!("{collection}/_mget"))))
			.json(&serde_json::json!({ "ids": ids }))
			.send()
			.await?;

		if res.status() == StatusCode::NOT_FOUND {
			return Ok(HashMap::new());
		}

		let json: Value = ensure_success("mget", res).await?.json().await?;

		parse_mget_response(json)
	}

	pub async fn bulk_index(&self, records: &[(String, Record)], index: &str) -> Result<u64> {
		if records.is_empty() {
			return Ok(0);
		}

		self.ensure_index(index).await?;

		let payload = bulk_payload(records, index)?;
		let res = self
			.authorize(self.client.post(self.url("_bulk")))
			.header(CONTENT_TYPE, "application/x-ndjson")
			.body(payload)
			.send()
			.await?;
		let json: Value = ensure_success("bulk", res).await?.json().await?;

		count_bulk_successes(json, index)
	}
}
impl SearchEngine for ElasticsearchClient {
	fn execute<'a>(
		&'a self,
		query: &'a CompiledQuery,
		collection: &'a str,
		size: u32,
		offset: u32,
	) -> BoxFuture<'a, Result<ResultPage>> {
		Box::pin(self.search(query, collection, size, offset))
	}

	fn multi_get<'a>(
		&'a self,
		collection: &'a str,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, Record>>> {
		Box::pin(self.mget(collection, ids))
	}

	fn index_many<'a>(
		&'a self,
		records: &'a [(String, Record)],
		index: &'a str,
	) -> BoxFuture<'a, Result<u64>> {
		Box::pin(self.bulk_index(records, index))
	}
}

fn index_definition() -> Value {
	serde_json::json!({
		"settings": {
			"analysis": {
				"analyzer": {
					"text_std": { "type": "standard", "stopwords": "_none_" }
				}
			}
		},
		"mappings": {
			"properties": {
				COLLECTION_FIELD: { "type": "keyword" },
				TEXT_FIELD: { "type": "text", "analyzer": "text_std" },
				NAME_FIELD: {
					"type": "text",
					"analyzer": "text_std",
					"fields": { "raw": { "type": "keyword" } }
				}
			}
		}
	})
}

/// Builds the NDJSON bulk body. Every document gets the catch-all text and its
/// collection stamp.
fn bulk_payload(records: &[(String, Record)], index: &str) -> Result<String> {
	let mut out = String::new();

	for (id, source) in records {
		let mut doc = source.clone();

		doc.remove(TEXT_FIELD);

		let text = record::flatten_text(&doc);

		doc.insert(TEXT_FIELD.to_string(), Value::String(text));
		doc.insert(COLLECTION_FIELD.to_string(), Value::String(index.to_string()));

		let action = serde_json::json!({ "index": { "_index": index, "_id": id } });

		out.push_str(&serde_json::to_string(&action)?);
		out.push('\n');
		out.push_str(&serde_json::to_string(&doc)?);
		out.push('\n');
	}

	Ok(out)
}

fn parse_search_response(json: Value) -> Result<(u64, Vec<SearchHit>)> {
	let body: SearchBody = serde_json::from_value(json)?;
	let items: Vec<SearchHit> = body
		.hits
		.hits
		.into_iter()
		.map(|hit| SearchHit {
			id: hit.id,
			score: hit.score.filter(|score| score.is_finite()).unwrap_or(0.0).max(0.0),
			source: hit.source,
		})
		.collect();
	let total = match body.hits.total {
		Some(TotalHits::Object { value }) | Some(TotalHits::Count(value)) => value,
		None => items.len() as u64,
	};

	Ok((total, items))
}

fn parse_mget_response(json: Value) -> Result<HashMap<String, Record>> {
	let body: MgetBody = serde_json::from_value(json)?;

	Ok(body
		.docs
		.into_iter()
		.filter(|doc| doc.found)
		.map(|doc| (doc.id, doc.source.unwrap_or_default()))
		.collect())
}

fn count_bulk_successes(json: Value, index: &str) -> Result<u64> {
	let body: BulkBody = serde_json::from_value(json)?;
	let mut indexed = 0_u64;

	for item in body.items.iter().flat_map(|entry| entry.values()) {
		if (200..300).contains(&item.status) {
			indexed += 1;
		} else if body.errors {
			tracing::warn!(
				index,
				id = item.id.as_deref().unwrap_or_default(),
				status = item.status,
				error = %item.error.as_ref().map(|err| err.to_string()).unwrap_or_default(),
				"Bulk item rejected."
			);
		}
	}

	Ok(indexed)
}

async fn ensure_success(operation: &'static str, res: Response) -> Result<Response> {
	if res.status().is_success() {
		return Ok(res);
	}

	Err(status_error(operation, res).await)
}

async fn status_error(operation: &'static str, res: Response) -> Error {
	let status = res.status().as_u16();
	let body = res.text().await.unwrap_or_default();

	Error::Status { operation, status, body: truncate(body) }
}

fn truncate(mut body: String) -> String {
	if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
		body.truncate(cut);
	}

	body
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hits_and_object_total() {
		let json = serde_json::json!({
			"hits": {
				"total": { "value": 42, "relation": "eq" },
				"hits": [
					{ "_id": "a", "_score": 3.5, "_source": { "Country": "UK" } },
					{ "_id": "b", "_score": null }
				]
			}
		});
		let (total, items) = parse_search_response(json).expect("parse failed");

		assert_eq!(total, 42);
		assert_eq!(items.len(), 2);
		assert_eq!(items[0].score, 3.5);
		assert!(items[0].source.is_some());
		assert_eq!(items[1].score, 0.0);
		assert!(items[1].source.is_none());
	}

	#[test]
	fn mget_omits_unresolved_ids() {
		let json = serde_json::json!({
			"docs": [
				{ "_id": "a", "found": true, "_source": { "Country": "UK" } },
				{ "_id": "b", "found": false }
			]
		});
		let found = parse_mget_response(json).expect("parse failed");

		assert_eq!(found.len(), 1);
		assert!(found.contains_key("a"));
	}

	#[test]
	fn bulk_payload_stamps_collection_and_catch_all() {
		let source = serde_json::json!({ "Scholarship_Name": "Chevening" })
			.as_object()
			.cloned()
			.expect("object");
		let payload = bulk_payload(&[("doc-1".to_string(), source)], "scholarships")
			.expect("payload");
		let lines: Vec<Value> = payload
			.lines()
			.map(|line| serde_json::from_str(line).expect("line must be JSON"))
			.collect();

		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0]["index"]["_id"], "doc-1");
		assert_eq!(lines[1]["collection"], "scholarships");
		assert_eq!(lines[1]["__text"], "Chevening");
	}

	#[test]
	fn counts_only_successful_bulk_items() {
		let json = serde_json::json!({
			"errors": true,
			"items": [
				{ "index": { "_id": "a", "status": 201 } },
				{ "index": { "_id": "b", "status": 400, "error": { "type": "mapper_parsing_exception" } } },
				{ "index": { "_id": "c", "status": 200 } }
			]
		});

		assert_eq!(count_bulk_successes(json, "scholarships").expect("parse failed"), 2);
	}

	#[test]
	fn truncates_long_error_bodies() {
		let body = "x".repeat(MAX_ERROR_BODY_CHARS + 10);

		assert_eq!(truncate(body).len(), MAX_ERROR_BODY_CHARS);
	}
}
