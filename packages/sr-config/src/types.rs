use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub engine: Engine,
	pub search: Search,
	pub sync: SyncSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Engine {
	/// Base URL of the search engine, e.g. "http://localhost:9200".
	pub url: String,
	pub username: Option<String>,
	pub password: Option<String>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Upper bound on concurrently leased engine sessions.
	#[serde(default = "default_max_sessions")]
	pub max_sessions: u32,
	#[serde(default)]
	pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub default_size: u32,
	pub max_size: u32,
	/// Multiplier applied to the page size when browsing by deadline without filters.
	#[serde(default = "default_deadline_oversample")]
	pub deadline_oversample: u32,
	pub recommend_collection: String,
	#[serde(default = "default_keyword_fuzziness")]
	pub keyword_fuzziness: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncSource {
	/// Directory holding one `<collection>.jsonl` export per collection.
	pub source_dir: PathBuf,
	pub batch_size: usize,
	pub collections: Vec<String>,
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_max_sessions() -> u32 {
	32
}

fn default_deadline_oversample() -> u32 {
	5
}

fn default_keyword_fuzziness() -> String {
	"AUTO".to_string()
}
