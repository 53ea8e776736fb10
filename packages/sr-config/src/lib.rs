mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Engine, Search, Service, SyncSource};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("service.log_level", &cfg.service.log_level),
		("search.recommend_collection", &cfg.search.recommend_collection),
		("search.keyword_fuzziness", &cfg.search.keyword_fuzziness),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !(cfg.engine.url.starts_with("http://") || cfg.engine.url.starts_with("https://")) {
		return Err(Error::Validation {
			message: "engine.url must start with http:// or https://.".to_string(),
		});
	}
	if cfg.engine.username.is_some() != cfg.engine.password.is_some() {
		return Err(Error::Validation {
			message: "engine.username and engine.password must be set together.".to_string(),
		});
	}
	if cfg.engine.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "engine.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.engine.max_sessions == 0 {
		return Err(Error::Validation {
			message: "engine.max_sessions must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_size == 0 {
		return Err(Error::Validation {
			message: "search.default_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_size < cfg.search.default_size {
		return Err(Error::Validation {
			message: "search.max_size must be greater than or equal to search.default_size."
				.to_string(),
		});
	}
	if cfg.search.deadline_oversample == 0 {
		return Err(Error::Validation {
			message: "search.deadline_oversample must be greater than zero.".to_string(),
		});
	}
	if !is_index_name(&cfg.search.recommend_collection) {
		return Err(Error::Validation {
			message: "search.recommend_collection must be a lowercase index name.".to_string(),
		});
	}
	if cfg.sync.batch_size == 0 {
		return Err(Error::Validation {
			message: "sync.batch_size must be greater than zero.".to_string(),
		});
	}

	for collection in &cfg.sync.collections {
		if !is_index_name(collection) {
			return Err(Error::Validation {
				message: format!("sync.collections entry '{collection}' is not a valid index name."),
			});
		}
	}

	Ok(())
}

/// Lowercase ASCII letters, digits, `-` and `_`, not starting with `-` or `_`.
pub fn is_index_name(raw: &str) -> bool {
	let Some(first) = raw.chars().next() else {
		return false;
	};

	if first == '-' || first == '_' {
		return false;
	}

	raw.len() <= 255
		&& raw.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

fn normalize(cfg: &mut Config) {
	while cfg.engine.url.ends_with('/') {
		cfg.engine.url.pop();
	}

	if cfg.engine.username.as_deref().map(|user| user.trim().is_empty()).unwrap_or(false) {
		cfg.engine.username = None;
	}
	if cfg.engine.password.as_deref().map(|pass| pass.is_empty()).unwrap_or(false) {
		cfg.engine.password = None;
	}

	cfg.search.recommend_collection = cfg.search.recommend_collection.trim().to_string();
	cfg.sync.collections.retain(|collection| !collection.trim().is_empty());
}
