//! Source-of-truth record exports that feed the search index.

mod error;

pub use error::{Error, Result};

use std::{
	fs::File,
	io::{BufRead, BufReader, Lines},
	path::{Path, PathBuf},
};

use serde_json::Value;

use sr_domain::Record;

pub const ID_FIELDS: [&str; 2] = ["id", "doc_id"];

pub type RecordStream = Box<dyn Iterator<Item = Result<(String, Record)>> + Send>;

pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Opens a lazy `(id, record)` sequence over one collection.
	fn open(&self, collection: &str) -> Result<RecordStream>;
}

/// Reads `<root>/<collection>.jsonl`, one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonlRecordStore {
	root: PathBuf,
}
impl JsonlRecordStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn path_for(&self, collection: &str) -> PathBuf {
		self.root.join(format!("{collection}.jsonl"))
	}
}
impl RecordStore for JsonlRecordStore {
	fn open(&self, collection: &str) -> Result<RecordStream> {
		let path = self.path_for(collection);
		let file = File::open(&path).map_err(|err| Error::Read { path: path.clone(), source: err })?;

		tracing::debug!(collection, path = %path.display(), "Opened record export.");

		Ok(Box::new(JsonlRecords { path, lines: BufReader::new(file).lines(), line: 0 }))
	}
}

struct JsonlRecords {
	path: PathBuf,
	lines: Lines<BufReader<File>>,
	line: usize,
}
impl Iterator for JsonlRecords {
	type Item = Result<(String, Record)>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let raw = self.lines.next()?;

			self.line += 1;

			let raw = match raw {
				Ok(raw) => raw,
				Err(err) => return Some(Err(Error::Read { path: self.path.clone(), source: err })),
			};

			if raw.trim().is_empty() {
				continue;
			}

			return Some(parse_line(&self.path, self.line, &raw));
		}
	}
}

fn parse_line(path: &Path, line: usize, raw: &str) -> Result<(String, Record)> {
	let value: Value = serde_json::from_str(raw).map_err(|err| Error::Parse {
		path: path.to_path_buf(),
		line,
		source: err,
	})?;
	let Value::Object(record) = value else {
		return Err(Error::NotObject { path: path.to_path_buf(), line });
	};
	let id = record_id(&record).ok_or_else(|| Error::MissingId { path: path.to_path_buf(), line })?;

	Ok((id, record))
}

/// Document id taken from `id`, falling back to `doc_id`. Numeric ids are accepted.
pub fn record_id(record: &Record) -> Option<String> {
	ID_FIELDS.iter().filter_map(|key| record.get(*key)).find_map(|value| match value {
		Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn id_prefers_id_over_doc_id() {
		let record = serde_json::json!({ "id": "a", "doc_id": "b" })
			.as_object()
			.cloned()
			.expect("object");

		assert_eq!(record_id(&record).as_deref(), Some("a"));
	}

	#[test]
	fn id_falls_back_to_numeric_doc_id() {
		let record = serde_json::json!({ "id": "  ", "doc_id": 17 })
			.as_object()
			.cloned()
			.expect("object");

		assert_eq!(record_id(&record).as_deref(), Some("17"));
	}

	#[test]
	fn rejects_non_object_lines() {
		let err = parse_line(Path::new("x.jsonl"), 3, "[1, 2]").expect_err("expected error");

		assert!(matches!(err, Error::NotObject { line: 3, .. }));
	}
}
