use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read {path:?}.")]
	Read { path: PathBuf, source: std::io::Error },
	#[error("{path:?} line {line}: {source}")]
	Parse { path: PathBuf, line: usize, source: serde_json::Error },
	#[error("{path:?} line {line}: record must be a JSON object.")]
	NotObject { path: PathBuf, line: usize },
	#[error("{path:?} line {line}: record has no 'id' or 'doc_id'.")]
	MissingId { path: PathBuf, line: usize },
}
