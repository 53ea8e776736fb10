pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{path}: field '{field}' is not filterable.")]
	UnknownField { path: String, field: String },
	#[error("{path}: a filter must supply values or range bounds.")]
	EmptyFilter { path: String },
	#[error("{path}: a filter cannot mix values with range bounds.")]
	MixedFilter { path: String },
	#[error("{path}: '{value}' is not an ISO-8601 date.")]
	InvalidDate { path: String, value: String },
	#[error("{path}: {message}")]
	InvalidValue { path: String, message: String },
}
impl Error {
	/// JSON path of the offending input.
	pub fn path(&self) -> &str {
		match self {
			Self::UnknownField { path, .. }
			| Self::EmptyFilter { path }
			| Self::MixedFilter { path }
			| Self::InvalidDate { path, .. }
			| Self::InvalidValue { path, .. } => path,
		}
	}
}
