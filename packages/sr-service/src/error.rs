pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid request: {message}")]
	InvalidField { field: String, message: String },
	#[error("Engine unavailable: {message}")]
	EngineUnavailable { message: String },
	#[error("Store error: {message}")]
	Store { message: String },
}
impl From<sr_domain::Error> for Error {
	fn from(err: sr_domain::Error) -> Self {
		Self::InvalidField { field: err.path().to_string(), message: err.to_string() }
	}
}

impl From<sr_engine::Error> for Error {
	fn from(err: sr_engine::Error) -> Self {
		Self::EngineUnavailable { message: err.to_string() }
	}
}

impl From<sr_store::Error> for Error {
	fn from(err: sr_store::Error) -> Self {
		Self::Store { message: err.to_string() }
	}
}
