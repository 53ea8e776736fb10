pub mod deadline;
pub mod explain;
pub mod fields;
pub mod filter;
pub mod page;
pub mod profile;
pub mod record;
pub mod summary;

mod error;

pub use error::{Error, Result};
pub use record::Record;
