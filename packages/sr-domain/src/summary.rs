use serde::Serialize;
use time::Date;

use crate::{
	Record, deadline,
	fields::{COUNTRY_FIELD, END_DATE_FIELD, FUNDING_LEVEL_FIELD, NAME_FIELD, START_DATE_FIELD},
	record::text_of,
};

/// Normalized view of a scholarship record, decoupled from engine field names.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScholarshipSummary {
	pub name: Option<String>,
	pub country: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub amount: Option<String>,
	/// Days from `today` to the deadline; negative once it has passed.
	pub days_until_deadline: Option<i64>,
}
impl ScholarshipSummary {
	pub fn from_record(record: &Record, today: Date) -> Self {
		let field = |key: &str| record.get(key).and_then(text_of);

		Self {
			name: field(NAME_FIELD),
			country: field(COUNTRY_FIELD),
			start_date: field(START_DATE_FIELD),
			end_date: field(END_DATE_FIELD),
			amount: field(FUNDING_LEVEL_FIELD),
			days_until_deadline: deadline::record_deadline(record)
				.map(|end| deadline::days_until(end, today)),
		}
	}
}
