use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use time::{
	Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
	macros::format_description,
};

use crate::{Record, fields::END_DATE_FIELD, page::SearchHit};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineSort {
	DeadlineAsc,
	DeadlineDesc,
}

/// Parses `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS` values.
pub fn parse_date(raw: &str) -> Option<Date> {
	let raw = raw.trim();

	if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
		return Some(date);
	}
	if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(ts.date());
	}

	PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
		.ok()
		.map(PrimitiveDateTime::date)
}

pub fn record_deadline(record: &Record) -> Option<Date> {
	record.get(END_DATE_FIELD).and_then(|value| value.as_str()).and_then(parse_date)
}

/// Stable chronological sort of hits by their inline `End_Date`.
///
/// Hits without a parseable deadline sort as the latest possible date when ascending and
/// the earliest when descending, so they always land after every dated hit.
pub fn sort_hits(hits: &mut [SearchHit], order: DeadlineSort) {
	let deadline = |hit: &SearchHit| hit.source.as_ref().and_then(record_deadline);

	match order {
		DeadlineSort::DeadlineAsc => hits.sort_by_key(|hit| deadline(hit).unwrap_or(Date::MAX)),
		DeadlineSort::DeadlineDesc =>
			hits.sort_by_key(|hit| Reverse(deadline(hit).unwrap_or(Date::MIN))),
	}
}

pub fn days_until(deadline: Date, today: Date) -> i64 {
	(deadline - today).whole_days()
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use time::macros::date;

	use super::*;

	fn hit(id: &str, end_date: &str) -> SearchHit {
		let source = json!({ "End_Date": end_date }).as_object().cloned();

		SearchHit { id: id.to_string(), score: 1.0, source }
	}

	fn ids(hits: &[SearchHit]) -> Vec<&str> {
		hits.iter().map(|hit| hit.id.as_str()).collect()
	}

	#[test]
	fn parses_supported_formats() {
		assert_eq!(parse_date("2025-01-01"), Some(date!(2025 - 01 - 01)));
		assert_eq!(parse_date("2025-03-04T10:00:00Z"), Some(date!(2025 - 03 - 04)));
		assert_eq!(parse_date("2025-03-04T10:00:00"), Some(date!(2025 - 03 - 04)));
		assert_eq!(parse_date("not-a-date"), None);
		assert_eq!(parse_date("2025-13-01"), None);
	}

	#[test]
	fn ascending_puts_malformed_last() {
		let mut hits =
			vec![hit("a", "2025-01-01"), hit("b", "not-a-date"), hit("c", "2024-06-01")];

		sort_hits(&mut hits, DeadlineSort::DeadlineAsc);

		assert_eq!(ids(&hits), vec!["c", "a", "b"]);
	}

	#[test]
	fn descending_puts_malformed_last() {
		let mut hits =
			vec![hit("a", "2025-01-01"), hit("b", "not-a-date"), hit("c", "2024-06-01")];

		sort_hits(&mut hits, DeadlineSort::DeadlineDesc);

		assert_eq!(ids(&hits), vec!["a", "c", "b"]);
	}

	#[test]
	fn sort_is_stable_for_equal_deadlines() {
		let mut hits = vec![
			hit("x", "2025-01-01"),
			SearchHit { id: "nosrc".to_string(), score: 0.0, source: None },
			hit("y", "2025-01-01"),
		];

		sort_hits(&mut hits, DeadlineSort::DeadlineAsc);

		assert_eq!(ids(&hits), vec!["x", "y", "nosrc"]);
	}

	#[test]
	fn counts_days_until_deadline() {
		assert_eq!(days_until(date!(2025 - 01 - 11), date!(2025 - 01 - 01)), 10);
		assert_eq!(days_until(date!(2024 - 12 - 31), date!(2025 - 01 - 01)), -1);
	}
}
