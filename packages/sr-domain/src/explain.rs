//! Match explanations for recommendations.
//!
//! Tokens are appended in a fixed check order so identical inputs always produce identical
//! output. Explanations are metadata only and never feed back into ranking.

use std::collections::HashSet;

use crate::{
	Record, deadline,
	fields::{LogicalField, REQUIRED_DEGREE_FIELD},
	profile::Profile,
	record::{self, first_present, number_of, text_of, value_equals, value_matches},
};

pub const GPA_REQUIREMENT_MET: &str = "gpa_requirement_met";
pub const GPA_BELOW_REQUIREMENT: &str = "gpa_below_requirement";

pub fn explain(profile: Option<&Profile>, source: &Record) -> Vec<String> {
	let Some(profile) = profile else {
		return Vec::new();
	};
	let mut reasons = Vec::new();

	if let Some(field_of_study) = profile.field_of_study.as_deref()
		&& matches_any_field(source, LogicalField::FieldOfStudy, field_of_study)
	{
		reasons.push(format!("field_of_study_match:{field_of_study}"));
	}
	if let Some(reason) = degree_reason(profile, source) {
		reasons.push(reason);
	}

	for (logical, wanted) in [
		(LogicalField::Country, &profile.countries),
		(LogicalField::ScholarshipType, &profile.scholarship_types),
		(LogicalField::FundingLevel, &profile.funding_levels),
		(LogicalField::ApplicationMode, &profile.application_modes),
	] {
		if let Some(hit) = wanted.iter().find(|value| matches_any_field(source, logical, value)) {
			reasons.push(format!("{}_match:{hit}", logical.as_str()));
		}
	}

	if let Some(reason) = deadline_reason(profile, source) {
		reasons.push(reason);
	}
	if let Some(reason) = gpa_reason(profile, source) {
		reasons.push(reason.to_string());
	}

	if let Some(keywords) = profile.keywords.as_deref() {
		let text: HashSet<String> =
			record::tokens(&record::flatten_text(source)).into_iter().collect();
		let mut seen = HashSet::new();

		for keyword in keywords.split_whitespace() {
			let wanted = record::tokens(keyword);

			if !wanted.is_empty()
				&& wanted.iter().all(|token| text.contains(token))
				&& seen.insert(wanted)
			{
				reasons.push(format!("keyword_match:{keyword}"));
			}
		}
	}

	reasons
}

fn matches_any_field(source: &Record, logical: LogicalField, wanted: &str) -> bool {
	logical
		.source_fields()
		.iter()
		.filter_map(|field| source.get(*field))
		.any(|value| value_matches(value, wanted))
}

fn degree_reason(profile: &Profile, source: &Record) -> Option<String> {
	let degree = profile.degree.as_deref()?;
	let offered = first_present(source, LogicalField::Degree.source_fields())?;

	if !value_equals(offered, degree) {
		return None;
	}

	match source.get(REQUIRED_DEGREE_FIELD).and_then(text_of) {
		Some(required) if !required.is_empty() =>
			Some(format!("degree_match:profile={degree};required_degree={required}")),
		_ => Some(format!("degree_match:profile={degree}")),
	}
}

fn deadline_reason(profile: &Profile, source: &Record) -> Option<String> {
	if !profile.has_deadline_window() {
		return None;
	}

	let end = deadline::record_deadline(source)?;
	let after_ok = profile.deadline_after.map(|after| end >= after).unwrap_or(true);
	let before_ok = profile.deadline_before.map(|before| end <= before).unwrap_or(true);

	(after_ok && before_ok).then(|| format!("deadline_in_window:{end}"))
}

fn gpa_reason(profile: &Profile, source: &Record) -> Option<&'static str> {
	let gpa = profile.gpa?;
	let required = LogicalField::MinGpa
		.source_fields()
		.iter()
		.filter_map(|field| source.get(*field))
		.find_map(number_of)?;

	Some(if gpa >= required { GPA_REQUIREMENT_MET } else { GPA_BELOW_REQUIREMENT })
}
