use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
	Error, Result, deadline,
	fields::LogicalField,
	filter::{FilterCriterion, FilterSet, FilterValue, Operator, RangeBound},
};

/// Profile as supplied on the wire. Dates are still raw strings here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
	pub gpa_range_4: Option<f64>,
	pub degree: Option<String>,
	pub field_of_study: Option<String>,
	pub desired_countries: Option<Vec<String>>,
	pub desired_scholarship_type: Option<Vec<String>>,
	pub desired_funding_level: Option<Vec<String>>,
	pub desired_application_mode: Option<Vec<String>>,
	pub deadline_after: Option<String>,
	pub deadline_before: Option<String>,
	pub keywords: Option<String>,
}
impl ProfileInput {
	/// Validates the input at the request boundary. Malformed dates are rejected, never
	/// coerced.
	pub fn parse(&self) -> Result<Profile> {
		let gpa = match self.gpa_range_4 {
			Some(gpa) if !gpa.is_finite() || gpa < 0.0 =>
				return Err(Error::InvalidValue {
					path: "$.profile.gpa_range_4".to_string(),
					message: "gpa must be a finite, non-negative number.".to_string(),
				}),
			other => other,
		};
		let deadline_after = parse_profile_date("$.profile.deadline_after", &self.deadline_after)?;
		let deadline_before =
			parse_profile_date("$.profile.deadline_before", &self.deadline_before)?;

		if let (Some(after), Some(before)) = (deadline_after, deadline_before)
			&& after > before
		{
			return Err(Error::InvalidValue {
				path: "$.profile.deadline_after".to_string(),
				message: "deadline_after must not be later than deadline_before.".to_string(),
			});
		}

		Ok(Profile {
			degree: non_blank(&self.degree),
			field_of_study: non_blank(&self.field_of_study),
			countries: non_blank_list(&self.desired_countries),
			scholarship_types: non_blank_list(&self.desired_scholarship_type),
			funding_levels: non_blank_list(&self.desired_funding_level),
			application_modes: non_blank_list(&self.desired_application_mode),
			gpa,
			deadline_after,
			deadline_before,
			keywords: non_blank(&self.keywords),
		})
	}
}

/// Validated, request-scoped preference set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Profile {
	pub degree: Option<String>,
	pub field_of_study: Option<String>,
	pub countries: Vec<String>,
	pub scholarship_types: Vec<String>,
	pub funding_levels: Vec<String>,
	pub application_modes: Vec<String>,
	pub gpa: Option<f64>,
	pub deadline_after: Option<Date>,
	pub deadline_before: Option<Date>,
	pub keywords: Option<String>,
}
impl Profile {
	pub fn has_deadline_window(&self) -> bool {
		self.deadline_after.is_some() || self.deadline_before.is_some()
	}

	/// Maps populated preferences to criteria in a fixed order, combined with `OR`.
	///
	/// An empty result means the profile cannot filter; it never means "match all".
	/// Free-text keywords are not filters and do not appear here.
	pub fn to_filter_set(&self) -> FilterSet {
		let mut set = FilterSet::new(Operator::Or);

		if let Some(degree) = self.degree.as_ref() {
			push_terms(&mut set, LogicalField::Degree, std::slice::from_ref(degree));
		}
		if let Some(field_of_study) = self.field_of_study.as_ref() {
			push_terms(&mut set, LogicalField::FieldOfStudy, std::slice::from_ref(field_of_study));
		}

		push_terms(&mut set, LogicalField::Country, &self.countries);
		push_terms(&mut set, LogicalField::ScholarshipType, &self.scholarship_types);
		push_terms(&mut set, LogicalField::FundingLevel, &self.funding_levels);
		push_terms(&mut set, LogicalField::ApplicationMode, &self.application_modes);

		if let Some(gpa) = self.gpa {
			for field in LogicalField::MinGpa.query_fields() {
				set.push(FilterCriterion::range(*field, Some(RangeBound::Number(gpa)), None));
			}
		}
		if self.has_deadline_window() {
			for field in LogicalField::Deadline.query_fields() {
				set.push(FilterCriterion::range(
					*field,
					self.deadline_after.map(RangeBound::Date),
					self.deadline_before.map(RangeBound::Date),
				));
			}
		}

		set
	}
}

fn push_terms(set: &mut FilterSet, logical: LogicalField, values: &[String]) {
	if values.is_empty() {
		return;
	}

	for field in logical.query_fields() {
		set.push(FilterCriterion::terms(
			*field,
			values.iter().cloned().map(FilterValue::String).collect(),
			Operator::Or,
		));
	}
}

fn parse_profile_date(path: &str, raw: &Option<String>) -> Result<Option<Date>> {
	let Some(raw) = raw.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
		return Ok(None);
	};

	deadline::parse_date(raw)
		.map(Some)
		.ok_or_else(|| Error::InvalidDate { path: path.to_string(), value: raw.to_string() })
}

fn non_blank(raw: &Option<String>) -> Option<String> {
	raw.as_deref().map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

fn non_blank_list(raw: &Option<Vec<String>>) -> Vec<String> {
	raw.iter()
		.flatten()
		.map(|value| value.trim())
		.filter(|value| !value.is_empty())
		.map(str::to_string)
		.collect()
}
