//! Engine field names and the logical profile field table.
//!
//! Each logical profile preference may probe several engine fields because records
//! mirrored from different sources name the same attribute differently. Adding a new
//! source variant is an edit to [`FIELD_TABLE`].

/// Catch-all analyzed text built from every scalar in a record at index time.
pub const TEXT_FIELD: &str = "__text";
/// Keyword field stamped on every indexed record to scope queries to one collection.
pub const COLLECTION_FIELD: &str = "collection";

pub const NAME_FIELD: &str = "Scholarship_Name";
pub const COUNTRY_FIELD: &str = "Country";
pub const START_DATE_FIELD: &str = "Start_Date";
pub const END_DATE_FIELD: &str = "End_Date";
pub const FUNDING_LEVEL_FIELD: &str = "Funding_Level";
pub const REQUIRED_DEGREE_FIELD: &str = "required_degree";

/// Fields callers may name in explicit filters. Matching is case-sensitive.
pub const FILTERABLE_FIELDS: &[&str] = &[
	"Scholarship_Name",
	"Provider",
	"Country",
	"Degree",
	"Eligible_Degree",
	"required_degree",
	"Eligible_Fields",
	"Scholarship_Type",
	"Funding_Level",
	"Application_Mode",
	"Min_GPA",
	"Start_Date",
	"End_Date",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalField {
	FieldOfStudy,
	Degree,
	Country,
	ScholarshipType,
	FundingLevel,
	ApplicationMode,
	Deadline,
	MinGpa,
}
impl LogicalField {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::FieldOfStudy => "field_of_study",
			Self::Degree => "degree",
			Self::Country => "country",
			Self::ScholarshipType => "scholarship_type",
			Self::FundingLevel => "funding_level",
			Self::ApplicationMode => "application_mode",
			Self::Deadline => "deadline",
			Self::MinGpa => "gpa",
		}
	}

	/// Engine fields queried for this preference, in fan-out order.
	pub fn query_fields(self) -> &'static [&'static str] {
		self.mapping().query_fields
	}

	/// Record fields read when explaining a match, in probe order.
	pub fn source_fields(self) -> &'static [&'static str] {
		self.mapping().source_fields
	}

	fn mapping(self) -> &'static FieldMapping {
		FIELD_TABLE
			.iter()
			.find(|mapping| mapping.logical == self)
			.unwrap_or(&FIELD_TABLE[0])
	}
}

pub struct FieldMapping {
	pub logical: LogicalField,
	pub query_fields: &'static [&'static str],
	pub source_fields: &'static [&'static str],
}

pub const FIELD_TABLE: [FieldMapping; 8] = [
	FieldMapping {
		logical: LogicalField::FieldOfStudy,
		query_fields: &["Eligible_Fields"],
		source_fields: &["Eligible_Fields"],
	},
	FieldMapping {
		logical: LogicalField::Degree,
		query_fields: &["Degree", "Eligible_Degree", "required_degree"],
		source_fields: &["Degree", "Eligible_Degree", "required_degree"],
	},
	FieldMapping {
		logical: LogicalField::Country,
		query_fields: &["Country"],
		source_fields: &["Country"],
	},
	FieldMapping {
		logical: LogicalField::ScholarshipType,
		query_fields: &["Scholarship_Type"],
		source_fields: &["Scholarship_Type"],
	},
	FieldMapping {
		logical: LogicalField::FundingLevel,
		query_fields: &["Funding_Level"],
		source_fields: &["Funding_Level"],
	},
	FieldMapping {
		logical: LogicalField::ApplicationMode,
		query_fields: &["Application_Mode"],
		source_fields: &["Application_Mode"],
	},
	FieldMapping {
		logical: LogicalField::Deadline,
		query_fields: &["End_Date"],
		source_fields: &["End_Date"],
	},
	FieldMapping {
		logical: LogicalField::MinGpa,
		query_fields: &["Min_GPA"],
		source_fields: &["Min_GPA", "Minimum_GPA", "GPA"],
	},
];

pub fn is_filterable(field: &str) -> bool {
	FILTERABLE_FIELDS.contains(&field)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_logical_field_has_a_mapping() {
		for mapping in &FIELD_TABLE {
			assert_eq!(mapping.logical.query_fields(), mapping.query_fields);
			assert!(!mapping.query_fields.is_empty(), "{} has no query fields", mapping.logical.as_str());
		}
	}

	#[test]
	fn query_fields_are_filterable() {
		for mapping in &FIELD_TABLE {
			for field in mapping.query_fields {
				assert!(is_filterable(field), "{field} missing from allowlist");
			}
		}
	}

	#[test]
	fn filterable_lookup_is_case_sensitive() {
		assert!(is_filterable("Country"));
		assert!(!is_filterable("country"));
		assert!(!is_filterable(TEXT_FIELD));
		assert!(!is_filterable(COLLECTION_FIELD));
	}
}
