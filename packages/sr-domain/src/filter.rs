use std::{
	cmp::Ordering,
	fmt::{Display, Formatter},
};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, Result, deadline, fields};

/// Combination rule, used both among values of one field and among criteria.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
	And,
	#[default]
	Or,
}
impl Operator {
	/// Lowercase form accepted by the engine's `match` operator.
	pub fn as_engine_str(self) -> &'static str {
		match self {
			Self::And => "and",
			Self::Or => "or",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
	String(String),
	Int(i64),
	Float(f64),
}
impl Display for FilterValue {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String(value) => f.write_str(value),
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RangeBound {
	Number(f64),
	Date(Date),
}
impl RangeBound {
	fn compare(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
			(Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
	/// Match the supplied values against the field, joined by `operator`.
	Terms { values: Vec<FilterValue>, operator: Operator },
	/// Inclusive bounds; an absent bound is left open.
	Range { min: Option<RangeBound>, max: Option<RangeBound> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterCriterion {
	pub field: String,
	pub condition: Condition,
}
impl FilterCriterion {
	pub fn terms(field: impl Into<String>, values: Vec<FilterValue>, operator: Operator) -> Self {
		Self { field: field.into(), condition: Condition::Terms { values, operator } }
	}

	pub fn range(
		field: impl Into<String>,
		min: Option<RangeBound>,
		max: Option<RangeBound>,
	) -> Self {
		Self { field: field.into(), condition: Condition::Range { min, max } }
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSet {
	criteria: Vec<FilterCriterion>,
	pub inter_field_operator: Operator,
}
impl FilterSet {
	pub fn new(inter_field_operator: Operator) -> Self {
		Self { criteria: Vec::new(), inter_field_operator }
	}

	pub fn with_criteria(criteria: Vec<FilterCriterion>, inter_field_operator: Operator) -> Self {
		Self { criteria, inter_field_operator }
	}

	/// Normalizes caller-supplied filter inputs, rejecting the first invalid one.
	pub fn from_inputs(inputs: &[FilterInput], inter_field_operator: Operator) -> Result<Self> {
		let criteria = inputs
			.iter()
			.enumerate()
			.map(|(index, input)| input.normalize(&format!("$.filters[{index}]")))
			.collect::<Result<Vec<_>>>()?;

		Ok(Self { criteria, inter_field_operator })
	}

	pub fn push(&mut self, criterion: FilterCriterion) {
		self.criteria.push(criterion);
	}

	pub fn criteria(&self) -> &[FilterCriterion] {
		&self.criteria
	}

	pub fn is_empty(&self) -> bool {
		self.criteria.is_empty()
	}

	pub fn len(&self) -> usize {
		self.criteria.len()
	}
}

/// Range bound as supplied on the wire: a number, or an ISO date string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundInput {
	Number(f64),
	Text(String),
}
impl BoundInput {
	fn parse(&self, path: &str) -> Result<RangeBound> {
		match self {
			Self::Number(value) if value.is_finite() => Ok(RangeBound::Number(*value)),
			Self::Number(_) => Err(Error::InvalidValue {
				path: path.to_string(),
				message: "range bound must be a finite number.".to_string(),
			}),
			Self::Text(raw) => deadline::parse_date(raw)
				.map(RangeBound::Date)
				.ok_or_else(|| Error::InvalidDate { path: path.to_string(), value: raw.clone() }),
		}
	}
}

/// Explicit filter as supplied by a caller. Typed value lists are merged in the order
/// strings, ints, floats.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterInput {
	pub field: String,
	#[serde(default)]
	pub string_values: Option<Vec<String>>,
	#[serde(default)]
	pub int_values: Option<Vec<i64>>,
	#[serde(default)]
	pub float_values: Option<Vec<f64>>,
	#[serde(default)]
	pub min: Option<BoundInput>,
	#[serde(default)]
	pub max: Option<BoundInput>,
	#[serde(default)]
	pub operator: Operator,
}
impl FilterInput {
	pub fn normalize(&self, path: &str) -> Result<FilterCriterion> {
		if !fields::is_filterable(&self.field) {
			return Err(Error::UnknownField {
				path: format!("{path}.field"),
				field: self.field.clone(),
			});
		}

		let values = self.values(path)?;
		let has_bounds = self.min.is_some() || self.max.is_some();

		match (values.is_empty(), has_bounds) {
			(true, false) => Err(Error::EmptyFilter { path: path.to_string() }),
			(false, true) => Err(Error::MixedFilter { path: path.to_string() }),
			(false, false) => Ok(FilterCriterion::terms(self.field.clone(), values, self.operator)),
			(true, true) => {
				let min = self.min.as_ref().map(|raw| raw.parse(&format!("{path}.min"))).transpose()?;
				let max = self.max.as_ref().map(|raw| raw.parse(&format!("{path}.max"))).transpose()?;

				if let (Some(lower), Some(upper)) = (min.as_ref(), max.as_ref()) {
					match lower.compare(upper) {
						None =>
							return Err(Error::InvalidValue {
								path: path.to_string(),
								message: "min and max must both be numbers or both be dates."
									.to_string(),
							}),
						Some(Ordering::Greater) =>
							return Err(Error::InvalidValue {
								path: path.to_string(),
								message: "min must not be greater than max.".to_string(),
							}),
						Some(_) => {},
					}
				}

				Ok(FilterCriterion::range(self.field.clone(), min, max))
			},
		}
	}

	fn values(&self, path: &str) -> Result<Vec<FilterValue>> {
		let mut values = Vec::new();

		for value in self.string_values.iter().flatten() {
			let trimmed = value.trim();

			if !trimmed.is_empty() {
				values.push(FilterValue::String(trimmed.to_string()));
			}
		}

		values.extend(self.int_values.iter().flatten().copied().map(FilterValue::Int));

		for (index, value) in self.float_values.iter().flatten().enumerate() {
			if !value.is_finite() {
				return Err(Error::InvalidValue {
					path: format!("{path}.float_values[{index}]"),
					message: "value must be a finite number.".to_string(),
				});
			}

			values.push(FilterValue::Float(*value));
		}

		Ok(values)
	}
}
