use serde_json::{Map, Value};

/// Raw engine source document.
pub type Record = Map<String, Value>;

/// Returns the first of `keys` that is present and not null.
pub fn first_present<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
	keys.iter().filter_map(|key| record.get(*key)).find(|value| !value.is_null())
}

/// Renders a scalar or list value as display text.
pub fn text_of(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		Value::Array(items) => {
			let parts: Vec<String> = items.iter().filter_map(text_of).collect();

			if parts.is_empty() { None } else { Some(parts.join(", ")) }
		},
		Value::Null | Value::Object(_) => None,
	}
}

/// Reads a numeric value, accepting numeric strings.
pub fn number_of(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64(),
		Value::String(text) => text.trim().parse::<f64>().ok().filter(|parsed| parsed.is_finite()),
		_ => None,
	}
}

/// Flattens every scalar in the record, depth first, into one space-separated string.
pub fn flatten_text(record: &Record) -> String {
	fn walk(value: &Value, out: &mut Vec<String>) {
		match value {
			Value::Object(map) => map.values().for_each(|inner| walk(inner, out)),
			Value::Array(items) => items.iter().for_each(|inner| walk(inner, out)),
			Value::String(text) => out.push(text.clone()),
			Value::Number(number) => out.push(number.to_string()),
			Value::Bool(flag) => out.push(flag.to_string()),
			Value::Null => {},
		}
	}

	let mut parts = Vec::new();

	record.values().for_each(|value| walk(value, &mut parts));

	parts.join(" ")
}

/// Lowercased alphanumeric tokens, in order.
pub fn tokens(text: &str) -> Vec<String> {
	text.split(|c: char| !c.is_alphanumeric())
		.filter(|token| !token.is_empty())
		.map(str::to_lowercase)
		.collect()
}

/// Case-insensitive whole-token match against a string, number or list of them.
///
/// `wanted` must appear as a contiguous run of tokens, so `UK` does not match `Ukraine`.
pub fn value_matches(value: &Value, wanted: &str) -> bool {
	let wanted = tokens(wanted);

	!wanted.is_empty() && matches_tokens(value, &wanted)
}

fn matches_tokens(value: &Value, wanted: &[String]) -> bool {
	match value {
		Value::Array(items) => items.iter().any(|item| matches_tokens(item, wanted)),
		Value::String(text) => tokens(text).windows(wanted.len()).any(|run| run == wanted),
		Value::Number(number) => tokens(&number.to_string()) == wanted,
		_ => false,
	}
}

/// Case-insensitive equality against a string or any element of a list.
pub fn value_equals(value: &Value, wanted: &str) -> bool {
	let wanted = wanted.trim();

	match value {
		Value::Array(items) => items.iter().any(|item| value_equals(item, wanted)),
		Value::String(text) => text.trim().eq_ignore_ascii_case(wanted),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn record(value: Value) -> Record {
		value.as_object().cloned().expect("record must be an object")
	}

	#[test]
	fn matches_whole_tokens_only() {
		assert!(value_matches(&json!("Full tuition"), "full"));
		assert!(value_matches(&json!(["Data Science", "Computer Science"]), "computer science"));
		assert!(!value_matches(&json!("Ukraine"), "UK"));
		assert!(!value_matches(&json!("Science Computer"), "computer science"));
		assert!(!value_matches(&json!("UK"), "  "));
	}

	#[test]
	fn flatten_collects_nested_scalars() {
		let record = record(json!({
			"Scholarship_Name": "Chevening",
			"Country": ["UK", "Ireland"],
			"Meta": { "Min_GPA": 3.2, "open": true, "note": null }
		}));

		let mut words: Vec<String> =
			flatten_text(&record).split(' ').map(str::to_string).collect();

		words.sort();

		assert_eq!(words, vec!["3.2", "Chevening", "Ireland", "UK", "true"]);
	}

	#[test]
	fn first_present_skips_nulls() {
		let record = record(json!({ "Degree": null, "Eligible_Degree": "Master" }));
		let found = first_present(&record, &["Degree", "Eligible_Degree"]);

		assert_eq!(found, Some(&json!("Master")));
	}

	#[test]
	fn matching_is_case_insensitive() {
		assert!(value_matches(&json!("Computer Science, Data"), "computer science"));
		assert!(value_matches(&json!(["Law", "Economics"]), "ECONOMICS"));
		assert!(!value_matches(&json!("Law"), "  "));
		assert!(value_equals(&json!(["Bachelor", "master"]), "Master"));
		assert!(!value_equals(&json!("Masters"), "Master"));
	}

	#[test]
	fn numbers_accept_numeric_strings() {
		assert_eq!(number_of(&json!("3.5")), Some(3.5));
		assert_eq!(number_of(&json!(3)), Some(3.0));
		assert_eq!(number_of(&json!("n/a")), None);
	}
}
