use std::collections::HashSet;

use sr_domain::page::ResultPage;

/// Keeps keyword hits whose id also appears in the filter page, in keyword order.
///
/// Filter scores and order are discarded. `total` is the surviving count, not an engine
/// total.
pub fn fuse(keyword: ResultPage, filter: &ResultPage, offset: u32, size: u32) -> ResultPage {
	let allowed: HashSet<&str> = filter.items.iter().map(|hit| hit.id.as_str()).collect();
	let items: Vec<_> =
		keyword.items.into_iter().filter(|hit| allowed.contains(hit.id.as_str())).collect();

	ResultPage::new(items.len() as u64, items, offset, size)
}

#[cfg(test)]
mod tests {
	use sr_domain::page::SearchHit;

	use super::*;

	fn hit(id: &str, score: f64) -> SearchHit {
		SearchHit { id: id.to_string(), score, source: None }
	}

	fn page(items: Vec<SearchHit>) -> ResultPage {
		ResultPage::new(items.len() as u64, items, 0, 10)
	}

	#[test]
	fn preserves_keyword_order_and_scores() {
		let keyword = page(vec![hit("1", 9.0), hit("2", 7.0), hit("3", 5.0)]);
		let filter = page(vec![hit("3", 1.0), hit("1", 0.5)]);
		let fused = fuse(keyword, &filter, 0, 10);

		assert_eq!(fused.ids(), vec!["1".to_string(), "3".to_string()]);
		assert_eq!(fused.items[0].score, 9.0);
		assert_eq!(fused.total, 2);
		assert!(!fused.has_next);
	}

	#[test]
	fn empty_filter_leg_empties_result() {
		let keyword = page(vec![hit("1", 9.0)]);
		let fused = fuse(keyword, &ResultPage::empty(), 0, 10);

		assert!(fused.items.is_empty());
		assert_eq!(fused.total, 0);
	}
}
