use serde::Serialize;

use crate::Record;

/// One engine hit. `score` is engine-assigned and passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchHit {
	pub id: String,
	pub score: f64,
	pub source: Option<Record>,
}

/// A window of hits plus pagination state.
///
/// `has_next` is always `offset + size < total` and `next_offset` is present exactly when
/// `has_next` holds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultPage {
	pub total: u64,
	pub items: Vec<SearchHit>,
	pub has_next: bool,
	pub next_offset: Option<u64>,
}
impl ResultPage {
	pub fn new(total: u64, items: Vec<SearchHit>, offset: u32, size: u32) -> Self {
		let end = u64::from(offset) + u64::from(size);
		let has_next = end < total;

		Self { total, items, has_next, next_offset: has_next.then_some(end) }
	}

	pub fn empty() -> Self {
		Self::default()
	}

	pub fn ids(&self) -> Vec<String> {
		self.items.iter().map(|hit| hit.id.clone()).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn last_window_has_no_next_page() {
		let page = ResultPage::new(25, Vec::new(), 20, 10);

		assert!(!page.has_next);
		assert_eq!(page.next_offset, None);
	}

	#[test]
	fn middle_window_points_at_next_offset() {
		let page = ResultPage::new(25, Vec::new(), 10, 10);

		assert!(page.has_next);
		assert_eq!(page.next_offset, Some(20));
	}

	#[test]
	fn exact_boundary_has_no_next_page() {
		let page = ResultPage::new(20, Vec::new(), 10, 10);

		assert!(!page.has_next);
		assert_eq!(page.next_offset, None);
	}

	#[test]
	fn empty_page_is_terminal() {
		let page = ResultPage::empty();

		assert_eq!(page.total, 0);
		assert!(page.items.is_empty());
		assert!(!page.has_next);
	}
}
