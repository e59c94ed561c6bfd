//! Materialization of multi-page search endpoints.
//!
//! Search endpoints are POSTs only because their query bodies are too large for a query
//! string; they are read-only, so every page request is issued as retry-safe.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	pipeline::{RequestPipeline, RequestSpec},
};

/// Paging metadata echoed by search endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedAndSortedBy {
	/// Page size used by the remote.
	#[serde(default)]
	pub items_per_page: u64,
	/// 1-based page index, when echoed.
	#[serde(default)]
	pub page: Option<u64>,
}

/// One page of a search result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<T> {
	/// Paging metadata.
	#[serde(default)]
	pub paged_and_sorted_by: PagedAndSortedBy,
	/// Items on this page; absent or `null` near the end of a result set.
	#[serde(default = "Option::default")]
	pub result: Option<Vec<T>>,
	/// Number of matches reported by the remote.
	#[serde(default)]
	pub hits: u64,
	/// Total number of items across all pages.
	#[serde(default)]
	pub total_items: u64,
}
impl<T> SearchPage<T> {
	/// Number of pages implied by `total_items / items_per_page`, rounded up.
	pub fn page_count(&self) -> u64 {
		match self.paged_and_sorted_by.items_per_page {
			0 => 0,
			per_page => self.total_items.div_ceil(per_page),
		}
	}

	/// Items on this page; a missing `result` contributes nothing.
	pub fn into_items(self) -> Vec<T> {
		self.result.unwrap_or_default()
	}
}

/// Drives a search endpoint until every page has been fetched.
#[derive(Clone, Copy, Debug)]
pub struct PaginatedFetcher<'p> {
	pipeline: &'p RequestPipeline,
}
impl<'p> PaginatedFetcher<'p> {
	/// Field merged into the query to select a page.
	pub const PAGE_SELECTOR: &'static str = "pageAndSortBy";

	/// Creates a fetcher bound to `pipeline`.
	pub fn new(pipeline: &'p RequestPipeline) -> Self {
		Self { pipeline }
	}

	/// Fetches every page of the search at `path` and concatenates the results in page order.
	///
	/// The base query is issued once to learn the paging parameters; pages `1..=page_count`
	/// are then requested concurrently with the page selector merged into the query.
	pub async fn fetch_all<T>(&self, path: &str, query: Value) -> Result<Vec<T>>
	where
		T: 'static + Send + DeserializeOwned,
	{
		if !query.is_object() {
			return Err(ConfigError::InvalidQuery.into());
		}

		let first_page = self
			.pipeline
			.execute_json::<SearchPage<Value>>(RequestSpec::post(path).json(query.clone()).retry_safe())
			.await?;

		if first_page.paged_and_sorted_by.items_per_page == 0 && first_page.total_items > 0 {
			return Err(Error::missing_field(
				"pagedAndSortedBy.itemsPerPage",
				format!("Search response from {path}"),
			));
		}

		let requests = (1..=first_page.page_count())
			.map(|page| {
				let spec = RequestSpec::post(path).json(with_page(&query, page)).retry_safe();

				self.pipeline.execute_json::<SearchPage<T>>(spec)
			})
			.collect::<Vec<_>>();
		let pages = future::try_join_all(requests).await?;

		Ok(pages.into_iter().flat_map(SearchPage::into_items).collect())
	}
}

/// Returns a copy of `query` selecting the given 1-based page.
///
/// An existing selector object keeps its other fields (sort order, page size).
pub fn with_page(query: &Value, page: u64) -> Value {
	let mut query = query.clone();

	if let Some(fields) = query.as_object_mut() {
		let selector = fields
			.entry(PaginatedFetcher::PAGE_SELECTOR)
			.or_insert_with(|| Value::Object(Default::default()));

		match selector.as_object_mut() {
			Some(selector) => {
				selector.insert("page".into(), json!(page));
			},
			None => *selector = json!({ "page": page }),
		}
	}

	query
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn page(items_per_page: u64, total_items: u64) -> SearchPage<u64> {
		SearchPage {
			paged_and_sorted_by: PagedAndSortedBy { items_per_page, page: None },
			result: None,
			hits: total_items,
			total_items,
		}
	}

	#[test]
	fn page_count_rounds_up() {
		assert_eq!(page(15, 0).page_count(), 0);
		assert_eq!(page(15, 15).page_count(), 1);
		assert_eq!(page(15, 16).page_count(), 2);
		assert_eq!(page(15, 45).page_count(), 3);
		assert_eq!(page(0, 10).page_count(), 0);
	}

	#[test]
	fn null_result_contributes_nothing() {
		let parsed: SearchPage<u64> = serde_json::from_value(json!({
			"pagedAndSortedBy": { "itemsPerPage": 15 },
			"result": null,
			"hits": 0,
			"totalItems": 0
		}))
		.expect("Page should decode.");

		assert!(parsed.into_items().is_empty());
	}

	#[test]
	fn page_selector_is_merged_into_the_query() {
		let base = json!({ "term": "rust", "pageAndSortBy": { "sortBy": 1 } });

		assert_eq!(
			with_page(&base, 3),
			json!({ "term": "rust", "pageAndSortBy": { "sortBy": 1, "page": 3 } })
		);
		assert_eq!(with_page(&json!({}), 1), json!({ "pageAndSortBy": { "page": 1 } }));
		assert_eq!(base["pageAndSortBy"].get("page"), None);
	}
}
