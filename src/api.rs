//! Typed operations mapping 1:1 onto Cinode endpoints.
//!
//! [`Api`] binds one company to a shared [`RequestPipeline`] and owns the memoized lookups
//! whose data changes slowly enough to cache. Operations are split by resource across the
//! submodules; every call declares its retryability at the call site.

mod customers;
mod projects;
mod skills;
mod users;

// self
use crate::{
	_prelude::*,
	cache::{self, Memoized},
	config::CinodeConfig,
	error::ConfigError,
	model::{CompanyBase, ProjectPipeline},
	pagination::PaginatedFetcher,
	pipeline::RequestPipeline,
};

/// Endpoint operations for one company.
#[derive(Debug)]
pub struct Api {
	company: CompanyBase,
	pipeline: Arc<RequestPipeline>,
	emails: Memoized<u64, String>,
	user_ids: Memoized<String, u64>,
	pipelines: Memoized<(), Vec<ProjectPipeline>>,
}
impl Api {
	/// Version prefix shared by every endpoint.
	pub const VERSION: &'static str = "v0.1";

	/// Creates an API bound to `company` that issues every call through `pipeline`.
	pub fn new(company: CompanyBase, pipeline: impl Into<Arc<RequestPipeline>>) -> Self {
		Self {
			company,
			pipeline: pipeline.into(),
			emails: Memoized::new("user_email", cache::EMAIL_TTL),
			user_ids: Memoized::new("user_id_by_email", cache::EMAIL_TTL),
			pipelines: Memoized::new("project_pipelines", cache::PIPELINE_TTL),
		}
	}

	/// Builds the API and its pipeline from environment-style configuration.
	pub fn from_config(config: &CinodeConfig) -> Result<Self> {
		Ok(Self::new(config.company(), RequestPipeline::from_config(config)?))
	}

	/// Company every path is scoped to.
	pub fn company(&self) -> &CompanyBase {
		&self.company
	}

	/// Pipeline shared by every operation.
	pub fn pipeline(&self) -> &Arc<RequestPipeline> {
		&self.pipeline
	}

	/// Fetcher for multi-page searches issued through this API's pipeline.
	pub fn paginated(&self) -> PaginatedFetcher<'_> {
		PaginatedFetcher::new(&self.pipeline)
	}

	/// Drops every memoized value.
	pub fn clear_caches(&self) {
		self.emails.clear();
		self.user_ids.clear();
		self.pipelines.clear();
	}

	pub(crate) fn path(&self, tail: impl Display) -> String {
		format!("{}/companies/{}/{tail}", Self::VERSION, self.company.id)
	}
}

pub(crate) fn to_body(body: &impl Serialize) -> Result<Value> {
	serde_json::to_value(body).map_err(|e| ConfigError::from(e).into())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::Credential;

	#[test]
	fn paths_are_scoped_to_the_company() {
		let pipeline = RequestPipeline::builder(Credential::new("token"))
			.build()
			.expect("Pipeline should build.");
		let api = Api::new(CompanyBase { id: 42, name: "acme".into() }, pipeline);

		assert_eq!(api.path("users/7/roles"), "v0.1/companies/42/users/7/roles");
		assert_eq!(api.company().name, "acme");
	}
}
