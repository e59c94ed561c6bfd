//! Aggregates composed from several endpoint calls.
//!
//! [`Service`] wraps an [`Api`] and adds the company-specific knobs aggregates need: e-mail
//! addresses to leave out of people listings and the names of back-office teams whose members
//! are not consultants. Fan-out requests run concurrently; the shared rate limiter paces them.

pub mod filters;

mod people;
mod projects;
mod skills;

// self
use crate::{
	_prelude::*,
	api::Api,
	cache::{self, Memoized},
	model::{CompanyBase, PipelineStage, Profile, ProjectPipeline, ProjectWithTeam},
	obs,
};

/// Aggregating facade over [`Api`].
#[derive(Debug)]
pub struct Service {
	api: Arc<Api>,
	ignored_emails: HashSet<String>,
	backoffice_teams: HashSet<String>,
	image_urls: Memoized<u64, Option<String>>,
	team_mates: Memoized<u64, Vec<ProjectWithTeam>>,
}
impl Service {
	/// Creates a service with no ignored e-mails and no back-office teams.
	pub fn new(api: impl Into<Arc<Api>>) -> Self {
		Self {
			api: api.into(),
			ignored_emails: HashSet::new(),
			backoffice_teams: HashSet::new(),
			image_urls: Memoized::new("user_image_url", cache::IMAGE_URL_TTL),
			team_mates: Memoized::new("projects_with_team_mates", cache::TEAM_MATES_TTL),
		}
	}

	/// Leaves users with these e-mail addresses out of people listings.
	pub fn with_ignored_emails<I, S>(mut self, emails: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ignored_emails = emails.into_iter().map(Into::into).collect();

		self
	}

	/// Treats members of only these teams as back-office staff rather than consultants.
	pub fn with_backoffice_teams<I, S>(mut self, teams: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.backoffice_teams = teams.into_iter().map(Into::into).collect();

		self
	}

	/// Underlying endpoint operations.
	pub fn api(&self) -> &Arc<Api> {
		&self.api
	}

	/// Company the service is scoped to.
	pub fn company(&self) -> &CompanyBase {
		self.api.company()
	}

	/// Best-effort profile fetch: any failure degrades to `None`.
	pub async fn get_profile(&self, user_id: u64) -> Option<Profile> {
		match self.api.get_profile(user_id).await {
			Ok(profile) => Some(profile),
			Err(e) => {
				obs::debug_event("profile unavailable; continuing without it", &e.to_string());

				None
			},
		}
	}

	/// Sales pipelines (memoized by the API).
	pub async fn get_project_pipelines(&self) -> Result<Vec<ProjectPipeline>> {
		self.api.get_project_pipelines().await
	}

	/// Pipeline with the given id.
	pub async fn get_project_pipeline(&self, pipeline_id: u64) -> Result<Option<ProjectPipeline>> {
		Ok(self.get_project_pipelines().await?.into_iter().find(|p| p.id == Some(pipeline_id)))
	}

	/// Pipeline with the given title.
	pub async fn get_project_pipeline_by_title(&self, title: &str) -> Result<Option<ProjectPipeline>> {
		Ok(self
			.get_project_pipelines()
			.await?
			.into_iter()
			.find(|p| p.title.as_deref() == Some(title)))
	}

	/// Stage titled `stage_title` in the pipeline titled `pipeline_title`.
	pub async fn get_project_pipeline_stage_by_titles(
		&self,
		pipeline_title: &str,
		stage_title: &str,
	) -> Result<Option<PipelineStage>> {
		Ok(self
			.get_project_pipeline_by_title(pipeline_title)
			.await?
			.and_then(|pipeline| pipeline.stages)
			.and_then(|stages| stages.into_iter().find(|s| s.title.as_deref() == Some(stage_title))))
	}
}
