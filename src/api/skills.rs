//! Profile skill, skill search, and role skill endpoints.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	api::Api,
	model::{Profile, ProfileSkill, ProjectAssignmentSkill, SearchSkill, SearchSkillResult, UserSkill},
	pipeline::{JSON_PATCH, RequestSpec},
};

impl Api {
	/// Skills listed for the user.
	pub async fn get_user_skills(&self, user_id: u64) -> Result<Vec<UserSkill>> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("users/{user_id}/skills")))).await
	}

	/// One skill entry on the user's profile.
	pub async fn get_user_profile_skill(&self, user_id: u64, skill_id: u64) -> Result<ProfileSkill> {
		self.pipeline
			.execute_json(RequestSpec::get(
				self.path(format!("users/{user_id}/profile/skills/{skill_id}")),
			))
			.await
	}

	/// Full profile (resume data) of the user.
	pub async fn get_profile(&self, user_id: u64) -> Result<Profile> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("users/{user_id}/profile")))).await
	}

	/// Adds a skill by name. Not retried: a repeated call could add the skill twice.
	///
	/// The remote may answer with an empty body, which decodes as `None`.
	pub async fn add_skill(&self, user_id: u64, name: &str, level: u32) -> Result<Option<ProfileSkill>> {
		let spec = RequestSpec::post(self.path(format!("users/{user_id}/profile/skills")))
			.json(json!({ "name": name, "level": level }))
			.content_type(JSON_PATCH);

		self.pipeline.execute_json(spec).await
	}

	/// Changes the level of an existing profile skill.
	pub async fn update_skill(
		&self,
		user_id: u64,
		skill_id: u64,
		keyword_synonym_id: u64,
		level: u32,
	) -> Result<ProfileSkill> {
		let spec = RequestSpec::put(self.path(format!("users/{user_id}/profile/skills/{skill_id}")))
			.json(json!({ "keywordSynonymId": keyword_synonym_id, "level": level }));

		self.pipeline.execute_json(spec).await
	}

	/// Removes a profile skill.
	pub async fn delete_skill(&self, user_id: u64, skill_id: u64) -> Result<()> {
		self.pipeline
			.execute_unit(RequestSpec::delete(
				self.path(format!("users/{user_id}/profile/skills/{skill_id}")),
			))
			.await
	}

	/// Users having a skill matching `term` at a level within `min..=max`.
	pub async fn who_has_skill(
		&self,
		term: &str,
		min: u32,
		max: u32,
		limit: u32,
	) -> Result<SearchSkillResult> {
		let spec = RequestSpec::post(self.path("skills/search/term"))
			.json(json!({ "term": term, "min": min, "max": max, "limit": limit }))
			.retry_safe();

		self.pipeline.execute_json(spec).await
	}

	/// Users having every skill in `terms` at a level within `min..=max`.
	///
	/// Each term is first resolved to keyword ids; the combined keyword search follows.
	pub async fn who_has_skills<S>(&self, terms: &[S], min: u32, max: u32) -> Result<SearchSkillResult>
	where
		S: AsRef<str>,
	{
		let resolved =
			future::try_join_all(terms.iter().map(|term| self.who_has_skill(term.as_ref(), min, max, 0)))
				.await?;
		let skills = resolved
			.iter()
			.flat_map(SearchSkillResult::keyword_ids)
			.map(|keyword_id| SearchSkill { keyword_id: Some(keyword_id), min: Some(min), max: Some(max) })
			.collect::<Vec<_>>();
		let spec =
			RequestSpec::post(self.path("skills/search")).json(json!({ "skills": skills })).retry_safe();

		self.pipeline.execute_json(spec).await
	}

	/// Adds a skill requirement to a role. Not retried.
	pub async fn add_project_assignment_skill(
		&self,
		project_id: u64,
		role_id: u64,
		name: &str,
		level: u32,
		is_mandatory: bool,
	) -> Result<ProjectAssignmentSkill> {
		let spec = RequestSpec::post(self.path(format!("projects/{project_id}/roles/{role_id}/skills")))
			.json(json!({ "name": name, "level": level, "isMandatory": is_mandatory }))
			.content_type(JSON_PATCH);

		self.pipeline.execute_json(spec).await
	}

	/// Changes a role's skill requirement.
	pub async fn update_project_assignment_skill(
		&self,
		project_id: u64,
		role_id: u64,
		skill_id: u64,
		level: u32,
		is_mandatory: bool,
	) -> Result<ProjectAssignmentSkill> {
		let spec = RequestSpec::put(
			self.path(format!("projects/{project_id}/roles/{role_id}/skills/{skill_id}")),
		)
		.json(json!({ "level": level, "isMandatory": is_mandatory }));

		self.pipeline.execute_json(spec).await
	}

	/// Removes a role's skill requirement.
	pub async fn remove_project_assignment_skill(
		&self,
		project_id: u64,
		role_id: u64,
		skill_id: u64,
	) -> Result<()> {
		self.pipeline
			.execute_unit(RequestSpec::delete(
				self.path(format!("projects/{project_id}/roles/{role_id}/skills/{skill_id}")),
			))
			.await
	}
}
