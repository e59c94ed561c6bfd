//! Skill maintenance keyed by e-mail address.

// self
use crate::{_prelude::*, model::ProfileSkill, service::Service};

impl Service {
	/// Sets the level of a named skill on the user's profile, adding the skill if absent.
	///
	/// An existing skill is updated through the synonym id of its matching translation; a
	/// skill without one fails with [`Error::MissingRequiredField`].
	pub async fn update_skill_by_email(
		&self,
		email: &str,
		skill: &str,
		level: u32,
	) -> Result<Option<ProfileSkill>> {
		let user_id = self.api.resolve_user_id_by_email(email).await?;
		let profile = self.get_profile(user_id).await;
		let existing = profile.as_ref().and_then(|p| p.skill(skill)).and_then(|s| s.id.map(|id| (id, s)));

		match existing {
			Some((skill_id, existing)) => {
				let synonym_id = existing.synonym_id_for(skill)?;

				self.api.update_skill(user_id, skill_id, synonym_id, level).await.map(Some)
			},
			None => self.api.add_skill(user_id, skill, level).await,
		}
	}

	/// Removes a named skill from the user's profile.
	///
	/// Returns the removed skill, or `None` when the profile has no such skill.
	pub async fn remove_skill_by_email(&self, email: &str, skill: &str) -> Result<Option<ProfileSkill>> {
		let user_id = self.api.resolve_user_id_by_email(email).await?;
		let Some(profile) = self.get_profile(user_id).await else {
			return Ok(None);
		};
		let Some((skill_id, existing)) =
			profile.skill(skill).and_then(|s| s.id.map(|id| (id, s.clone())))
		else {
			return Ok(None);
		};

		self.api.delete_skill(user_id, skill_id).await?;

		Ok(Some(existing))
	}
}
