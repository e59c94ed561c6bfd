//! People and consultant aggregates.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	model::{CompanyImage, CompanyUser, Consultant, UserAssignments},
	service::{Service, filters},
	urls,
};

impl Service {
	/// Full records of every user.
	pub async fn get_users(&self) -> Result<Vec<CompanyUser>> {
		let users = self.api.list_users().await?;

		future::try_join_all(
			users.into_iter().filter_map(|u| u.company_user_id).map(|id| self.api.get_user(id)),
		)
		.await
	}

	/// Employed users not about to leave and not ignored, with their absences.
	pub async fn get_active_people(&self) -> Result<Vec<Consultant>> {
		let now = OffsetDateTime::now_utc();
		let users = self
			.get_users()
			.await?
			.into_iter()
			.filter(|user| filters::is_active_person(user, now))
			.filter(|user| filters::not_ignored(user, &self.ignored_emails));

		future::try_join_all(users.map(|user| async move {
			let absences = self.api.get_user_absences(user.require_id()?).await?;

			Ok::<_, Error>(Consultant { user, absences, ..Default::default() })
		}))
		.await
	}

	/// Active people outside the back-office teams.
	pub async fn get_active_consultants(&self) -> Result<Vec<Consultant>> {
		let mut consultants = Vec::new();

		for person in self.get_active_people().await? {
			if !filters::only_in_teams(&person.user, &self.backoffice_teams)? {
				consultants.push(person);
			}
		}

		Ok(consultants)
	}

	/// Consultants without a current or imminent assigned role.
	pub async fn get_available_consultants(&self) -> Result<Vec<Consultant>> {
		let now = OffsetDateTime::now_utc();

		self.get_filtered_consultants(|assignments| !filters::has_active_role(assignments, now)).await
	}

	/// Consultants with a current or imminent assigned role.
	pub async fn get_booked_consultants(&self) -> Result<Vec<Consultant>> {
		let now = OffsetDateTime::now_utc();

		self.get_filtered_consultants(|assignments| filters::has_active_role(assignments, now)).await
	}

	/// Consultants whose roles satisfy `keep`, enriched with roles and (best-effort) profiles.
	pub async fn get_filtered_consultants<F>(&self, keep: F) -> Result<Vec<Consultant>>
	where
		F: Fn(&UserAssignments) -> bool,
	{
		let consultants = self.get_active_consultants().await?;
		let with_roles = future::try_join_all(consultants.into_iter().map(|consultant| async move {
			let assignments = self.api.get_user_assignments(consultant.user.require_id()?).await?;

			Ok::<_, Error>(Consultant { assignments: Some(assignments), ..consultant })
		}))
		.await?;
		let kept = with_roles
			.into_iter()
			.filter(|c| c.assignments.as_ref().is_some_and(&keep));

		future::try_join_all(kept.map(|consultant| async move {
			let profile = self.get_profile(consultant.user.require_id()?).await;

			Ok::<_, Error>(Consultant { profile, ..consultant })
		}))
		.await
	}

	/// Most recently uploaded image of the user.
	pub async fn get_user_image(&self, user_id: u64) -> Result<Option<CompanyImage>> {
		Ok(self.api.get_user_images(user_id).await?.pop())
	}

	/// URL of the user's most recent image, memoized for 24 minutes.
	pub async fn get_user_image_url(&self, user_id: u64) -> Result<Option<String>> {
		self.image_urls
			.get_or_try_insert_with(user_id, || async move {
				let company_id = self.api.company().id;
				let url = self.get_user_image(user_id).await?.and_then(|mut image| {
					image.company_id = image.company_id.or(Some(company_id));

					urls::image_url(&image)
				});

				Ok(url)
			})
			.await
	}
}
