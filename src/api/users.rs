//! User, absence, assignment, and image endpoints plus the memoized identity lookups.

// self
use crate::{
	_prelude::*,
	api::Api,
	model::{AbsencePeriod, CompanyImage, CompanyUser, CompanyUserBase, UserAssignments},
	pagination::SearchPage,
	pipeline::RequestSpec,
};

impl Api {
	/// Lists every user of the company (scarce shape: no team information).
	pub async fn list_users(&self) -> Result<Vec<CompanyUser>> {
		self.pipeline.execute_json(RequestSpec::get(self.path("users"))).await
	}

	/// Fetches the full user record.
	pub async fn get_user(&self, user_id: u64) -> Result<CompanyUser> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("users/{user_id}")))).await
	}

	/// Replaces the user's desired assignment text.
	pub async fn update_desired_assignment(
		&self,
		user_id: u64,
		desired_assignment: &str,
	) -> Result<CompanyUser> {
		let patch = json!([{
			"path": "desiredAssignment",
			"op": "replace",
			"value": desired_assignment,
		}]);

		self.pipeline
			.execute_json(RequestSpec::patch(self.path(format!("users/{user_id}"))).json(patch))
			.await
	}

	/// Free-text user search. Read-only, so retried like a `GET`.
	pub async fn search_users(&self, term: &str) -> Result<SearchPage<CompanyUserBase>> {
		let spec = RequestSpec::post(self.path("users/search")).json(json!({ "term": term })).retry_safe();

		self.pipeline.execute_json(spec).await
	}

	/// E-mail address of a user, memoized for a week.
	pub async fn get_user_email(&self, user_id: u64) -> Result<String> {
		self.emails
			.get_or_try_insert_with(user_id, || async move {
				self.get_user(user_id).await?.company_user_email.ok_or_else(|| {
					Error::missing_field("companyUserEmail", format!("User {user_id}"))
				})
			})
			.await
	}

	/// Resolves an e-mail address to exactly one user id, memoized for a week.
	///
	/// Zero matches fail with [`Error::NotFound`]; more than one with
	/// [`Error::TooManyMatches`]. The first match is never picked silently. A single hit whose
	/// record is absent or lacks an id fails with [`Error::MissingRequiredField`].
	pub async fn resolve_user_id_by_email(&self, email: &str) -> Result<u64> {
		self.user_ids
			.get_or_try_insert_with(email.to_owned(), || async move {
				let search = self.search_users(email).await?;
				let what = format!("user with e-mail {email}");

				match (search.hits, search.result) {
					(0, _) | (_, None) => Err(Error::NotFound { what }),
					(hits, _) if hits > 1 => Err(Error::TooManyMatches { what, hits }),
					(_, Some(users)) => users
						.first()
						.and_then(|user| user.company_user_id)
						.ok_or_else(|| Error::missing_field("companyUserId", what)),
				}
			})
			.await
	}

	/// Resolves the e-mail address and fetches the full user record.
	pub async fn get_user_by_email(&self, email: &str) -> Result<CompanyUser> {
		let user_id = self.resolve_user_id_by_email(email).await?;

		self.get_user(user_id).await
	}

	/// Roles the user is assigned to or proposed for.
	pub async fn get_user_assignments(&self, user_id: u64) -> Result<UserAssignments> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("users/{user_id}/roles")))).await
	}

	/// Absence periods of the user.
	pub async fn get_user_absences(&self, user_id: u64) -> Result<Vec<AbsencePeriod>> {
		self.pipeline
			.execute_json(RequestSpec::get(self.path(format!("users/{user_id}/absences"))))
			.await
	}

	/// Uploaded images of the user, oldest first.
	pub async fn get_user_images(&self, user_id: u64) -> Result<Vec<CompanyImage>> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("users/{user_id}/images")))).await
	}
}
