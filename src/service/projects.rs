//! Project, customer, and staffing aggregates.

// crates.io
use futures::future;
use serde_json::Map;
// self
use crate::{
	_prelude::*,
	model::{
		CompanyUserBase, Customer, Project, ProjectAssignment, ProjectBase, ProjectState,
		ProjectTeam, ProjectWithTeam, TeamMate,
	},
	service::{Service, filters},
};

impl Service {
	/// Full records of every project matching the search `query`.
	pub async fn get_all_projects(&self, query: Value) -> Result<Vec<Project>> {
		let projects = self.api.list_all_projects(query).await?;

		future::try_join_all(
			projects.into_iter().filter_map(|p| p.id).map(|id| self.api.get_project(id)),
		)
		.await
	}

	/// Won projects with at least one role running now.
	pub async fn get_active_projects(&self) -> Result<Vec<Project>> {
		let now = OffsetDateTime::now_utc();

		Ok(self
			.get_all_projects(json!({}))
			.await?
			.into_iter()
			.filter(|project| filters::is_active_project(project, now))
			.collect())
	}

	/// Customers of the active projects, each fetched once.
	pub async fn get_active_customers(&self) -> Result<Vec<Customer>> {
		let active = self.get_active_projects().await?;
		let mut seen = HashSet::new();
		let ids = active
			.iter()
			.filter_map(|project| project.customer.as_ref().and_then(|c| c.id))
			.filter(|id| seen.insert(*id))
			.collect::<Vec<_>>();

		future::try_join_all(ids.into_iter().map(|id| self.api.get_customer(id))).await
	}

	/// Full records of every customer.
	pub async fn get_all_customers(&self) -> Result<Vec<Customer>> {
		let customers = self.api.list_all_customers().await?;

		future::try_join_all(
			customers.into_iter().filter_map(|c| c.id).map(|id| self.api.get_customer(id)),
		)
		.await
	}

	/// Projects the user is assigned to, followed by those they are proposed for.
	pub async fn get_user_projects(&self, user_id: u64) -> Result<Vec<ProjectBase>> {
		let assignments = self.api.get_user_assignments(user_id).await?;

		Ok(assignments
			.assigned
			.into_iter()
			.flatten()
			.chain(assignments.prospect.into_iter().flatten())
			.filter_map(|assignment| assignment.project)
			.collect())
	}

	/// Members and prospects of every role of the project, with image URLs.
	pub async fn get_project_team_mates(&self, project_id: u64) -> Result<ProjectTeam> {
		let assignments = self.api.get_project_assignments(project_id).await?;
		let open_roles = assignments.iter().filter(|a| a.is_open()).count();
		let (assigned, prospects): (Vec<_>, Vec<_>) = assignments
			.into_iter()
			.map(|ProjectAssignment { assigned, prospects, .. }| (assigned, prospects.unwrap_or_default()))
			.unzip();
		let assigned = future::try_join_all(
			assigned.into_iter().flatten().map(|member| self.with_image_url(member)),
		);
		let prospects = future::try_join_all(
			prospects.into_iter().flatten().map(|member| self.with_image_url(member)),
		);
		let (assigned, prospects) = future::try_join(assigned, prospects).await?;

		Ok(ProjectTeam { assigned, prospects, open_roles })
	}

	/// The user's projects, each with its staffing; memoized for a few seconds.
	pub async fn get_projects_with_team_mates(&self, user_id: u64) -> Result<Vec<ProjectWithTeam>> {
		self.team_mates
			.get_or_try_insert_with(user_id, || async move {
				let projects = self.get_user_projects(user_id).await?;

				future::try_join_all(projects.into_iter().map(|project| async move {
					let project_id = project.id.ok_or_else(|| {
						Error::missing_field(
							"id",
							format!("Project `{}`", project.title.as_deref().unwrap_or_default()),
						)
					})?;
					let team = self.get_project_team_mates(project_id).await?;

					Ok::<_, Error>(ProjectWithTeam { project, team })
				}))
				.await
			})
			.await
	}

	/// Moves a role's dates; `None` keeps the current value.
	pub async fn set_project_assignment_dates(
		&self,
		project_id: u64,
		assignment_id: u64,
		start_date: Option<&str>,
		end_date: Option<&str>,
	) -> Result<ProjectAssignment> {
		let mut changes = Map::new();

		if let Some(start) = start_date {
			changes.insert("startDate".into(), json!(start));
		}
		if let Some(end) = end_date {
			changes.insert("endDate".into(), json!(end));
		}

		self.api.update_project_assignment(project_id, assignment_id, changes).await
	}

	/// Moves the project to `state`, keeping every other editable field.
	pub async fn update_project_state(&self, project_id: u64, state: ProjectState) -> Result<Project> {
		let mut changes = Map::new();

		changes.insert("projectState".into(), json!(state));

		self.api.update_project(project_id, changes).await
	}

	async fn with_image_url(&self, member: CompanyUserBase) -> Result<TeamMate> {
		let image_url = match member.company_user_id {
			Some(user_id) => self.get_user_image_url(user_id).await?,
			None => None,
		};

		Ok(TeamMate { member, image_url })
	}
}
