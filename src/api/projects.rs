//! Project, role, pipeline, and team endpoints.

// crates.io
use futures::future;
use serde_json::Map;
// self
use crate::{
	_prelude::*,
	api::{self, Api},
	model::{
		AssignmentQuery, Project, ProjectAssignment, ProjectAssignmentEdit,
		ProjectAssignmentWithStatus, ProjectBase, ProjectPipeline, TeamBase,
	},
	pipeline::RequestSpec,
};

impl Api {
	/// Materializes every page of the project search for `query` (a JSON object).
	pub async fn list_all_projects(&self, query: Value) -> Result<Vec<ProjectBase>> {
		self.paginated().fetch_all(&self.path("projects/search"), query).await
	}

	/// Fetches the full project record.
	pub async fn get_project(&self, project_id: u64) -> Result<Project> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("projects/{project_id}")))).await
	}

	/// Reads the project, overlays `changes` on its editable fields, and writes it back.
	pub async fn update_project(
		&self,
		project_id: u64,
		changes: Map<String, Value>,
	) -> Result<Project> {
		let mut fields = self.get_project(project_id).await?.editable_fields();

		fields.extend(changes);

		self.pipeline
			.execute_json(
				RequestSpec::put(self.path(format!("projects/{project_id}"))).json(Value::Object(fields)),
			)
			.await
	}

	/// Lists roles matching `query`.
	///
	/// The endpoint is a `POST` and is not declared retry-safe.
	pub async fn list_assignments(
		&self,
		query: &AssignmentQuery,
	) -> Result<Vec<ProjectAssignmentWithStatus>> {
		let spec = RequestSpec::post(self.path("roles")).json(api::to_body(query)?);

		self.pipeline.execute_json(spec).await
	}

	/// Fetches every role of the project; roles without an id are skipped.
	pub async fn get_project_assignments(&self, project_id: u64) -> Result<Vec<ProjectAssignment>> {
		let project = self.get_project(project_id).await?;
		let requests = project
			.assignments
			.unwrap_or_default()
			.into_iter()
			.filter_map(|assignment| assignment.id)
			.map(|assignment_id| self.get_project_assignment(project_id, assignment_id));

		future::try_join_all(requests).await
	}

	/// Fetches one role of the project.
	pub async fn get_project_assignment(
		&self,
		project_id: u64,
		assignment_id: u64,
	) -> Result<ProjectAssignment> {
		self.pipeline
			.execute_json(RequestSpec::get(
				self.path(format!("projects/{project_id}/roles/{assignment_id}")),
			))
			.await
	}

	/// Reads the role, overlays `changes` on its editable fields, and writes it back.
	pub async fn update_project_assignment(
		&self,
		project_id: u64,
		assignment_id: u64,
		changes: Map<String, Value>,
	) -> Result<ProjectAssignmentEdit> {
		let mut fields =
			self.get_project_assignment(project_id, assignment_id).await?.editable_fields(assignment_id);

		fields.extend(changes);

		self.pipeline
			.execute_json(
				RequestSpec::put(self.path(format!("projects/{project_id}/roles/{assignment_id}")))
					.json(Value::Object(fields)),
			)
			.await
	}

	/// Sales pipelines of the company, memoized for a minute.
	pub async fn get_project_pipelines(&self) -> Result<Vec<ProjectPipeline>> {
		self.pipelines
			.get_or_try_insert_with((), || async {
				self.pipeline.execute_json(RequestSpec::get(self.path("projects/pipelines"))).await
			})
			.await
	}

	/// Fetches one team.
	pub async fn get_team(&self, team_id: u64) -> Result<TeamBase> {
		self.pipeline.execute_json(RequestSpec::get(self.path(format!("teams/{team_id}")))).await
	}
}
