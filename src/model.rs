//! Partial data transfer objects for the Cinode API.
//!
//! Each type models the fields this crate reads or writes; everything else the remote sends
//! is preserved in the flattened `extra` map so values can be round-tripped and inspected.

// Field names mirror the remote schema.
#![allow(missing_docs)]

// std
use std::cmp::Ordering;
// crates.io
use serde_json::Map;
use time::{
	Date, PrimitiveDateTime, format_description::well_known::Rfc3339, macros::format_description,
};
// self
use crate::_prelude::*;

/// Unmodelled fields carried alongside a DTO.
pub type Extra = Map<String, Value>;

/// Parses the timestamp shapes the API emits.
///
/// Accepts RFC 3339, offset-less `YYYY-MM-DDTHH:MM:SS[.fraction]` (interpreted as UTC), and
/// bare dates (UTC midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(at);
	}
	if let Ok(at) = PrimitiveDateTime::parse(
		raw,
		format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
	) {
		return Some(at.assume_utc());
	}

	Date::parse(raw, format_description!("[year]-[month]-[day]"))
		.ok()
		.map(|date| date.midnight().assume_utc())
}

/// Company reference used to scope every endpoint path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyBase {
	/// Company identifier.
	pub id: u64,
	/// Company name as it appears in web URLs.
	pub name: String,
}

/// Minimal user reference embedded in many responses.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyUserBase {
	pub company_user_id: Option<u64>,
	pub company_id: Option<u64>,
	pub seo_id: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Full user record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyUser {
	pub company_user_id: Option<u64>,
	pub company_id: Option<u64>,
	pub company_user_email: Option<String>,
	pub seo_id: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub desired_assignment: Option<String>,
	pub employment_start_date: Option<String>,
	pub employment_end_date: Option<String>,
	pub updated_date_time: Option<String>,
	/// Team memberships; absent on the scarce user shapes returned by list endpoints.
	pub team_members: Option<Vec<TeamMember>>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl CompanyUser {
	/// Returns the user id or fails with [`Error::MissingRequiredField`].
	pub fn require_id(&self) -> Result<u64> {
		self.company_user_id.ok_or_else(|| {
			Error::missing_field(
				"companyUserId",
				format!("User {}", self.seo_id.as_deref().unwrap_or("<unknown>")),
			)
		})
	}
}

/// Team reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamBase {
	pub id: Option<u64>,
	pub company_id: Option<u64>,
	pub name: Option<String>,
	pub description: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Membership of one user in one team.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMember {
	pub team_id: Option<u64>,
	pub company_user_id: Option<u64>,
	pub team: Option<TeamBase>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Uploaded profile image metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyImage {
	pub id: Option<u64>,
	pub company_id: Option<u64>,
	pub image_file_name: Option<String>,
	pub extension: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Customer record; list endpoints return a subset of the fields.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customer {
	pub id: Option<u64>,
	pub company_id: Option<u64>,
	pub name: Option<String>,
	pub description: Option<String>,
	pub seo_id: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Currency reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
	pub id: Option<u64>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Project reference returned by searches and embedded in assignments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectBase {
	pub id: Option<u64>,
	pub company_id: Option<u64>,
	pub customer_id: Option<u64>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub identifier: Option<String>,
	pub customer_identifier: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Full project record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
	pub id: Option<u64>,
	pub company_id: Option<u64>,
	pub customer_id: Option<u64>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub identifier: Option<String>,
	pub customer_identifier: Option<String>,
	pub customer: Option<Customer>,
	pub intermediator: Option<Customer>,
	pub estimated_close_date: Option<String>,
	pub estimated_value: Option<f64>,
	pub probability: Option<f64>,
	pub pipeline_id: Option<u64>,
	pub current_stage_id: Option<u64>,
	pub currency: Option<Currency>,
	pub current_state: Option<ProjectState>,
	pub team_id: Option<u64>,
	pub assignments: Option<Vec<ProjectAssignmentBase>>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl Project {
	/// Pipeline stage the project currently sits in.
	pub fn stage(&self) -> Option<ProjectStage> {
		self.current_stage_id.map(ProjectStage::from)
	}

	/// Human-readable lifecycle state, e.g. `Won`.
	pub fn state_label(&self) -> Option<String> {
		self.current_state.map(|state| state.to_string())
	}

	/// Human-readable pipeline stage, e.g. `Proposal Sent`.
	pub fn stage_label(&self) -> Option<String> {
		self.stage().map(|stage| stage.to_string())
	}

	/// Fields accepted by the project update endpoint, populated from this record.
	pub fn editable_fields(&self) -> Map<String, Value> {
		let fields = json!({
			"title": self.title,
			"customerId": self.customer_id,
			"description": self.description,
			"identifier": self.identifier,
			"customerIdentifier": self.customer_identifier,
			"intermediatorId": self.intermediator.as_ref().and_then(|c| c.id),
			"estimatedCloseDate": self.estimated_close_date,
			"estimatedValue": self.estimated_value,
			"probability": self.probability,
			"pipelineId": self.pipeline_id,
			"pipelineStageId": self.current_stage_id,
			"currencyId": self.currency.as_ref().and_then(|c| c.id),
			"projectState": self.current_state,
			"teamId": self.team_id,
		});

		match fields {
			Value::Object(fields) => fields,
			_ => Map::new(),
		}
	}
}

/// Lifecycle state of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum ProjectState {
	/// Still being sold.
	Open,
	/// Deal closed in our favour.
	Won,
	/// Deal lost to a competitor.
	Lost,
	/// Sales effort abandoned.
	Abandoned,
	/// Temporarily on hold.
	Suspended,
	/// State code this crate does not know.
	Other(u16),
}
impl From<u16> for ProjectState {
	fn from(code: u16) -> Self {
		match code {
			0 => Self::Open,
			30 => Self::Won,
			40 => Self::Lost,
			50 => Self::Abandoned,
			60 => Self::Suspended,
			other => Self::Other(other),
		}
	}
}
impl From<ProjectState> for u16 {
	fn from(state: ProjectState) -> Self {
		match state {
			ProjectState::Open => 0,
			ProjectState::Won => 30,
			ProjectState::Lost => 40,
			ProjectState::Abandoned => 50,
			ProjectState::Suspended => 60,
			ProjectState::Other(code) => code,
		}
	}
}
impl Display for ProjectState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Open => f.write_str("Open"),
			Self::Won => f.write_str("Won"),
			Self::Lost => f.write_str("Lost"),
			Self::Abandoned => f.write_str("Abandoned"),
			Self::Suspended => f.write_str("Suspended"),
			Self::Other(code) => write!(f, "{code}"),
		}
	}
}

/// Well-known stages of the sales pipeline.
///
/// Stage ids belong to a company's pipeline configuration; check the pipelines endpoint when
/// they stop matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectStage {
	/// Lead identified.
	Opportunity,
	/// Proposal being written.
	PrepareProposal,
	/// Proposal delivered to the customer.
	ProposalSent,
	/// Stage id this crate does not know.
	Other(u64),
}
impl From<u64> for ProjectStage {
	fn from(id: u64) -> Self {
		match id {
			4082 => Self::Opportunity,
			4083 => Self::PrepareProposal,
			4300 => Self::ProposalSent,
			other => Self::Other(other),
		}
	}
}
impl Display for ProjectStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Opportunity => f.write_str("Opportunity"),
			Self::PrepareProposal => f.write_str("Prepare Proposal"),
			Self::ProposalSent => f.write_str("Proposal Sent"),
			Self::Other(id) => write!(f, "{id}"),
		}
	}
}

/// Role on a project, as embedded in projects and user assignment lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAssignmentBase {
	pub id: Option<u64>,
	pub company_id: Option<u64>,
	pub customer_id: Option<u64>,
	pub project_id: Option<u64>,
	pub project: Option<ProjectBase>,
	pub customer: Option<Customer>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Full role record including staffing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAssignment {
	pub id: Option<u64>,
	pub project_id: Option<u64>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub assigned: Option<CompanyUserBase>,
	pub prospects: Option<Vec<CompanyUserBase>>,
	pub rate: Option<f64>,
	pub extent: Option<f64>,
	pub oral_agreement_to_date: Option<String>,
	pub option_to_date: Option<String>,
	pub contract_type: Option<Value>,
	pub extent_type: Option<Value>,
	pub currency: Option<Currency>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl ProjectAssignment {
	/// Fields accepted by the role update endpoint, populated from this record.
	pub fn editable_fields(&self, assignment_id: u64) -> Map<String, Value> {
		let fields = json!({
			"projectAssignmentId": assignment_id,
			"title": self.title,
			"description": self.description,
			"startDate": self.start_date,
			"endDate": self.end_date,
			"rate": self.rate,
			"extent": self.extent,
			"oralAgreementToDate": self.oral_agreement_to_date,
			"optionToDate": self.option_to_date,
			"contractType": self.contract_type,
			"extentType": self.extent_type,
			"currencyId": self.currency.as_ref().and_then(|c| c.id),
		});

		match fields {
			Value::Object(fields) => fields,
			_ => Map::new(),
		}
	}

	/// A role with neither an assignee nor prospects.
	pub fn is_open(&self) -> bool {
		self.assigned.is_none() && self.prospects.as_ref().is_none_or(Vec::is_empty)
	}
}

/// Result of the role update endpoint.
pub type ProjectAssignmentEdit = ProjectAssignment;

/// Roles of one user, split by staffing status.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserAssignments {
	pub assigned: Option<Vec<ProjectAssignmentBase>>,
	pub prospect: Option<Vec<ProjectAssignmentBase>>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Row returned by the role listing endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAssignmentWithStatus {
	pub pipeline_id: Option<u64>,
	pub project_pipeline_stage_title: Option<String>,
	pub customer_id: Option<u64>,
	pub project_id: Option<u64>,
	pub project_state: Option<ProjectState>,
	pub project_assignment_id: Option<u64>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Filters accepted by the role listing endpoint. Unset filters are omitted from the body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentQuery {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub pipelines: Option<Vec<u64>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub project_assignment_member_types: Option<Vec<i32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub project_assignment_statuses: Option<Vec<i32>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub teams: Option<Vec<u64>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub project_states: Option<Vec<ProjectState>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub project_assignment_allocation_statuses: Option<Vec<i32>>,
}

/// Absence period of one user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AbsencePeriod {
	pub id: Option<u64>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub absence_type: Option<Value>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Skill keyword and its synonyms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Keyword {
	pub id: Option<u64>,
	pub master_synonym_id: Option<u64>,
	pub master_synonym: Option<String>,
	pub synonyms: Option<Vec<String>>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl Keyword {
	/// Case-insensitive match against any synonym.
	pub fn matches(&self, name: &str) -> bool {
		self.synonyms
			.as_ref()
			.is_some_and(|synonyms| synonyms.iter().any(|s| s.to_lowercase() == name.to_lowercase()))
	}
}

/// Localized name of a keyword.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeywordSynonym {
	pub id: Option<u64>,
	pub keyword_id: Option<u64>,
	pub name: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileLanguage {
	pub id: Option<u64>,
	/// Two-letter language code, e.g. `en`.
	pub lang: Option<String>,
	#[serde(flatten)]
	pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LanguageBranch {
	pub id: Option<u64>,
	pub language: Option<ProfileLanguage>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Language version of a profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileTranslation {
	pub profile_translation_id: Option<u64>,
	pub language_branch: Option<LanguageBranch>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Translation of a profile skill to a keyword synonym.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileSkillTranslation {
	pub keyword_id: Option<u64>,
	pub keyword_synonym_id: Option<u64>,
	pub keyword_synonym: Option<KeywordSynonym>,
	pub keyword: Option<Keyword>,
	pub profile_translation: Option<ProfileTranslation>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl ProfileSkillTranslation {
	/// Language code of the profile version this translation belongs to.
	pub fn lang(&self) -> Option<&str> {
		self.profile_translation
			.as_ref()
			.and_then(|t| t.language_branch.as_ref())
			.and_then(|b| b.language.as_ref())
			.and_then(|l| l.lang.as_deref())
	}
}

/// One recorded change of a profile skill.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillChange {
	pub id: Option<u64>,
	pub change_date_time: Option<String>,
	pub level: Option<u32>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Skill entry on a user profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileSkill {
	pub id: Option<u64>,
	pub company_user_id: Option<u64>,
	pub level: Option<u32>,
	pub favourite: Option<bool>,
	pub keyword: Option<Keyword>,
	pub translations: Option<Vec<ProfileSkillTranslation>>,
	pub change_history: Option<Vec<SkillChange>>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl ProfileSkill {
	/// Lowest level at which a skill is shown without being a favourite.
	pub const HIGHLIGHT_LEVEL: u32 = 4;

	/// Display name: the English synonym when the profile has one, else the master synonym.
	pub fn resolved_name(&self) -> Option<&str> {
		self.translations
			.iter()
			.flatten()
			.find(|t| t.lang() == Some("en"))
			.and_then(|t| t.keyword_synonym.as_ref())
			.and_then(|synonym| synonym.name.as_deref())
			.or_else(|| self.keyword.as_ref().and_then(|k| k.master_synonym.as_deref()))
	}

	/// Most recent change time; entries with unparsable dates are skipped.
	pub fn latest_change_date(&self) -> Option<OffsetDateTime> {
		self.change_history
			.iter()
			.flatten()
			.filter_map(|change| change.change_date_time.as_deref().and_then(parse_timestamp))
			.max()
	}

	/// Favourite, or at least [`Self::HIGHLIGHT_LEVEL`].
	pub fn is_highlighted(&self) -> bool {
		self.favourite == Some(true) || self.level.is_some_and(|level| level >= Self::HIGHLIGHT_LEVEL)
	}

	/// Whether the skill's keyword is known under `name`.
	pub fn matches(&self, name: &str) -> bool {
		self.keyword.as_ref().is_some_and(|k| k.matches(name))
	}

	/// Synonym id of the translation known under `name`.
	pub fn synonym_id_for(&self, name: &str) -> Result<u64> {
		self.translations
			.iter()
			.flatten()
			.find(|t| t.keyword.as_ref().is_some_and(|k| k.matches(name)))
			.and_then(|t| t.keyword_synonym_id)
			.ok_or_else(|| Error::missing_field("keywordSynonymId", format!("Skill translation `{name}`")))
	}
}

/// Skill entry as listed per user.
pub type UserSkill = ProfileSkill;

/// Full user profile (resume data).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
	pub id: Option<u64>,
	pub company_user_id: Option<u64>,
	pub skills: Option<Vec<ProfileSkill>>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl Profile {
	/// Finds the skill known under `name`.
	pub fn skill(&self, name: &str) -> Option<&ProfileSkill> {
		self.skills.iter().flatten().find(|s| s.matches(name))
	}

	/// Highlighted skills, favourites first, then by level and most recent change.
	///
	/// Skills with a recorded change come before those without one.
	pub fn ordered_skills(&self) -> Vec<&ProfileSkill> {
		let mut skills =
			self.skills.iter().flatten().filter(|s| s.is_highlighted()).collect::<Vec<_>>();

		skills.sort_by(|a, b| {
			let favourite = |s: &ProfileSkill| s.favourite == Some(true);

			favourite(b)
				.cmp(&favourite(a))
				.then_with(|| b.level.cmp(&a.level))
				.then_with(|| match (a.latest_change_date(), b.latest_change_date()) {
					(Some(a), Some(b)) => b.cmp(&a),
					(Some(_), None) => Ordering::Less,
					(None, Some(_)) => Ordering::Greater,
					(None, None) => Ordering::Equal,
				})
		});

		skills
	}
}

/// One keyword constraint in a skill search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSkill {
	pub keyword_id: Option<u64>,
	pub min: Option<u32>,
	pub max: Option<u32>,
}

/// Query echoed back by a skill search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillQuery {
	pub skills: Option<Vec<SearchSkill>>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Result of a skill search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSkillResult {
	pub query: Option<SkillQuery>,
	pub hits: Option<Vec<CompanyUserBase>>,
	#[serde(flatten)]
	pub extra: Extra,
}
impl SearchSkillResult {
	/// Keyword ids the remote resolved the search terms to.
	pub fn keyword_ids(&self) -> impl Iterator<Item = u64> + '_ {
		self.query.iter().flat_map(|q| q.skills.iter().flatten()).filter_map(|s| s.keyword_id)
	}
}

/// Skill requirement on a project role.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectAssignmentSkill {
	pub id: Option<u64>,
	pub level: Option<u32>,
	pub is_mandatory: Option<bool>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Sales pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPipeline {
	pub id: Option<u64>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub stages: Option<Vec<PipelineStage>>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// One stage of a sales pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStage {
	pub id: Option<u64>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub order: Option<i64>,
	pub probability: Option<f64>,
	#[serde(flatten)]
	pub extra: Extra,
}

/// Project member enriched with a profile image URL.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMate {
	#[serde(flatten)]
	pub member: CompanyUserBase,
	pub image_url: Option<String>,
}

/// Staffing of one project.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTeam {
	pub assigned: Vec<TeamMate>,
	pub prospects: Vec<TeamMate>,
	/// Roles with neither an assignee nor prospects.
	pub open_roles: usize,
}

/// Project reference together with its staffing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectWithTeam {
	#[serde(flatten)]
	pub project: ProjectBase,
	#[serde(flatten)]
	pub team: ProjectTeam,
}

/// User enriched with data fetched through separate calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
	#[serde(flatten)]
	pub user: CompanyUser,
	pub absences: Vec<AbsencePeriod>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub assignments: Option<UserAssignments>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub profile: Option<Profile>,
}
