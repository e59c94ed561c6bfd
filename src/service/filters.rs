//! Predicates used to select people and projects in aggregates.
//!
//! Every time-dependent predicate takes `now` explicitly. Dates are parsed with
//! [`parse_timestamp`]; an absent or unparsable date counts as unset.

// std
use std::borrow::Borrow;
// crates.io
use time::Duration as TimeDuration;
// self
use crate::{
	_prelude::*,
	model::{
		AbsencePeriod, CompanyUser, Project, ProjectAssignmentBase, ProjectStage, ProjectState,
		UserAssignments, parse_timestamp,
	},
};

/// Roles starting within this horizon already count as booked.
pub const BOOKING_HORIZON: TimeDuration = TimeDuration::weeks(2);
/// Employees leaving within this horizon are no longer counted as active.
pub const LEAVING_HORIZON: TimeDuration = TimeDuration::weeks(1);

fn at(raw: Option<&str>) -> Option<OffsetDateTime> {
	raw.and_then(parse_timestamp)
}

/// A span with no start has always been running; one with no end runs forever.
pub fn is_active_now(start: Option<&str>, end: Option<&str>, now: OffsetDateTime) -> bool {
	match at(start) {
		None => true,
		Some(start) => start < now && at(end).is_none_or(|end| end > now),
	}
}

/// Role is running now or starts in the future.
pub fn is_active_assignment(assignment: &ProjectAssignmentBase, now: OffsetDateTime) -> bool {
	is_active_now(assignment.start_date.as_deref(), assignment.end_date.as_deref(), now)
		|| at(assignment.start_date.as_deref()).is_some_and(|start| start > now)
}

/// Roles from `assignments` that are running now or start in the future, in input order.
pub fn active_assignments(
	assignments: &[ProjectAssignmentBase],
	now: OffsetDateTime,
) -> Vec<&ProjectAssignmentBase> {
	assignments.iter().filter(|assignment| is_active_assignment(assignment, now)).collect()
}

/// Absences from `absences` that are running now, in input order.
///
/// Uses the open-ended span rules of [`is_active_now`], unlike [`is_away`].
pub fn active_absences(absences: &[AbsencePeriod], now: OffsetDateTime) -> Vec<&AbsencePeriod> {
	absences
		.iter()
		.filter(|absence| {
			is_active_now(absence.start_date.as_deref(), absence.end_date.as_deref(), now)
		})
		.collect()
}

/// Employment has begun, or no start date is recorded.
pub fn employment_started(user: &CompanyUser, now: OffsetDateTime) -> bool {
	at(user.employment_start_date.as_deref()).is_none_or(|start| start < now)
}

/// Employment ends within [`LEAVING_HORIZON`] (or has already ended).
pub fn ending_employment_within_week(user: &CompanyUser, now: OffsetDateTime) -> bool {
	at(user.employment_end_date.as_deref()).is_some_and(|end| end < now + LEAVING_HORIZON)
}

/// Employed now and not about to leave.
pub fn is_active_person(user: &CompanyUser, now: OffsetDateTime) -> bool {
	employment_started(user, now) && !ending_employment_within_week(user, now)
}

/// The user record was last updated before `since`. A record with no update time passes.
pub fn not_updated_since(user: &CompanyUser, since: OffsetDateTime) -> bool {
	at(user.updated_date_time.as_deref()).is_none_or(|updated| updated < since)
}

/// Keeps users whose e-mail is not in `ignored`.
pub fn not_ignored<S>(user: &CompanyUser, ignored: &HashSet<S>) -> bool
where
	S: Borrow<str> + Eq + Hash,
{
	user.company_user_email.as_deref().is_none_or(|email| !ignored.contains(email))
}

/// Whether every team the user belongs to is one of `teams`.
///
/// A user in no team passes. Requires the full user shape: list endpoints omit team
/// memberships, which fails with [`Error::MissingRequiredField`].
pub fn only_in_teams<S>(user: &CompanyUser, teams: &HashSet<S>) -> Result<bool>
where
	S: Borrow<str> + Eq + Hash,
{
	let members = user.team_members.as_ref().ok_or_else(|| {
		Error::missing_field(
			"teamMembers",
			format!("User {}", user.company_user_id.map(|id| id.to_string()).unwrap_or_default()),
		)
	})?;

	Ok(members.iter().all(|member| {
		member.team.as_ref().and_then(|team| team.name.as_deref()).is_some_and(|name| teams.contains(name))
	}))
}

/// Has an assigned role that has not ended and starts within [`BOOKING_HORIZON`].
pub fn has_active_role(assignments: &UserAssignments, now: OffsetDateTime) -> bool {
	assignments.assigned.iter().flatten().any(|assignment| {
		at(assignment.start_date.as_deref()).is_none_or(|start| start < now + BOOKING_HORIZON)
			&& at(assignment.end_date.as_deref()).is_none_or(|end| end > now)
	})
}

/// Any absence period covers `now`.
pub fn is_away(absences: &[AbsencePeriod], now: OffsetDateTime) -> bool {
	absences.iter().any(|absence| {
		matches!(
			(at(absence.start_date.as_deref()), at(absence.end_date.as_deref())),
			(Some(start), Some(end)) if start < now && end > now
		)
	})
}

/// Project is in the open state.
pub fn is_in_open_state(project: &Project) -> bool {
	project.current_state == Some(ProjectState::Open)
}

/// Project has been won.
pub fn is_in_won_state(project: &Project) -> bool {
	project.current_state == Some(ProjectState::Won)
}

/// Project sits in the "Proposal Sent" pipeline stage.
pub fn is_in_proposal_sent_stage(project: &Project) -> bool {
	project.stage() == Some(ProjectStage::ProposalSent)
}

/// Won project with at least one role running now.
pub fn is_active_project(project: &Project, now: OffsetDateTime) -> bool {
	is_in_won_state(project)
		&& project.assignments.iter().flatten().any(|assignment| {
			is_active_now(assignment.start_date.as_deref(), assignment.end_date.as_deref(), now)
		})
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::{format_description::well_known::Rfc3339, macros::datetime};
	// self
	use super::*;
	use crate::model::{TeamBase, TeamMember};

	const NOW: OffsetDateTime = datetime!(2024-06-12 12:00 UTC);

	fn iso(offset: TimeDuration) -> Option<String> {
		(NOW + offset).format(&Rfc3339).ok()
	}

	fn user_in(teams: &[&str]) -> CompanyUser {
		CompanyUser {
			company_user_id: Some(1),
			team_members: Some(
				teams
					.iter()
					.map(|name| TeamMember {
						team: Some(TeamBase { name: Some((*name).into()), ..Default::default() }),
						..Default::default()
					})
					.collect(),
			),
			..Default::default()
		}
	}

	fn role(start: Option<String>, end: Option<String>) -> ProjectAssignmentBase {
		ProjectAssignmentBase { start_date: start, end_date: end, ..Default::default() }
	}

	#[test]
	fn employment_start_is_compared_to_the_instant() {
		let mut user = CompanyUser::default();

		assert!(employment_started(&user, NOW));

		user.employment_start_date = iso(TimeDuration::weeks(1));

		assert!(!employment_started(&user, NOW));

		user.employment_start_date = iso(-TimeDuration::weeks(1));

		assert!(employment_started(&user, NOW));

		user.employment_start_date = Some("2024-06-12T23:59:59".into());

		assert!(!employment_started(&user, NOW));
	}

	#[test]
	fn leaving_within_a_week_is_not_active() {
		let mut user = CompanyUser::default();

		assert!(!ending_employment_within_week(&user, NOW));

		user.employment_end_date = iso(TimeDuration::days(30));

		assert!(!ending_employment_within_week(&user, NOW));
		assert!(is_active_person(&user, NOW));

		user.employment_end_date = iso(TimeDuration::days(5));

		assert!(ending_employment_within_week(&user, NOW));
		assert!(!is_active_person(&user, NOW));
	}

	#[test]
	fn back_office_membership_must_be_exclusive() {
		let teams = ["Backoffice", "Admin"].into_iter().map(String::from).collect::<HashSet<_>>();
		let check = |names: &[&str]| only_in_teams(&user_in(names), &teams).expect("Teams are present.");

		assert!(check(&["Backoffice"]));
		assert!(check(&["Backoffice", "Admin"]));
		assert!(check(&["Admin"]));
		assert!(check(&[]));
		assert!(!check(&["Consultants / HKI"]));
		assert!(!check(&["Consultants / HKI", "Backoffice"]));
		assert!(matches!(
			only_in_teams(&CompanyUser::default(), &teams),
			Err(Error::MissingRequiredField { field: "teamMembers", .. })
		));
	}

	#[test]
	fn ignored_emails_are_dropped() {
		let ignored = HashSet::from(["john.doe@example.com"]);
		let mut user = CompanyUser::default();

		assert!(not_ignored(&user, &ignored));

		user.company_user_email = Some("john.doe@example.com".into());

		assert!(!not_ignored(&user, &ignored));

		user.company_user_email = Some("foo.bar@example.com".into());

		assert!(not_ignored(&user, &ignored));
	}

	#[test]
	fn roles_starting_soon_count_as_booked() {
		let booked = |start, end| UserAssignments {
			assigned: Some(vec![role(start, end)]),
			..Default::default()
		};

		assert!(has_active_role(&booked(None, iso(TimeDuration::weeks(1))), NOW));
		assert!(has_active_role(&booked(iso(-TimeDuration::weeks(1)), None), NOW));
		assert!(has_active_role(&booked(iso(TimeDuration::days(13)), None), NOW));
		assert!(!has_active_role(&booked(iso(TimeDuration::days(15)), None), NOW));
		assert!(!has_active_role(&booked(None, iso(-TimeDuration::days(1))), NOW));
		assert!(!has_active_role(&UserAssignments::default(), NOW));
	}

	#[test]
	fn absences_covering_now_mean_away() {
		let absence = |start, end| AbsencePeriod { start_date: start, end_date: end, ..Default::default() };

		assert!(is_away(&[absence(iso(-TimeDuration::days(1)), iso(TimeDuration::days(1)))], NOW));
		assert!(!is_away(&[absence(iso(TimeDuration::days(1)), iso(TimeDuration::days(2)))], NOW));
		assert!(!is_away(&[absence(None, iso(TimeDuration::days(2)))], NOW));
		assert!(!is_away(&[], NOW));
	}

	#[test]
	fn current_and_upcoming_roles_are_kept() {
		let active = role(iso(-TimeDuration::weeks(1)), iso(TimeDuration::days(30)));
		let upcoming = role(iso(TimeDuration::days(30)), iso(TimeDuration::days(360)));
		let ended = role(iso(-TimeDuration::days(60)), iso(-TimeDuration::weeks(1)));

		assert!(is_active_assignment(&active, NOW));
		assert!(is_active_assignment(&upcoming, NOW));
		assert!(!is_active_assignment(&ended, NOW));
		assert!(is_active_assignment(&role(None, None), NOW));
		assert!(is_active_assignment(&role(iso(-TimeDuration::weeks(1)), None), NOW));

		let roles = [ended.clone(), upcoming.clone(), ended, active.clone()];

		assert_eq!(active_assignments(&roles, NOW), [&upcoming, &active]);
		assert!(active_assignments(&[], NOW).is_empty());
	}

	#[test]
	fn running_absences_are_listed() {
		let absence = |start, end| AbsencePeriod { start_date: start, end_date: end, ..Default::default() };
		let ongoing = absence(iso(-TimeDuration::days(1)), iso(TimeDuration::days(1)));
		let open_ended = absence(iso(-TimeDuration::days(3)), None);
		let future = absence(iso(TimeDuration::days(1)), iso(TimeDuration::days(2)));
		let past = absence(iso(-TimeDuration::days(9)), iso(-TimeDuration::days(2)));
		let absences = [future, ongoing.clone(), past, open_ended.clone()];

		assert_eq!(active_absences(&absences, NOW), [&ongoing, &open_ended]);
		assert!(!is_away(&[open_ended], NOW));
	}

	#[test]
	fn stale_records_are_detected() {
		let mut user = CompanyUser::default();

		assert!(not_updated_since(&user, NOW));

		user.updated_date_time = iso(-TimeDuration::days(40));

		assert!(not_updated_since(&user, NOW - TimeDuration::days(30)));

		user.updated_date_time = iso(-TimeDuration::days(2));

		assert!(!not_updated_since(&user, NOW - TimeDuration::days(30)));
	}

	#[test]
	fn project_state_and_stage_predicates() {
		let project = |state, stage| Project {
			current_state: state,
			current_stage_id: stage,
			..Default::default()
		};

		assert!(is_in_open_state(&project(Some(ProjectState::Open), None)));
		assert!(!is_in_open_state(&project(Some(ProjectState::Lost), None)));
		assert!(!is_in_open_state(&project(None, None)));
		assert!(is_in_won_state(&project(Some(ProjectState::Won), None)));
		assert!(!is_in_won_state(&project(Some(ProjectState::Open), None)));
		assert!(is_in_proposal_sent_stage(&project(Some(ProjectState::Open), Some(4300))));
		assert!(!is_in_proposal_sent_stage(&project(Some(ProjectState::Open), Some(4082))));
		assert!(!is_in_proposal_sent_stage(&project(None, None)));
	}

	#[test]
	fn active_projects_are_won_with_a_running_role() {
		let project = |state, roles| Project {
			current_state: Some(state),
			assignments: Some(roles),
			..Default::default()
		};

		assert!(is_active_project(
			&project(ProjectState::Won, vec![role(iso(-TimeDuration::weeks(1)), iso(TimeDuration::days(30)))]),
			NOW
		));
		assert!(!is_active_project(
			&project(
				ProjectState::Won,
				vec![role(iso(-TimeDuration::days(60)), iso(-TimeDuration::weeks(1)))]
			),
			NOW
		));
		assert!(!is_active_project(&project(ProjectState::Open, vec![role(None, None)]), NOW));
	}
}
