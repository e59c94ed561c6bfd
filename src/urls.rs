//! Links into the Cinode web application and its static image host.
//!
//! Path slugs follow the web application's own scheme as observed in the wild; unusual titles
//! may still produce links the application redirects.

// self
use crate::{
	_prelude::*,
	model::{CompanyBase, CompanyImage, CompanyUser, ProjectAssignmentBase},
};

/// Web application origin.
pub const APP_ORIGIN: &str = "https://app.cinode.com";
/// Static image host.
pub const IMAGE_ORIGIN: &str = "https://p.cinodestatic.net";

/// Converts a title into a URL slug.
///
/// Latin diacritics are folded to ASCII (`ß` becomes `ss`), runs of whitespace become a single
/// `-`, and any other character outside `[A-Za-z0-9_.~-]` is dropped. Case is preserved.
pub fn slugify(title: &str) -> String {
	let mut folded = String::with_capacity(title.len());

	for c in title.chars() {
		match fold(c) {
			Some(ascii) => folded.push_str(ascii),
			None if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') => folded.push(c),
			None if c.is_whitespace() => folded.push(' '),
			None => {},
		}
	}

	folded.split_whitespace().collect::<Vec<_>>().join("-")
}

fn fold(c: char) -> Option<&'static str> {
	let ascii = match c {
		'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
		'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => "A",
		'æ' => "ae",
		'Æ' => "AE",
		'ç' | 'č' | 'ć' => "c",
		'Ç' | 'Č' | 'Ć' => "C",
		'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => "e",
		'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' => "E",
		'ì' | 'í' | 'î' | 'ï' => "i",
		'Ì' | 'Í' | 'Î' | 'Ï' => "I",
		'ñ' | 'ń' => "n",
		'Ñ' | 'Ń' => "N",
		'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
		'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' => "O",
		'œ' => "oe",
		'Œ' => "OE",
		'š' | 'ś' => "s",
		'Š' | 'Ś' => "S",
		'ß' => "ss",
		'ù' | 'ú' | 'û' | 'ü' | 'ū' => "u",
		'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' => "U",
		'ý' | 'ÿ' => "y",
		'Ý' => "Y",
		'ž' | 'ź' | 'ż' => "z",
		'Ž' | 'Ź' | 'Ż' => "Z",
		_ => return None,
	};

	Some(ascii)
}

/// Project page.
pub fn project_url(company: &CompanyBase, project_id: u64, title: &str) -> String {
	format!("{APP_ORIGIN}/{}/projects/{project_id}/{}", company.name, slugify(title))
}

/// Page of the project a role belongs to; `None` when the role names no project id.
pub fn project_url_from_assignment(
	company: &CompanyBase,
	assignment: &ProjectAssignmentBase,
) -> Option<String> {
	let project = assignment.project.as_ref();
	let project_id = project.and_then(|p| p.id).or(assignment.project_id)?;
	let title = project.and_then(|p| p.title.as_deref()).unwrap_or_default();

	Some(project_url(company, project_id, title))
}

/// Customer page.
pub fn customer_url(company: &CompanyBase, customer_id: u64, name: &str) -> String {
	format!("{APP_ORIGIN}/{}/customers/{customer_id}/{customer_id}-{}", company.name, slugify(name))
}

/// Role page within a project.
pub fn project_role_url(
	company: &CompanyBase,
	project_id: u64,
	project_title: &str,
	role_id: u64,
	role_title: &str,
) -> String {
	format!("{}/roles/{role_id}/{}", project_url(company, project_id, project_title), slugify(role_title))
}

/// Persons tab of a project.
pub fn project_persons_url(company: &CompanyBase, project_id: u64, title: &str) -> String {
	format!("{}/persons", project_url(company, project_id, title))
}

/// Roles tab of a project.
pub fn project_roles_tab_url(company: &CompanyBase, project_id: u64, title: &str) -> String {
	format!("{}/roles", project_url(company, project_id, title))
}

/// Employee page.
pub fn user_url(company: &CompanyBase, user_id: u64, seo_id: &str) -> String {
	format!("{APP_ORIGIN}/{}/organisation/employees/{user_id}/{seo_id}", company.name)
}

/// Employee profile page, where the desired assignment is edited.
pub fn user_profile_url(company: &CompanyBase, user_id: u64, seo_id: &str) -> String {
	format!("{}/profile", user_url(company, user_id, seo_id))
}

/// Where `user` edits the desired assignment; `None` without an id and SEO id.
pub fn desired_assignment_url(company: &CompanyBase, user: &CompanyUser) -> Option<String> {
	Some(user_profile_url(company, user.company_user_id?, user.seo_id.as_deref()?))
}

/// Profile page of the signed-in user.
pub fn personal_profile_url(company: &CompanyBase) -> String {
	format!("{APP_ORIGIN}/{}/profile", company.name)
}

/// 200x200 rendition of an uploaded image.
///
/// Returns `None` when the record lacks the company id, file name, or extension. File names
/// shorter than four characters are rejected as well since they cannot be sharded.
pub fn image_url(image: &CompanyImage) -> Option<String> {
	let company_id = image.company_id?;
	let file = image.image_file_name.as_deref()?;
	let extension = image.extension.as_deref()?;
	let (first, second) = (file.get(0..2)?, file.get(2..4)?);

	Some(format!("{IMAGE_ORIGIN}/_images/{company_id}/{first}/{second}/{file}_200_200.{extension}"))
}

/// Extracts the project id from a project page link.
///
/// Accepts `https://app.cinode.com/{company}/projects/{id}/{anything}`; the host and the
/// `projects` segment match case-insensitively.
pub fn parse_project_url(raw: &str) -> Option<u64> {
	let url = Url::parse(raw.trim()).ok()?;

	if url.scheme() != "https" || !url.host_str()?.eq_ignore_ascii_case("app.cinode.com") {
		return None;
	}

	let mut segments = url.path_segments()?;
	let company = segments.next()?;
	let kind = segments.next()?;
	let id = segments.next()?;

	// A trailing segment (the slug, possibly empty) is required.
	segments.next()?;

	let company_ok = !company.is_empty()
		&& company.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

	if !company_ok || !kind.eq_ignore_ascii_case("projects") {
		return None;
	}
	if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	id.parse().ok()
}

/// Whether `raw` links to a project page.
pub fn is_project_url(raw: &str) -> bool {
	parse_project_url(raw).is_some()
}
