//! Canonical case URLs per role.
//!
//! Builders never fail: a malformed case id yields the bare section path and an
//! unsupported (role, section) pair yields the role's detail page. Both cases
//! log a warning so upstream bugs stay visible.

use crate::error::PortalError;
use crate::models::Role;

pub const CASE_ID_PARAM: &str = "caseId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Detail,
    Evidence,
    Assets,
    Documents,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Detail => "detail",
            Section::Evidence => "evidence",
            Section::Assets => "assets",
            Section::Documents => "documents",
        }
    }
}

fn lookup(role: Role, section: Section) -> Option<&'static str> {
    match (role, section) {
        (Role::Lawyer, Section::Detail) => Some("/lawyer/case-details"),
        (Role::Lawyer, Section::Evidence) => Some("/lawyer/evidence"),
        (Role::Lawyer, Section::Assets) => Some("/lawyer/assets"),
        (Role::Lawyer, Section::Documents) => Some("/lawyer/documents"),
        (Role::Client, Section::Detail) => Some("/client/case-details"),
        (Role::Client, Section::Documents) => Some("/client/documents"),
        (Role::Detective, Section::Detail) => Some("/detective/case-details"),
        (Role::Detective, Section::Evidence) => Some("/detective/evidence"),
        (Role::Detective, Section::Assets) => Some("/detective/assets"),
        (Role::Admin, Section::Detail) => Some("/admin/cases"),
        _ => None,
    }
}

/// Base path for a (role, section) pair, falling back to the role's detail page.
pub fn base_path(role: Role, section: Section) -> &'static str {
    if let Some(path) = lookup(role, section) {
        return path;
    }

    tracing::warn!(
        role = %role,
        section = section.as_str(),
        "No route for section, falling back to case detail"
    );
    lookup(role, Section::Detail).unwrap_or("/")
}

/// Reject ids that are empty or the stringified `undefined`/`null` sentinels.
pub fn parse_resource_id(raw: &str) -> Result<&str, PortalError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
        return Err(PortalError::InvalidResourceId(raw.to_string()));
    }
    Ok(trimmed)
}

/// `<basePath>?caseId=<id>&<extra>`, or `<basePath>` alone when the id is unusable.
pub fn case_path(
    role: Role,
    section: Section,
    case_id: Option<&str>,
    extra: &[(&str, &str)],
) -> String {
    let base = base_path(role, section);

    let id = match case_id.map(parse_resource_id) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            tracing::warn!(role = %role, error = %e, "Building case path without id");
            return base.to_string();
        }
        None => {
            tracing::warn!(role = %role, "Building case path without id: none supplied");
            return base.to_string();
        }
    };

    let mut params = Vec::with_capacity(extra.len() + 1);
    params.push((CASE_ID_PARAM, id));
    params.extend(extra.iter().copied());

    match serde_urlencoded::to_string(&params) {
        Ok(query) => format!("{}?{}", base, query),
        Err(e) => {
            tracing::warn!(role = %role, error = %e, "Failed to encode case path query");
            base.to_string()
        }
    }
}

pub fn case_detail_path(role: Role, case_id: &str) -> String {
    case_path(role, Section::Detail, Some(case_id), &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_path_carries_case_id() {
        assert_eq!(
            case_detail_path(Role::Lawyer, "C-104"),
            "/lawyer/case-details?caseId=C-104"
        );
        assert_eq!(
            case_detail_path(Role::Admin, "7"),
            "/admin/cases?caseId=7"
        );
    }

    #[test]
    fn sentinel_ids_degrade_to_bare_path() {
        assert_eq!(case_detail_path(Role::Lawyer, "undefined"), "/lawyer/case-details");
        assert_eq!(case_detail_path(Role::Client, "null"), "/client/case-details");
        assert_eq!(case_detail_path(Role::Detective, "  "), "/detective/case-details");
        assert_eq!(
            case_path(Role::Lawyer, Section::Evidence, None, &[("tab", "photos")]),
            "/lawyer/evidence"
        );
    }

    #[test]
    fn extra_params_follow_case_id_and_are_encoded() {
        assert_eq!(
            case_path(
                Role::Detective,
                Section::Evidence,
                Some("42"),
                &[("tab", "chain of custody"), ("modal", "edit:9")]
            ),
            "/detective/evidence?caseId=42&tab=chain+of+custody&modal=edit%3A9"
        );
    }

    #[test]
    fn unsupported_section_falls_back_to_detail() {
        assert_eq!(
            case_path(Role::Client, Section::Evidence, Some("5"), &[]),
            "/client/case-details?caseId=5"
        );
        assert_eq!(base_path(Role::Admin, Section::Assets), "/admin/cases");
    }

    #[test]
    fn parse_resource_id_reports_sentinels() {
        assert_eq!(parse_resource_id(" 12 "), Ok("12"));
        assert_eq!(
            parse_resource_id("undefined"),
            Err(PortalError::InvalidResourceId("undefined".to_string()))
        );
    }
}
