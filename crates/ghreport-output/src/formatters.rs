use std::fmt::Display;

use ghreport_types::{RepositoryIndex, Report, UserProfile, MISSING_VALUE};

pub const NAME_LABEL: &str = "Name";
pub const PROFILE_LABEL: &str = "Profile";
pub const PUBLIC_REPOS_LABEL: &str = "Public repositories";
pub const FOLLOWERS_LABEL: &str = "Followers";
pub const FOLLOWING_LABEL: &str = "Following";

/// Line that opens the repository section of a report.
pub const REPOSITORIES_MARKER: &str = "Repositories:";

/// Escapes control characters so a remote value always stays on one line.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.extend(c.escape_default()),
            c => out.push(c),
        }
    }
    out
}

fn value_or_missing<T: Display>(value: Option<&T>) -> String {
    value.map_or_else(|| MISSING_VALUE.to_string(), |v| escape_value(&v.to_string()))
}

pub fn format_profile(profile: &UserProfile) -> String {
    [
        (NAME_LABEL, value_or_missing(profile.name.as_ref())),
        (PROFILE_LABEL, value_or_missing(profile.html_url.as_ref())),
        (PUBLIC_REPOS_LABEL, value_or_missing(profile.public_repos.as_ref())),
        (FOLLOWERS_LABEL, value_or_missing(profile.followers.as_ref())),
        (FOLLOWING_LABEL, value_or_missing(profile.following.as_ref())),
    ]
    .iter()
    .map(|(label, value)| format!("{}: {}", label, value))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn format_repositories(repositories: &RepositoryIndex) -> String {
    repositories
        .iter()
        .map(|(name, url)| format!("\t{}: {}", escape_value(name), escape_value(url)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full report text: the profile header, the repository marker, then one
/// tab-indented `name: url` line per repository. Always ends with a newline.
pub fn render_report(report: &Report) -> String {
    let mut out = format_profile(&report.profile);
    out.push('\n');
    out.push_str(REPOSITORIES_MARKER);
    out.push('\n');
    if !report.repositories.is_empty() {
        out.push_str(&format_repositories(&report.repositories));
        out.push('\n');
    }
    out
}
