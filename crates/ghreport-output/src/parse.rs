use thiserror::Error;

use crate::formatters::REPOSITORIES_MARKER;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReportParseError {
    #[error("report has no '{}' line", REPOSITORIES_MARKER)]
    MissingMarker,
    #[error("line {line}: expected 'label: value', got {text:?}")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: expected tab-indented 'name: url', got {text:?}")]
    MalformedEntry { line: usize, text: String },
}

/// A report split into its header fields and repository entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReport {
    pub header: Vec<(String, String)>,
    pub repositories: Vec<(String, String)>,
}

impl ParsedReport {
    pub fn header_value(&self, label: &str) -> Option<&str> {
        self.header
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses text produced by [`render_report`](crate::render_report).
///
/// The repository section is found by its marker line, so the header may
/// gain or lose fields without breaking readers.
pub fn parse_report(text: &str) -> Result<ParsedReport, ReportParseError> {
    let mut parsed = ParsedReport::default();
    let mut in_repositories = false;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.is_empty() {
            continue;
        }

        if !in_repositories {
            if line == REPOSITORIES_MARKER {
                in_repositories = true;
                continue;
            }
            let (label, value) =
                line.split_once(": ")
                    .ok_or_else(|| ReportParseError::MalformedHeader {
                        line: line_no,
                        text: line.to_string(),
                    })?;
            parsed.header.push((label.to_string(), value.to_string()));
        } else {
            let (name, url) = line
                .strip_prefix('\t')
                .and_then(|entry| entry.split_once(": "))
                .ok_or_else(|| ReportParseError::MalformedEntry {
                    line: line_no,
                    text: line.to_string(),
                })?;
            parsed.repositories.push((name.to_string(), url.to_string()));
        }
    }

    if !in_repositories {
        return Err(ReportParseError::MissingMarker);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_report, FOLLOWERS_LABEL, NAME_LABEL, PROFILE_LABEL};
    use ghreport_types::{repository_owner, RepositoryIndex, Report, UserProfile};

    fn sample_report() -> Report {
        let profile = UserProfile {
            login: Some("octocat".to_string()),
            name: Some("The Octocat".to_string()),
            html_url: Some("https://github.com/octocat".to_string()),
            public_repos: Some(2),
            followers: Some(20),
            following: Some(9),
        };
        let repositories: RepositoryIndex = [
            ("Hello-World", "https://github.com/octocat/Hello-World"),
            ("Spoon-Knife", "https://github.com/octocat/Spoon-Knife"),
        ]
        .into_iter()
        .collect();
        Report::new(profile, repositories)
    }

    #[test]
    fn test_parse_rendered_report() {
        let parsed = parse_report(&render_report(&sample_report())).unwrap();

        assert_eq!(parsed.header.len(), 5);
        assert_eq!(parsed.header_value(NAME_LABEL), Some("The Octocat"));
        assert_eq!(
            parsed.header_value(PROFILE_LABEL),
            Some("https://github.com/octocat")
        );
        assert_eq!(parsed.header_value(FOLLOWERS_LABEL), Some("20"));

        let (first_name, first_url) = &parsed.repositories[0];
        assert_eq!(first_name, "Hello-World");
        assert_eq!(repository_owner(first_url), Some("octocat"));
    }

    #[test]
    fn test_name_cannot_forge_repository_section() {
        let mut report = sample_report();
        report.profile.name =
            Some("Oct\nRepositories:\n\tfake: https://github.com/evil/fake".to_string());
        report.repositories = RepositoryIndex::new();

        let parsed = parse_report(&render_report(&report)).unwrap();
        assert_eq!(parsed.header.len(), 5);
        assert!(parsed.repositories.is_empty());
        assert_eq!(
            parsed.header_value(NAME_LABEL),
            Some("Oct\\nRepositories:\\n\\tfake: https://github.com/evil/fake")
        );
    }

    #[test]
    fn test_marker_found_regardless_of_header_length() {
        let text = "Name: x\nBio: added later\nExtra: y\nRepositories:\n\trepo: https://github.com/x/repo\n";
        let parsed = parse_report(text).unwrap();
        assert_eq!(parsed.header.len(), 3);
        assert_eq!(
            parsed.repositories,
            vec![("repo".to_string(), "https://github.com/x/repo".to_string())]
        );
    }

    #[test]
    fn test_empty_repository_section() {
        let parsed = parse_report("Name: x\nRepositories:\n").unwrap();
        assert!(parsed.repositories.is_empty());
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(
            parse_report("Name: x\nProfile: y\n"),
            Err(ReportParseError::MissingMarker)
        );
    }

    #[test]
    fn test_unindented_entry_is_rejected() {
        let err = parse_report("Name: x\nRepositories:\nrepo: https://github.com/x/repo\n")
            .unwrap_err();
        assert_eq!(
            err,
            ReportParseError::MalformedEntry {
                line: 3,
                text: "repo: https://github.com/x/repo".to_string(),
            }
        );
    }
}
