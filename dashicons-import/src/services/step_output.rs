//! GitHub Actions step output
//!
//! Appends `key=value` lines to the file named by `GITHUB_OUTPUT` (or an
//! explicit path) so later workflow steps can reference the imported icon.

use crate::error::ImportResult;
use crate::models::Submission;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Environment variable GitHub Actions sets for step outputs
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Lines written for an imported submission
pub fn step_output_lines(submission: &Submission) -> Vec<String> {
    vec![
        format!("submission_name={}", submission.name),
        format!("approver={}", submission.approver_label()),
    ]
}

/// Append the submission's output lines to `path`
pub fn write_step_output(path: &Path, submission: &Submission) -> ImportResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for line in step_output_lines(submission) {
        writeln!(file, "{}", line)?;
    }
    tracing::debug!(path = %path.display(), "Wrote step output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpandedUser, SubmissionExpand, SubmissionStatus};
    use tempfile::TempDir;

    fn submission(approver: Option<ExpandedUser>) -> Submission {
        Submission {
            id: "sub1".to_string(),
            name: "acme".to_string(),
            assets: vec![],
            created_by: "user1".to_string(),
            approved_by: None,
            status: SubmissionStatus::Approved,
            extras: None,
            expand: Some(SubmissionExpand {
                created_by: None,
                approved_by: approver,
            }),
        }
    }

    #[test]
    fn test_approver_prefers_username() {
        let lines = step_output_lines(&submission(Some(ExpandedUser {
            id: "admin1".to_string(),
            username: Some("root".to_string()),
            email: Some("root@example.com".to_string()),
        })));
        assert_eq!(lines, vec!["submission_name=acme", "approver=root"]);
    }

    #[test]
    fn test_approver_id_when_no_names() {
        let lines = step_output_lines(&submission(Some(ExpandedUser {
            id: "admin1".to_string(),
            username: None,
            email: None,
        })));
        assert_eq!(lines[1], "approver=admin1");
    }

    #[test]
    fn test_unknown_approver() {
        let lines = step_output_lines(&submission(None));
        assert_eq!(lines[1], "approver=unknown");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("github_output");
        std::fs::write(&path, "previous=1\n").unwrap();

        write_step_output(&path, &submission(None)).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "previous=1\nsubmission_name=acme\napprover=unknown\n"
        );
    }
}
