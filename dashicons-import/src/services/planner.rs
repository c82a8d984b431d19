//! Target planning
//!
//! Turns classifier flags into the ordered list of files an import should
//! produce. Order matters: the assigner gives earlier targets first claim.

use crate::models::{Submission, VariantKey, VariantTarget};
use crate::services::classifier::VariantFlags;

/// Format used when neither the hints nor the assets name one
pub const DEFAULT_BASE_FORMAT: &str = "svg";

/// Resolve the base format for a submission
///
/// Declared `extras.base`, else the extension of the first uploaded asset,
/// else `svg`.
pub fn resolve_base_format(submission: &Submission) -> String {
    if let Some(base) = submission.extras.as_ref().and_then(|e| e.base.as_deref()) {
        return base.to_string();
    }

    submission
        .assets
        .first()
        .and_then(|first| extension_of(first))
        .unwrap_or(DEFAULT_BASE_FORMAT)
        .to_string()
}

/// Text after the last `.`, if any
fn extension_of(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Build the target list for an icon
///
/// Always starts with `base`. A wordmark detected without a light/dark
/// distinction yields both wordmark targets.
pub fn plan(icon_name: &str, flags: &VariantFlags, base_format: &str) -> Vec<VariantTarget> {
    let wanted = |key: &VariantKey| match key {
        VariantKey::Base => true,
        VariantKey::Light => flags.has_light,
        VariantKey::Dark => flags.has_dark,
        VariantKey::WordmarkLight => flags.has_wordmark_light || flags.has_wordmark,
        VariantKey::WordmarkDark => flags.has_wordmark_dark || flags.has_wordmark,
    };

    let targets: Vec<VariantTarget> = VariantKey::ALL
        .iter()
        .copied()
        .filter(|key| wanted(key))
        .map(|key| VariantTarget::new(icon_name, key, base_format))
        .collect();

    tracing::debug!(
        icon = %icon_name,
        targets = ?targets.iter().map(|t| t.key.as_str()).collect::<Vec<_>>(),
        "Planned variant targets"
    );

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Extras, SubmissionStatus};

    fn submission(assets: &[&str], base: Option<&str>) -> Submission {
        Submission {
            id: "sub1".to_string(),
            name: "acme".to_string(),
            assets: assets.iter().map(|s| s.to_string()).collect(),
            created_by: "user1".to_string(),
            approved_by: None,
            status: SubmissionStatus::Approved,
            extras: Some(Extras {
                base: base.map(|b| b.to_string()),
                ..Default::default()
            }),
            expand: None,
        }
    }

    fn keys(targets: &[VariantTarget]) -> Vec<VariantKey> {
        targets.iter().map(|t| t.key).collect()
    }

    #[test]
    fn test_base_format_resolution_order() {
        assert_eq!(resolve_base_format(&submission(&["a.png"], Some("webp"))), "webp");
        assert_eq!(resolve_base_format(&submission(&["a.png", "b.svg"], None)), "png");
        assert_eq!(resolve_base_format(&submission(&["README"], None)), "svg");
        assert_eq!(resolve_base_format(&submission(&[], None)), "svg");
    }

    #[test]
    fn test_base_only() {
        let targets = plan("acme", &VariantFlags::default(), "svg");
        assert_eq!(keys(&targets), vec![VariantKey::Base]);
        assert_eq!(targets[0].dest_filename, "acme.svg");
        assert!(targets[0].matchers.is_empty());
    }

    #[test]
    fn test_full_plan_order() {
        let flags = VariantFlags {
            has_light: true,
            has_dark: true,
            has_wordmark: true,
            has_wordmark_light: true,
            has_wordmark_dark: true,
        };

        let targets = plan("acme", &flags, "png");
        assert_eq!(keys(&targets), VariantKey::ALL.to_vec());
        assert_eq!(targets[4].dest_filename, "acme-wordmark-dark.png");
    }

    #[test]
    fn test_generic_wordmark_yields_both_wordmark_targets() {
        let flags = VariantFlags {
            has_dark: true,
            has_wordmark: true,
            ..Default::default()
        };

        let targets = plan("acme", &flags, "svg");
        assert_eq!(
            keys(&targets),
            vec![
                VariantKey::Base,
                VariantKey::Dark,
                VariantKey::WordmarkLight,
                VariantKey::WordmarkDark,
            ]
        );
        assert_eq!(targets[2].matchers, vec!["wordmark", "light"]);
        assert_eq!(targets[3].matchers, vec!["wordmark", "dark"]);
    }

    #[test]
    fn test_specific_wordmark_side_only() {
        let flags = VariantFlags {
            has_wordmark_light: true,
            ..Default::default()
        };

        let targets = plan("acme", &flags, "svg");
        assert_eq!(keys(&targets), vec![VariantKey::Base, VariantKey::WordmarkLight]);
    }
}
