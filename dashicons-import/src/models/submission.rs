//! Submission record as served by the backend record store
//!
//! Only the fields the import pipeline reads are modeled. Unknown fields are
//! ignored and missing optional fields fall back to their defaults, so the
//! record schema can grow without breaking imports.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Submission lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
    AddedToCollection,
    /// Any state this tool does not know about
    #[serde(other)]
    Unknown,
}

impl SubmissionStatus {
    /// Wire name used by the record store
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::AddedToCollection => "added_to_collection",
            SubmissionStatus::Unknown => "unknown",
        }
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        SubmissionStatus::Unknown
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light/dark naming hints declared by the submitter
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VariantHints {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub light: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub dark: Option<String>,
}

/// Presence of a hint object, with the generic case spelled out
///
/// A hint object that exists but names neither side is `Generic`; several
/// planning rules (a bare wordmark hint implying both wordmark variants)
/// depend on telling that apart from `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPresence {
    Absent,
    Generic,
    Specific { light: bool, dark: bool },
}

impl HintPresence {
    pub fn of(hints: Option<&VariantHints>) -> Self {
        match hints {
            None => HintPresence::Absent,
            Some(h) => match (h.light.is_some(), h.dark.is_some()) {
                (false, false) => HintPresence::Generic,
                (light, dark) => HintPresence::Specific { light, dark },
            },
        }
    }
}

/// Optional structured hints attached to a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Extras {
    #[serde(default, deserialize_with = "null_as_default")]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    /// Declared base format ("svg", "png", "webp")
    #[serde(default, deserialize_with = "non_empty_string")]
    pub base: Option<String>,
    #[serde(default)]
    pub colors: Option<VariantHints>,
    #[serde(default)]
    pub wordmark: Option<VariantHints>,
}

impl Extras {
    pub fn colors(&self) -> HintPresence {
        HintPresence::of(self.colors.as_ref())
    }

    pub fn wordmark(&self) -> HintPresence {
        HintPresence::of(self.wordmark.as_ref())
    }
}

/// User record expanded into the submission response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpandedUser {
    pub id: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub email: Option<String>,
}

/// Relations expanded via `?expand=created_by,approved_by`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmissionExpand {
    #[serde(default)]
    pub created_by: Option<ExpandedUser>,
    #[serde(default)]
    pub approved_by: Option<ExpandedUser>,
}

/// Icon submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    /// Icon identifier; metadata key and filename stem
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub extras: Option<Extras>,
    #[serde(default)]
    pub expand: Option<SubmissionExpand>,
}

impl Submission {
    /// Extras, or the empty set of hints when the submitter gave none
    pub fn extras(&self) -> Extras {
        self.extras.clone().unwrap_or_default()
    }

    pub fn creator(&self) -> Option<&ExpandedUser> {
        self.expand.as_ref().and_then(|e| e.created_by.as_ref())
    }

    pub fn approver(&self) -> Option<&ExpandedUser> {
        self.expand.as_ref().and_then(|e| e.approved_by.as_ref())
    }

    /// Display name of the approving admin for CI output
    ///
    /// Username, then email, then id, then the raw relation id.
    pub fn approver_label(&self) -> String {
        self.approver()
            .and_then(|u| {
                u.username
                    .clone()
                    .or_else(|| u.email.clone())
                    .or_else(|| (!u.id.is_empty()).then(|| u.id.clone()))
            })
            .or_else(|| self.approved_by.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// The record store sends `""` for unset text fields
fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
