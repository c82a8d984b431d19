//! Filename classification
//!
//! Infers which variants a submission plausibly carries from the uploaded
//! filenames plus the submitter's hints. Case-insensitive substring checks
//! only; extensions and content are never inspected.

use crate::models::{Extras, HintPresence};

const LIGHT: &str = "light";
const DARK: &str = "dark";
const WORDMARK: &str = "wordmark";

/// Variants detected for a submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VariantFlags {
    pub has_light: bool,
    pub has_dark: bool,
    pub has_wordmark: bool,
    pub has_wordmark_light: bool,
    pub has_wordmark_dark: bool,
}

impl VariantFlags {
    pub fn any_wordmark(&self) -> bool {
        self.has_wordmark || self.has_wordmark_light || self.has_wordmark_dark
    }
}

/// Classify a set of asset filenames
///
/// Order-independent: the result depends only on which names are present.
/// A name containing "wordmark" never counts as a plain light/dark variant.
pub fn classify<S: AsRef<str>>(asset_filenames: &[S], extras: &Extras) -> VariantFlags {
    let mut flags = from_filenames(asset_filenames);

    match extras.colors() {
        HintPresence::Specific { light, dark } => {
            flags.has_light |= light;
            flags.has_dark |= dark;
        }
        // A colors object naming neither side says nothing about either
        HintPresence::Generic | HintPresence::Absent => {}
    }

    match extras.wordmark() {
        HintPresence::Absent => {}
        HintPresence::Generic => flags.has_wordmark = true,
        HintPresence::Specific { light, dark } => {
            flags.has_wordmark = true;
            flags.has_wordmark_light |= light;
            flags.has_wordmark_dark |= dark;
        }
    }

    flags
}

fn from_filenames<S: AsRef<str>>(asset_filenames: &[S]) -> VariantFlags {
    let mut flags = VariantFlags::default();

    for name in asset_filenames {
        let lower = name.as_ref().to_lowercase();
        let is_wordmark = lower.contains(WORDMARK);
        let is_light = lower.contains(LIGHT);
        let is_dark = lower.contains(DARK);

        if is_wordmark {
            flags.has_wordmark = true;
            flags.has_wordmark_light |= is_light;
            flags.has_wordmark_dark |= is_dark;
        } else {
            flags.has_light |= is_light;
            flags.has_dark |= is_dark;
        }
    }

    flags
}
