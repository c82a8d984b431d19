//! Greedy asset-to-target assignment
//!
//! A single pass over targets in planner order, sharing one pool of
//! unclaimed assets. Each target goes through two steps before the next
//! target is considered:
//!
//! 1. **Strict:** a target with matchers claims the first pool asset whose
//!    lower-cased name contains every matcher token.
//! 2. **Fallback:** if that found nothing (always the case for `base`), the
//!    target claims the first remaining pool asset, whatever its name.
//!
//! `base` comes first, so it is resolved whenever the submission has any
//! asset. Targets reached with an empty pool stay unresolved. Assets left in
//! the pool at the end are dropped without notice.

use crate::models::VariantTarget;

/// Unclaimed assets in upload order
#[derive(Debug, Clone)]
pub struct AssetPool {
    remaining: Vec<String>,
}

impl AssetPool {
    pub fn new<S: AsRef<str>>(assets: &[S]) -> Self {
        Self {
            remaining: assets.iter().map(|a| a.as_ref().to_string()).collect(),
        }
    }

    /// Claim the first asset containing all tokens (case-insensitive)
    pub fn take_matching(&mut self, tokens: &[String]) -> Option<String> {
        let idx = self.remaining.iter().position(|asset| {
            let lower = asset.to_lowercase();
            tokens.iter().all(|t| lower.contains(t.as_str()))
        })?;
        Some(self.remaining.remove(idx))
    }

    /// Claim the first asset in pool order
    pub fn take_first(&mut self) -> Option<String> {
        if self.remaining.is_empty() {
            None
        } else {
            Some(self.remaining.remove(0))
        }
    }

    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Strict step: claim the first asset containing all of the target's matchers
///
/// Returns whether the target is resolved afterwards. Targets without
/// matchers never match strictly.
pub fn claim_strict_match(pool: &mut AssetPool, target: &mut VariantTarget) -> bool {
    if target.is_resolved() {
        return true;
    }
    if target.matchers.is_empty() {
        return false;
    }
    match pool.take_matching(&target.matchers) {
        Some(asset) => {
            tracing::debug!(variant = %target.key, asset = %asset, "Strict match");
            target.source_asset = Some(asset);
            true
        }
        None => false,
    }
}

/// Fallback step: claim the first remaining asset for an unresolved target
pub fn claim_fallback(pool: &mut AssetPool, target: &mut VariantTarget) -> bool {
    if target.is_resolved() {
        return true;
    }
    match pool.take_first() {
        Some(asset) => {
            tracing::debug!(variant = %target.key, asset = %asset, "Fallback match");
            target.source_asset = Some(asset);
            true
        }
        None => {
            tracing::debug!(variant = %target.key, "No asset left for target");
            false
        }
    }
}

/// Assign source assets to planned targets
pub fn assign<S: AsRef<str>>(assets: &[S], mut targets: Vec<VariantTarget>) -> Vec<VariantTarget> {
    let mut pool = AssetPool::new(assets);
    for target in targets.iter_mut() {
        if !claim_strict_match(&mut pool, target) {
            claim_fallback(&mut pool, target);
        }
    }
    targets
}
