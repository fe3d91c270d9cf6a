//! Engine configuration and per-call options.

use serde::{Deserialize, Serialize};

use rt_core::ItemId;

/// Default recursion limit for nested grants.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Settings shared by every call on one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrantsConfig {
    /// Nested grant processing stops at this depth.
    pub max_depth: u32,
    /// Collections searched by name for talents without a usable reference.
    pub talent_compendia: Vec<String>,
    /// Collections searched by name for traits without a usable reference.
    pub trait_compendia: Vec<String>,
}

impl Default for GrantsConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            talent_compendia: vec!["rogue-trader.talents".to_string()],
            trait_compendia: vec!["rogue-trader.traits".to_string()],
        }
    }
}

/// How nested grants are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantMode {
    /// Resolve nested grants now and persist at the end.
    #[default]
    Immediate,
    /// Collect changes only. Nested grants are left for a later pass.
    Batch,
}

/// The item a grant came from, recorded on created items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSource {
    /// Source item name.
    pub name: String,
    /// Source item ID, once it exists on the actor.
    pub id: Option<ItemId>,
}

/// Options for one `process_grants` or `apply_grants` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantOptions {
    /// Immediate or batch.
    pub mode: GrantMode,
    /// Starting recursion depth.
    pub depth: u32,
    /// Overrides [`GrantsConfig::max_depth`] for this call.
    pub max_depth: Option<u32>,
    /// Compute without persisting.
    pub dry_run: bool,
    /// Overrides the source recorded on created items.
    pub source: Option<GrantSource>,
    /// Suppress player notifications.
    pub quiet: bool,
}

impl GrantOptions {
    /// Options for batch mode.
    pub fn batch() -> Self {
        Self {
            mode: GrantMode::Batch,
            ..Self::default()
        }
    }

    /// Options for a dry run.
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Record `source` as the granting item.
    pub fn with_source(mut self, name: impl Into<String>, id: Option<ItemId>) -> Self {
        self.source = Some(GrantSource {
            name: name.into(),
            id,
        });
        self
    }

    /// Override the recursion limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Suppress notifications.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Whether this call writes to the store.
    pub fn persists(&self) -> bool {
        self.mode == GrantMode::Immediate && !self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: GrantsConfig = serde_json::from_str(r#"{"maxDepth": 5}"#).unwrap();
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.talent_compendia, vec!["rogue-trader.talents"]);
        assert_eq!(GrantsConfig::default().max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn options_persistence() {
        assert!(GrantOptions::default().persists());
        assert!(!GrantOptions::batch().persists());
        assert!(!GrantOptions::dry_run().persists());
        let o = GrantOptions::default()
            .with_source("Void Born", None)
            .with_max_depth(1)
            .quiet();
        assert_eq!(o.max_depth, Some(1));
        assert!(o.quiet);
        assert_eq!(o.source.unwrap().name, "Void Born");
    }
}
