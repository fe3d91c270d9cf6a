//! The grants resolution engine.
//!
//! Given an item the actor has just acquired, the engine walks the item's
//! grant block and produces a [`ChangeSet`]: characteristic advances,
//! resource bonuses, skill and talent items to create or upgrade, and
//! notifications for the player.
//!
//! Two modes are supported:
//!
//! - **Immediate** (default): talents that carry grants of their own are
//!   resolved recursively, up to a depth limit, and the merged result is
//!   persisted at the end of the call unless `dry_run` is set.
//! - **Batch**: nothing is persisted and nested grants are not followed.
//!   The caller collects change sets for several items, merges them, and
//!   commits once with [`GrantsEngine::apply_grants`].
//!
//! Malformed or missing content never fails a call. It degrades to warnings
//! and placeholder items. The only errors returned come from the store.

mod apply;
mod change_set;
mod config;
mod ports;
mod resolve;

pub use apply::ApplySummary;
pub use change_set::{ChangeSet, ItemInstruction};
pub use config::{DEFAULT_MAX_DEPTH, GrantMode, GrantOptions, GrantSource, GrantsConfig};
pub use ports::{
    ActorStore, Collaborators, Compendium, FieldUpdates, ItemResolver, LogNotifier, Notification,
    NotificationLevel, Notifier,
};

use std::future::Future;
use std::pin::Pin;

use rt_core::{Actor, Grants, Item, ItemKind};

use crate::dice::DiceSource;
use crate::error::MechResult;
use crate::formula;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves item grants against an actor snapshot.
pub struct GrantsEngine<'a> {
    ports: Collaborators<'a>,
    dice: &'a dyn DiceSource,
    config: GrantsConfig,
}

/// State for one level of resolution.
#[derive(Clone)]
struct Scope<'a> {
    actor: &'a Actor,
    mode: GrantMode,
    depth: u32,
    max_depth: u32,
    source: Option<GrantSource>,
}

impl<'a> GrantsEngine<'a> {
    /// Create an engine with the default configuration.
    pub fn new(ports: Collaborators<'a>, dice: &'a dyn DiceSource) -> Self {
        Self {
            ports,
            dice,
            config: GrantsConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: GrantsConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &GrantsConfig {
        &self.config
    }

    /// Compute the changes `item` grants to `actor`.
    ///
    /// In immediate mode without `dry_run` the result is also persisted
    /// through the store before returning.
    pub async fn process_grants(
        &self,
        item: &Item,
        actor: &Actor,
        options: &GrantOptions,
    ) -> MechResult<ChangeSet> {
        let scope = self.scope(actor, options);
        let mut change_set = ChangeSet::new();
        self.collect(item, &scope, &mut change_set).await;
        self.finish(actor, change_set, options).await
    }

    /// Resolve several items in batch mode into one change set.
    ///
    /// Items see each other's pending creations, so a skill granted by two
    /// items is created once with the higher level. Nothing is persisted.
    pub async fn process_batch(
        &self,
        items: &[Item],
        actor: &Actor,
        options: &GrantOptions,
    ) -> MechResult<ChangeSet> {
        let options = GrantOptions {
            mode: GrantMode::Batch,
            ..options.clone()
        };
        let scope = self.scope(actor, &options);
        let mut change_set = ChangeSet::new();
        for item in items {
            self.collect(item, &scope, &mut change_set).await;
        }
        tracing::debug!(
            items = items.len(),
            instructions = change_set.items.len(),
            "batch resolved"
        );
        self.finish(actor, change_set, &options).await
    }

    fn scope<'s>(&self, actor: &'s Actor, options: &GrantOptions) -> Scope<'s> {
        Scope {
            actor,
            mode: options.mode,
            depth: options.depth,
            max_depth: options.max_depth.unwrap_or(self.config.max_depth),
            source: options.source.clone(),
        }
    }

    async fn finish(
        &self,
        actor: &Actor,
        change_set: ChangeSet,
        options: &GrantOptions,
    ) -> MechResult<ChangeSet> {
        if !options.quiet {
            for notification in &change_set.notifications {
                self.ports.notifier.notify(notification);
            }
        }
        if options.persists() && !change_set.is_empty() {
            self.apply_grants(actor, &change_set, options).await?;
        }
        Ok(change_set)
    }

    /// Resolve one item into `out`. Boxed because talents recurse.
    fn collect<'s>(
        &'s self,
        item: &'s Item,
        scope: &'s Scope<'s>,
        out: &'s mut ChangeSet,
    ) -> BoxFuture<'s, ()> {
        Box::pin(async move {
            if scope.depth >= scope.max_depth {
                tracing::warn!(
                    item = %item.name,
                    depth = scope.depth,
                    "grant depth limit reached, not following further"
                );
                return;
            }
            let source = scope.source.clone().unwrap_or_else(|| GrantSource {
                name: item.name.clone(),
                id: None,
            });

            match &item.kind {
                ItemKind::OriginPath => self.origin_path(item, scope, &source, out).await,
                ItemKind::Talent if !item.system.has_grants => {
                    tracing::debug!(item = %item.name, "talent has no grants");
                }
                ItemKind::Talent | ItemKind::Trait => {
                    if let Some(grants) = &item.system.grants {
                        self.item_grants(grants, scope, &source, out).await;
                    }
                }
                other => {
                    tracing::warn!(item = %item.name, kind = %other, "item kind does not carry grants");
                }
            }
        })
    }

    async fn origin_path(
        &self,
        item: &Item,
        scope: &Scope<'_>,
        source: &GrantSource,
        out: &mut ChangeSet,
    ) {
        for (key, delta) in &item.system.characteristic_modifiers {
            if *delta != 0 {
                out.add_characteristic(*key, *delta);
                out.info(format!("{} {delta:+}", key.short_name()));
            }
        }

        let Some(grants) = &item.system.grants else {
            return;
        };
        self.block(grants, item, scope, source, out).await;

        for choice in &grants.choices {
            let Some(selected) = item.system.selected_choices.get(&choice.label) else {
                continue;
            };
            if selected.len() > choice.count {
                tracing::warn!(
                    choice = %choice.label,
                    selected = selected.len(),
                    allowed = choice.count,
                    "too many selections, ignoring the extra ones"
                );
                out.warn(format!(
                    "{}: only {} selection(s) allowed",
                    choice.label, choice.count
                ));
            }
            for value in selected.iter().take(choice.count) {
                match choice.option(value) {
                    Some(option) => {
                        out.info(format!("{}: {}", choice.label, option.label));
                        self.block(&option.grants, item, scope, source, out).await;
                    }
                    None => {
                        tracing::warn!(choice = %choice.label, value = %value, "unknown choice option");
                        out.warn(format!("{}: unknown option {value}", choice.label));
                    }
                }
            }
        }
    }

    /// Everything an origin-path grant block carries besides its choices.
    async fn block(
        &self,
        grants: &Grants,
        item: &Item,
        scope: &Scope<'_>,
        source: &GrantSource,
        out: &mut ChangeSet,
    ) {
        for (key, delta) in &grants.characteristics {
            out.add_characteristic(*key, *delta);
        }
        self.item_grants(grants, scope, source, out).await;

        for ability in &grants.special_abilities {
            out.info(format!("Special ability: {}", ability.name));
        }
        for aptitude in &grants.aptitudes {
            if !scope
                .actor
                .aptitudes
                .iter()
                .any(|a| a.eq_ignore_ascii_case(aptitude))
            {
                out.add_aptitude(aptitude);
            }
        }

        let rolled = item.system.rolled;
        if let Some(f) = &grants.wounds_formula {
            let wounds = formula::wounds_bonus(f, rolled.wounds, scope.actor, self.dice);
            out.wounds_bonus = out.wounds_bonus.saturating_add(wounds);
            out.info(format!("Wounds +{wounds}"));
        }
        if let Some(f) = &grants.fate_formula {
            let fate = formula::fate_bonus(f, rolled.fate, self.dice);
            out.fate_bonus = out.fate_bonus.saturating_add(fate);
            out.info(format!("Fate +{fate}"));
        }
        if let Some(f) = &grants.corruption {
            let corruption = formula::evaluate_plain(f, self.dice);
            out.corruption_bonus = out.corruption_bonus.saturating_add(corruption);
            out.info(format!("Corruption +{corruption}"));
        }
        if let Some(f) = &grants.insanity {
            let insanity = formula::evaluate_plain(f, self.dice);
            out.insanity_bonus = out.insanity_bonus.saturating_add(insanity);
            out.info(format!("Insanity +{insanity}"));
        }
    }
}
