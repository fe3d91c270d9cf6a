//! Persisting a change set through the actor store.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use rt_core::{Actor, Item, ItemId};

use super::GrantsEngine;
use super::change_set::{ChangeSet, ItemInstruction};
use super::config::GrantOptions;
use super::ports::{FieldUpdates, Notification};
use crate::error::MechResult;

/// What an `apply_grants` call wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplySummary {
    /// Items created.
    pub created: usize,
    /// Existing items updated.
    pub updated: usize,
    /// The actor field updates, as sent to the store.
    pub actor_updates: FieldUpdates,
}

impl GrantsEngine<'_> {
    /// Persist `change_set` against `actor`.
    ///
    /// Deltas are added to the values in the `actor` snapshot, so the
    /// snapshot must be current. Applying the same change set twice applies
    /// it twice. With `dry_run` set the summary is computed and nothing is
    /// written.
    pub async fn apply_grants(
        &self,
        actor: &Actor,
        change_set: &ChangeSet,
        options: &GrantOptions,
    ) -> MechResult<ApplySummary> {
        let actor_updates = actor_updates(actor, change_set);
        let creates: Vec<Item> = change_set.created().cloned().collect();
        let item_updates = item_updates(actor, change_set);

        let summary = ApplySummary {
            created: creates.len(),
            updated: item_updates.len(),
            actor_updates: actor_updates.clone(),
        };
        if options.dry_run {
            tracing::debug!(actor = %actor.name, ?summary, "dry run, nothing written");
            return Ok(summary);
        }

        if !actor_updates.is_empty() {
            self.ports.store.update_actor(actor.id, actor_updates).await?;
        }
        if !creates.is_empty() {
            self.ports.store.create_items(actor.id, creates).await?;
        }
        for (item_id, patch) in item_updates {
            self.ports.store.update_item(actor.id, item_id, patch).await?;
        }

        tracing::info!(
            actor = %actor.name,
            created = summary.created,
            updated = summary.updated,
            "grants applied"
        );
        if summary.created + summary.updated > 0 && !options.quiet {
            self.ports.notifier.notify(&Notification::info(format!(
                "{}: {} item(s) added, {} updated",
                actor.name, summary.created, summary.updated
            )));
        }
        Ok(summary)
    }
}

fn actor_updates(actor: &Actor, change_set: &ChangeSet) -> FieldUpdates {
    let mut updates = FieldUpdates::new();

    for (key, delta) in &change_set.characteristics {
        if *delta == 0 {
            continue;
        }
        let advance = actor
            .characteristics
            .get(key)
            .map_or(0, |c| c.advance);
        updates.insert(
            format!("characteristics.{}.advance", key.field_key()),
            json!(advance.saturating_add(*delta)),
        );
    }

    let resources = &actor.resources;
    for (name, pool, bonus) in [
        ("wounds", resources.wounds, change_set.wounds_bonus),
        ("fate", resources.fate, change_set.fate_bonus),
    ] {
        if bonus == 0 {
            continue;
        }
        let mut grown = pool;
        grown.grow(bonus);
        updates.insert(format!("resources.{name}.value"), json!(grown.value));
        updates.insert(format!("resources.{name}.max"), json!(grown.max));
    }
    if change_set.corruption_bonus != 0 {
        updates.insert(
            "resources.corruption.value".into(),
            json!(resources.corruption.value.saturating_add(change_set.corruption_bonus)),
        );
    }
    if change_set.insanity_bonus != 0 {
        updates.insert(
            "resources.insanity.value".into(),
            json!(resources.insanity.value.saturating_add(change_set.insanity_bonus)),
        );
    }

    let mut aptitudes = actor.aptitudes.clone();
    for aptitude in &change_set.aptitudes {
        if !aptitudes.iter().any(|a| a.eq_ignore_ascii_case(aptitude)) {
            aptitudes.push(aptitude.clone());
        }
    }
    if aptitudes.len() != actor.aptitudes.len() {
        updates.insert("aptitudes".into(), json!(aptitudes));
    }

    updates.extend(change_set.skill_updates.clone());
    updates
}

/// Patches for upgrade and level instructions, skipping no-ops.
fn item_updates(actor: &Actor, change_set: &ChangeSet) -> Vec<(ItemId, FieldUpdates)> {
    let mut out = Vec::new();
    let mut levels: BTreeMap<ItemId, i64> = BTreeMap::new();
    for instruction in &change_set.items {
        match instruction {
            ItemInstruction::Create(_) => {}
            ItemInstruction::Upgrade {
                item_id,
                name,
                training,
            } => {
                let Ok(owned) = actor.item(*item_id) else {
                    tracing::warn!(item = %name, "skill to upgrade is no longer on the actor");
                    continue;
                };
                let current = owned.item.system.training;
                let flags = training.flags_missing_from(current);
                if flags.is_empty() {
                    tracing::debug!(item = %name, "skill already at or above granted level");
                    continue;
                }
                let patch = flags
                    .into_iter()
                    .map(|flag| (format!("system.{flag}"), Value::Bool(true)))
                    .collect();
                out.push((*item_id, patch));
            }
            ItemInstruction::IncrementLevel { item_id, name, by } => {
                let Ok(owned) = actor.item(*item_id) else {
                    tracing::warn!(item = %name, "trait to level up is no longer on the actor");
                    continue;
                };
                let level = levels
                    .entry(*item_id)
                    .or_insert_with(|| owned.item.system.level.unwrap_or(0));
                *level = level.saturating_add(*by);
            }
        }
    }
    for (item_id, level) in levels {
        let mut patch = FieldUpdates::new();
        patch.insert("system.level".into(), json!(level));
        out.push((item_id, patch));
    }
    out
}
