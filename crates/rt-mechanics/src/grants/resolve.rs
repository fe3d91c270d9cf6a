//! Resolution of individual skill, talent, trait, and equipment grants.

use rt_core::skills::{skill_def, skill_key_for_name, slugify_skill_name};
use rt_core::{
    EquipmentGrant, Grants, Item, ItemGrant, ItemKind, Provenance, SkillGrant, SkillLevel,
    SkillTraining, item::display_name,
};
use serde_json::Value;

use super::change_set::{ChangeSet, ItemInstruction};
use super::config::{GrantMode, GrantSource};
use super::{GrantsEngine, Scope};

impl GrantsEngine<'_> {
    /// The skill, talent, trait and equipment arrays of a block.
    pub(super) async fn item_grants(
        &self,
        grants: &Grants,
        scope: &Scope<'_>,
        source: &GrantSource,
        out: &mut ChangeSet,
    ) {
        for grant in &grants.skills {
            grant_skill(grant, scope, source, out);
        }
        for grant in &grants.talents {
            self.grant_talent(grant, scope, source, out).await;
        }
        for grant in &grants.traits {
            self.grant_trait(grant, scope, source, out).await;
        }
        for grant in &grants.equipment {
            self.grant_equipment(grant, source, out).await;
        }
    }

    async fn grant_talent(
        &self,
        grant: &ItemGrant,
        scope: &Scope<'_>,
        source: &GrantSource,
        out: &mut ChangeSet,
    ) {
        let spec = grant.specialization.as_deref();
        let label = display_name(&grant.name, spec);
        if scope
            .actor
            .find_item(&ItemKind::Talent, &grant.name, spec)
            .is_some()
            || out.pending_mut(&ItemKind::Talent, &grant.name, spec).is_some()
        {
            tracing::debug!(talent = %label, "talent already present, skipping");
            out.info(format!("Already has talent {label}"));
            return;
        }

        let compendia = &self.config.talent_compendia;
        let mut talent = self
            .lookup(grant, ItemKind::Talent, compendia)
            .await
            .unwrap_or_else(|| placeholder(ItemKind::Talent, grant));
        if spec.is_some() {
            talent.system.specialization = grant.specialization.clone();
        }
        talent.provenance = Some(provenance(source));

        out.info(format!("Talent granted: {label}"));
        if scope.mode != GrantMode::Immediate || !talent.system.has_grants {
            out.create(talent);
            return;
        }

        // Queued before recursing so nested grants see it, and everything
        // the parent already queued, as pending.
        out.create(talent.clone());
        let nested_scope = Scope {
            depth: scope.depth + 1,
            source: None,
            ..scope.clone()
        };
        self.collect(&talent, &nested_scope, out).await;
    }

    async fn grant_trait(
        &self,
        grant: &ItemGrant,
        scope: &Scope<'_>,
        source: &GrantSource,
        out: &mut ChangeSet,
    ) {
        let spec = grant.specialization.as_deref();
        let label = display_name(&grant.name, spec);

        if let Some(existing) = scope.actor.find_item(&ItemKind::Trait, &grant.name, spec) {
            match grant.level {
                Some(by) if existing.item.system.stackable => {
                    out.items.push(ItemInstruction::IncrementLevel {
                        item_id: existing.id,
                        name: label.clone(),
                        by,
                    });
                    out.info(format!("Trait {label} level +{by}"));
                }
                _ => {
                    tracing::debug!(trait_name = %label, "trait already present, skipping");
                    out.info(format!("Already has trait {label}"));
                }
            }
            return;
        }
        if let Some(pending) = out.pending_mut(&ItemKind::Trait, &grant.name, spec) {
            if let (Some(by), true) = (grant.level, pending.system.stackable) {
                let level = pending.system.level.unwrap_or(0).saturating_add(by);
                pending.system.level = Some(level);
            }
            return;
        }

        let compendia = &self.config.trait_compendia;
        let mut item = self
            .lookup(grant, ItemKind::Trait, compendia)
            .await
            .unwrap_or_else(|| placeholder(ItemKind::Trait, grant));
        if spec.is_some() {
            item.system.specialization = grant.specialization.clone();
        }
        if grant.level.is_some() {
            item.system.level = grant.level;
        }
        item.provenance = Some(provenance(source));

        out.info(format!("Trait granted: {label}"));
        out.create(item);
    }

    async fn grant_equipment(
        &self,
        grant: &EquipmentGrant,
        source: &GrantSource,
        out: &mut ChangeSet,
    ) {
        let Some(reference) = grant.reference.as_deref() else {
            tracing::warn!(equipment = %grant.name, "equipment grant has no reference");
            out.warn(format!("Cannot grant {}: no item reference", grant.name));
            return;
        };
        let Some(mut item) = self.resolve_reference(reference).await else {
            out.warn(format!("Cannot grant {}: item not found", grant.name));
            return;
        };
        if !item.kind.is_equipment() {
            tracing::warn!(
                equipment = %grant.name,
                kind = %item.kind,
                "equipment grant resolved to a non-equipment item"
            );
            out.warn(format!("Cannot grant {}: {} is not equipment", grant.name, item.kind));
            return;
        }
        if let Some(quantity) = grant.quantity {
            item.system.quantity = Some(quantity);
        }
        item.provenance = Some(provenance(source));
        out.info(format!("Equipment granted: {}", item.name));
        out.create(item);
    }

    /// Find item data by reference, then by name in `collections`.
    async fn lookup(&self, grant: &ItemGrant, kind: ItemKind, collections: &[String]) -> Option<Item> {
        if let Some(reference) = grant.reference.as_deref() {
            if let Some(item) = self.resolve_reference(reference).await {
                return Some(checked_kind(item, &kind));
            }
        }
        for collection in collections {
            match self.ports.compendium.find_by_name(collection, &grant.name).await {
                Ok(Some(item)) => return Some(checked_kind(item, &kind)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(collection = %collection, name = %grant.name, error = %e, "compendium lookup failed");
                }
            }
        }
        tracing::warn!(name = %grant.name, kind = %kind, "could not resolve grant, using placeholder");
        None
    }

    async fn resolve_reference(&self, reference: &str) -> Option<Item> {
        match self.ports.resolver.resolve(reference).await {
            Ok(Some(item)) => Some(item),
            Ok(None) => {
                tracing::warn!(reference, "referenced item not found");
                None
            }
            Err(e) => {
                tracing::warn!(reference, error = %e, "item lookup failed");
                None
            }
        }
    }
}

/// Resolve one skill grant. Skills need no lookups.
fn grant_skill(grant: &SkillGrant, scope: &Scope<'_>, source: &GrantSource, out: &mut ChangeSet) {
    let (key, def) = match skill_key_for_name(&grant.name) {
        Some(key) => (key.to_string(), skill_def(key)),
        None => {
            let slug = slugify_skill_name(&grant.name);
            tracing::warn!(skill = %grant.name, key = %slug, "unknown skill name, guessing key");
            (slug, None)
        }
    };
    let spec = grant
        .specialization
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if def.is_some_and(|d| d.specialist) && spec.is_none() {
        tracing::warn!(skill = %grant.name, "specialist skill granted without a specialization");
        out.warn(format!(
            "{} needs a specialization; grant skipped",
            grant.name
        ));
        return;
    }

    let name = def.map_or(grant.name.as_str(), |d| d.name);
    let level = grant.level.unwrap_or(SkillLevel::Trained);
    let training = SkillTraining::for_level(level);
    let label = format!("{}{}", display_name(name, spec), level_suffix(level));

    let existing = scope
        .actor
        .find_item(&ItemKind::Skill, name, spec)
        .or_else(|| scope.actor.find_item(&ItemKind::Skill, &grant.name, spec));
    if let Some(existing) = existing {
        out.items.push(ItemInstruction::Upgrade {
            item_id: existing.id,
            name: display_name(name, spec),
            training,
        });
        out.info(format!("Skill upgraded: {label}"));
    } else if let Some(pending) = out.pending_mut(&ItemKind::Skill, name, spec) {
        pending.system.training = pending.system.training.union(training);
    } else {
        let mut item = Item::new(ItemKind::Skill, name).with_specialization(spec.map(String::from));
        item.system.training = training;
        item.provenance = Some(provenance(source));
        out.create(item);
        out.info(format!("Skill granted: {label}"));
    }

    let current = scope.actor.skill_training(&key, spec);
    for flag in training.flags_missing_from(current) {
        let path = match spec {
            Some(spec) => format!("skills.{key}.entries.{spec}.{flag}"),
            None => format!("skills.{key}.{flag}"),
        };
        out.skill_updates.insert(path, Value::Bool(true));
    }
}

fn level_suffix(level: SkillLevel) -> &'static str {
    match level {
        SkillLevel::Trained => "",
        SkillLevel::Plus10 => " +10",
        SkillLevel::Plus20 => " +20",
    }
}

fn provenance(source: &GrantSource) -> Provenance {
    Provenance {
        granted_by: source.name.clone(),
        granted_by_id: source.id,
        auto_granted: true,
    }
}

/// A name-only item so an unresolvable grant is not lost.
fn placeholder(kind: ItemKind, grant: &ItemGrant) -> Item {
    Item::new(kind, grant.name.clone()).with_specialization(grant.specialization.clone())
}

fn checked_kind(item: Item, expected: &ItemKind) -> Item {
    if &item.kind != expected {
        tracing::warn!(
            name = %item.name,
            expected = %expected,
            found = %item.kind,
            "resolved item has an unexpected kind"
        );
    }
    item
}
