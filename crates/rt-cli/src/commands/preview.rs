use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use rt_core::Actor;
use rt_mechanics::grants::LogNotifier;
use rt_mechanics::memory::{MemoryCompendium, MemoryResolver, MemoryStore};
use rt_mechanics::{
    ChangeSet, Collaborators, GrantOptions, GrantsConfig, GrantsEngine, ItemInstruction,
};

pub fn run(
    item_json: &str,
    actor_json: Option<&str>,
    config_json: Option<&str>,
    seed: Option<u64>,
) -> Result<(), String> {
    let item = super::parse_item(item_json)?;
    let actor: Actor = match actor_json {
        Some(json) => serde_json::from_str(json).map_err(|e| format!("invalid actor JSON: {e}"))?,
        None => Actor::new("Preview"),
    };
    let config: GrantsConfig = match config_json {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| format!("invalid config JSON: {e}"))?
        }
        None => GrantsConfig::default(),
    };
    tracing::debug!(max_depth = config.max_depth, "preview configuration");

    let resolver = MemoryResolver::new();
    let compendium = MemoryCompendium::new();
    let store = MemoryStore::new(actor.clone());
    let dice = super::dice(seed);
    let engine = GrantsEngine::new(
        Collaborators {
            resolver: &resolver,
            compendium: &compendium,
            store: &store,
            notifier: &LogNotifier,
        },
        &dice,
    )
    .with_config(config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let change_set = runtime
        .block_on(engine.process_grants(&item, &actor, &GrantOptions::dry_run().quiet()))
        .map_err(|e| e.to_string())?;

    println!("  {} {}", "Grants of".bold(), item.full_name());
    if change_set.is_empty() {
        println!("  nothing to apply");
    } else {
        print_change_set(&change_set);
    }
    for notification in change_set.notifications.iter().filter(|n| n.is_warning()) {
        println!("  {}", notification.to_string().yellow());
    }
    Ok(())
}

fn print_change_set(change_set: &ChangeSet) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Change", "Detail"]);

    for (key, delta) in &change_set.characteristics {
        if *delta != 0 {
            table.add_row(vec![key.short_name().to_string(), format!("{delta:+}")]);
        }
    }
    for (label, value) in [
        ("Wounds", change_set.wounds_bonus),
        ("Fate", change_set.fate_bonus),
        ("Corruption", change_set.corruption_bonus),
        ("Insanity", change_set.insanity_bonus),
    ] {
        if value != 0 {
            table.add_row(vec![label.to_string(), format!("{value:+}")]);
        }
    }
    for instruction in &change_set.items {
        let row = match instruction {
            ItemInstruction::Create(item) => {
                vec![format!("new {}", item.kind), item.full_name()]
            }
            ItemInstruction::Upgrade { name, training, .. } => {
                let level = training
                    .level()
                    .map_or("untrained".to_string(), |l| format!("{l:?}"));
                vec!["upgrade".to_string(), format!("{name} to {level}")]
            }
            ItemInstruction::IncrementLevel { name, by, .. } => {
                vec!["level up".to_string(), format!("{name} {by:+}")]
            }
        };
        table.add_row(row);
    }
    if !change_set.aptitudes.is_empty() {
        table.add_row(vec![
            "aptitudes".to_string(),
            change_set.aptitudes.join(", "),
        ]);
    }

    println!("{table}");
}
