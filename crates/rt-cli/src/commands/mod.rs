pub mod check;
pub mod fate;
pub mod preview;
pub mod skills;
pub mod wounds;

use rt_core::{Item, ItemKind};
use rt_mechanics::RngSource;

/// A seeded source when a seed is given, else one seeded from the OS.
fn dice(seed: Option<u64>) -> RngSource {
    match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    }
}

/// Split `name=value` into its parts.
fn parse_pair(pair: &str) -> Result<(String, i32), String> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{pair}'"))?;
    let value = value
        .trim()
        .parse::<i32>()
        .map_err(|_| format!("'{value}' is not a number in '{pair}'"))?;
    Ok((name.trim().to_string(), value))
}

/// Parse an item from JSON, naming the problem on failure.
fn parse_item(json: &str) -> Result<Item, String> {
    let item: Item = serde_json::from_str(json).map_err(|e| format!("invalid item JSON: {e}"))?;
    if let ItemKind::Other(kind) = &item.kind {
        tracing::debug!(kind = %kind, "item has a kind the engine does not interpret");
    }
    Ok(item)
}
