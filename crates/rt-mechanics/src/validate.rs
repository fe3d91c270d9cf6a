//! Validation of authored grant content.
//!
//! The engine tolerates bad content at runtime; this module reports it up
//! front so content authors can fix it. Checks cover skill names and
//! specializations, item references, formulas, fate tables, choices and
//! empty blocks.

use rt_core::skills::{skill_def, skill_key_for_name};
use rt_core::{Grants, Item, ItemKind};

use crate::formula::{DiceExpr, FateTable};

/// A warning or error found in an item's grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The item name where the issue was found.
    pub item: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.item, self.message)
    }
}

struct Report<'a> {
    item: &'a str,
    issues: Vec<ValidationIssue>,
}

impl Report<'_> {
    fn error(&mut self, message: String) {
        self.push(message, true);
    }

    fn warning(&mut self, message: String) {
        self.push(message, false);
    }

    fn push(&mut self, message: String, is_error: bool) {
        self.issues.push(ValidationIssue {
            item: self.item.to_string(),
            message,
            is_error,
        });
    }
}

/// Validate an item's grant block.
///
/// Errors are content the engine will skip or replace with a fallback.
/// Warnings are content it will handle but probably not as intended.
pub fn validate_item(item: &Item) -> Vec<ValidationIssue> {
    let mut report = Report {
        item: &item.name,
        issues: Vec::new(),
    };

    let Some(grants) = &item.system.grants else {
        if item.system.has_grants {
            report.warning("marked as having grants but has no grant block".into());
        }
        return report.issues;
    };
    if grants.is_empty() {
        report.warning("grant block is empty".into());
        return report.issues;
    }

    match &item.kind {
        ItemKind::Talent if !item.system.has_grants => {
            report.warning("talent grants are ignored unless hasGrants is set".into());
        }
        ItemKind::OriginPath | ItemKind::Talent | ItemKind::Trait => {}
        other => {
            report.warning(format!("{other} items never have their grants processed"));
        }
    }

    let origin = item.kind == ItemKind::OriginPath;
    validate_grants(grants, origin, &mut report);

    for choice in &grants.choices {
        if !origin {
            report.warning(format!("choice '{}' is only read on origin paths", choice.label));
        }
        if choice.count == 0 || choice.options.len() < choice.count {
            report.error(format!(
                "choice '{}' needs {} selection(s) but has {} option(s)",
                choice.label,
                choice.count,
                choice.options.len()
            ));
        }
        for option in &choice.options {
            validate_grants(&option.grants, origin, &mut report);
        }
        if let Some(selected) = item.system.selected_choices.get(&choice.label) {
            for value in selected {
                if choice.option(value).is_none() {
                    report.error(format!(
                        "choice '{}' has unknown selection '{value}'",
                        choice.label
                    ));
                }
            }
        }
    }

    report.issues
}

fn validate_grants(grants: &Grants, origin: bool, report: &mut Report<'_>) {
    for skill in &grants.skills {
        let Some(key) = skill_key_for_name(&skill.name) else {
            report.warning(format!("unknown skill '{}'", skill.name));
            continue;
        };
        let specialist = skill_def(key).is_some_and(|d| d.specialist);
        let has_spec = skill
            .specialization
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        if specialist && !has_spec {
            report.error(format!(
                "specialist skill '{}' has no specialization",
                skill.name
            ));
        }
    }

    for grant in grants.talents.iter().chain(&grants.traits) {
        if grant.reference.is_none() {
            report.warning(format!(
                "'{}' has no reference and will be looked up by name",
                grant.name
            ));
        }
    }

    for equipment in &grants.equipment {
        if equipment.reference.is_none() {
            report.error(format!(
                "equipment '{}' has no reference and cannot be granted",
                equipment.name
            ));
        }
    }

    let formulas = [
        ("wounds", &grants.wounds_formula),
        ("fate", &grants.fate_formula),
        ("corruption", &grants.corruption),
        ("insanity", &grants.insanity),
    ];
    if !origin && formulas.iter().any(|(_, f)| f.is_some()) {
        report.warning("formulas are only evaluated on origin paths".into());
    }
    for (label, formula) in formulas {
        let Some(formula) = formula else {
            continue;
        };
        match label {
            "fate" => match FateTable::parse(formula) {
                Ok(table) if !table.covers_d10() => {
                    report.warning(format!(
                        "fate table '{formula}' does not cover every d10 result exactly once"
                    ));
                }
                Ok(_) => {}
                Err(e) => report.error(format!("fate formula: {e}")),
            },
            "wounds" => {
                if let Err(e) = DiceExpr::parse(formula) {
                    report.error(format!("wounds formula: {e}"));
                }
            }
            _ => match DiceExpr::parse(formula) {
                Ok(expr) if expr.has_bonus_terms() => {
                    report.error(format!("{label} formula '{formula}' cannot use bonus terms"));
                }
                Ok(_) => {}
                Err(_) if formula.trim().parse::<i32>().is_ok() => {}
                Err(e) => report.error(format!("{label} formula: {e}")),
            },
        }
    }
}
