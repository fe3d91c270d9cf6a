use colored::Colorize;

use rt_mechanics::{DiceSource, FateTable};

pub fn run(formula: &str, seed: Option<u64>) -> Result<(), String> {
    let table = FateTable::parse(formula).map_err(|e| e.to_string())?;
    if !table.covers_d10() {
        println!(
            "  {}",
            "warning: table does not cover every d10 result exactly once".yellow()
        );
    }

    let dice = super::dice(seed);
    let roll = dice.d10();
    let fate = match table.lookup(roll) {
        Some(fate) => fate,
        None => {
            println!("  {}", "warning: no range matched, using the first row".yellow());
            table.fallback()
        }
    };

    println!("  {} {roll}", "d10".bold());
    println!("  {} {}", "Fate".bold(), fate.to_string().green());
    Ok(())
}
