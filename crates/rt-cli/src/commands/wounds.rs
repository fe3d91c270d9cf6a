use colored::Colorize;

use rt_core::{Actor, CharacteristicKey};
use rt_mechanics::DiceExpr;

pub fn run(formula: &str, bonuses: &[String], seed: Option<u64>) -> Result<(), String> {
    let expr = DiceExpr::parse(formula).map_err(|e| e.to_string())?;

    let mut actor = Actor::new("cli");
    for pair in bonuses {
        let (token, bonus) = super::parse_pair(pair)?;
        let key = CharacteristicKey::from_bonus_token(&token)
            .ok_or_else(|| format!("unknown bonus token '{token}'"))?;
        let value = bonus
            .checked_mul(10)
            .ok_or_else(|| format!("bonus out of range in '{pair}'"))?;
        actor.set_characteristic(key, value);
    }

    let dice = super::dice(seed);
    let evaluation = expr
        .evaluate(&dice, |key| actor.bonus(key))
        .map_err(|e| e.to_string())?;
    let wounds = evaluation.total.max(0);

    println!("  {} {expr}", "Formula".bold());
    if evaluation.rolls.count() > 0 {
        println!("  {} {}", "Dice".bold(), evaluation.rolls);
    }
    println!("  {} {}", "Wounds".bold(), wounds.to_string().green());
    Ok(())
}
