use colored::Colorize;

use rt_mechanics::validate_item;

pub fn run(json: &str) -> Result<(), String> {
    let item = super::parse_item(json)?;
    let issues = validate_item(&item);

    if issues.is_empty() {
        println!("  {} {}", "ok".green().bold(), item.full_name());
        return Ok(());
    }

    for issue in &issues {
        let line = issue.to_string();
        if issue.is_error {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        Err(format!(
            "{errors} error{}, {warnings} warning{}",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
        ))
    } else {
        println!(
            "  {warnings} warning{}",
            if warnings == 1 { "" } else { "s" }
        );
        Ok(())
    }
}
