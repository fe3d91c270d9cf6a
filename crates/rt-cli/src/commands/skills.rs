use comfy_table::{ContentArrangement, Table};

use rt_core::SkillClass;
use rt_core::skills::SKILLS;

pub fn run(specialist_only: bool) -> Result<(), String> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Name", "Characteristic", "Class", "Specialist"]);

    let mut shown = 0;
    for skill in SKILLS.iter().filter(|s| !specialist_only || s.specialist) {
        let class = match skill.class {
            SkillClass::Basic => "basic",
            SkillClass::Advanced => "advanced",
        };
        table.add_row(vec![
            skill.key,
            skill.name,
            skill.characteristic.short_name(),
            class,
            if skill.specialist { "yes" } else { "" },
        ]);
        shown += 1;
    }

    println!("{table}");
    println!();
    println!("  {shown} skills");
    Ok(())
}
