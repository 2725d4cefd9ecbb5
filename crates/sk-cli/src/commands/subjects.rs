use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use sk_director::SelectionContext;

pub fn run(actor: &Path, target: Option<&Path>) -> Result<(), String> {
    let actor = super::load_actor(actor)?;
    let target = target.map(super::load_actor).transpose()?;
    let ctx = SelectionContext::build(Some(&actor), target.as_ref());

    println!("  {}", actor.name.bold());
    print_modifiers(&ctx);

    if ctx.subjects.is_empty() {
        println!("  No test subjects.");
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["#", "Subject", "Kind", "Base", "Mod", "Value"]);
        for (i, subject) in ctx.subjects.iter().enumerate() {
            let name = if subject.context.is_magic_related {
                format!("{} *", subject.name())
            } else {
                subject.name().to_string()
            };
            table.add_row(vec![
                i.to_string(),
                name,
                subject.kind.to_string(),
                subject.context.base_value.to_string(),
                subject.context.modifier_label(),
                subject.effective_value().to_string(),
            ]);
        }
        println!("{table}");
    }

    if !ctx.extended_tests.is_empty() {
        println!();
        println!("  {}", "Extended tests".bold());
        for test in &ctx.extended_tests {
            println!("  {} {} ({})", test.id.dimmed(), test.name, test.progress);
        }
    }

    if let Some(opposition) = &ctx.opposition {
        println!();
        println!("  {opposition}");
    }

    Ok(())
}

fn print_modifiers(ctx: &SelectionContext) {
    let advantage = ctx.modifiers.advantage_bonus();
    if advantage != 0 {
        println!("  Advantage: {advantage:+}");
    }
    let labels = ctx.condition_labels();
    if !labels.is_empty() {
        println!("  Conditions: {}", labels.join(", "));
    }
}
