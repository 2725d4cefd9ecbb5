use colored::Colorize;
use sk_mechanics::RollOutcome;

pub fn run(result: i64, skill: i64) -> Result<(), String> {
    let outcome = RollOutcome::new(result, skill);
    let line = outcome.to_string();
    if outcome.category.is_success() {
        println!("  {}", line.green());
    } else {
        println!("  {}", line.red());
    }
    Ok(())
}
