use colored::Colorize;
use sk_director::DirectorConfig;
use sk_mechanics::Formula;

pub fn run(config: &DirectorConfig, formula: &str, total: i64) -> Result<(), String> {
    let formula = Formula::parse(formula).map_err(|e| e.to_string())?;
    let mut rng = super::rng(config);

    let mut roll = formula.roll(&mut rng);
    let natural = roll.to_string();
    roll.force_total(total, &mut rng);
    tracing::debug!(natural = %natural, forced = %roll, "forced formula");

    println!("  {} {natural}", "rolled:".dimmed());
    println!("  {} {roll}", "forced:".bold());
    if roll.natural_total() != roll.total() {
        println!(
            "  {}",
            format!(
                "dice cannot show {total}; faces add up to {}",
                roll.natural_total()
            )
            .yellow()
        );
    }
    Ok(())
}
