use colored::Colorize;
use sk_director::DirectorConfig;
use sk_mechanics::{OutcomeCategory, Planner, RollOutcome};

pub fn run(config: &DirectorConfig, outcome: &str, skill: i64, count: u32) -> Result<(), String> {
    let category = outcome
        .parse::<OutcomeCategory>()
        .map_err(|e| e.to_string())?;
    let planner = Planner::new(config.tuning);
    let mut rng = super::rng(config);

    println!("  {} at skill {skill}", category.to_string().bold());
    for _ in 0..count.max(1) {
        let value = planner.plan(category, skill, &mut rng);
        println!("  {}", RollOutcome::new(i64::from(value), skill));
    }
    Ok(())
}
