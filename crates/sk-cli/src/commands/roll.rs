use std::path::Path;

use colored::Colorize;
use sk_director::{
    ActorSource, Director, DirectorConfig, MemoryHost, Notice, NoticeLevel, RollMode,
};
use sk_mechanics::TargetIntent;

pub struct RollArgs<'a> {
    pub actor: &'a Path,
    pub target: Option<&'a Path>,
    pub subject: Option<&'a str>,
    pub result: &'a str,
    pub flavor: Option<&'a str>,
    pub gm_note: Option<&'a str>,
    pub mode: Option<&'a str>,
    pub extended: Option<&'a str>,
    pub write: bool,
}

pub fn run(config: DirectorConfig, args: RollArgs<'_>) -> Result<(), String> {
    let actor = super::load_actor(args.actor)?;
    let actor_id = actor.id.clone();
    let mut host = MemoryHost::new().with_actor(actor).controlling(actor_id.clone());
    if let Some(path) = args.target {
        let target = super::load_actor(path)?;
        let target_id = target.id.clone();
        host = host.with_actor(target).targeting(target_id);
    }

    let mut director = Director::new(config);
    let mut dialog = director.open_dialog(&host);

    if let Some(name) = args.subject {
        let index = dialog
            .selection()
            .find_subject(name)
            .ok_or_else(|| format!("unknown subject: {name}"))?;
        dialog.select_subject(index, director.rng());
    }
    match TargetIntent::parse(args.result).map_err(|e| e.to_string())? {
        TargetIntent::Preset(category) => dialog.choose_preset(category, director.rng()),
        TargetIntent::Exact(value) => dialog.set_result(value),
    }
    if let Some(mode) = args.mode {
        dialog.set_roll_mode(mode.parse::<RollMode>()?);
    }
    if !dialog.select_extended_test(args.extended) {
        return Err(format!(
            "unknown extended test: {}",
            args.extended.unwrap_or_default()
        ));
    }

    let preview = dialog.preview();
    tracing::debug!(
        subject = dialog.selected().map_or("-", |s| s.name()),
        preset = %dialog.preset(),
        result = dialog.result(),
        %preview,
        "dialog ready"
    );
    if preview.miscast {
        println!("  {}", "Miscast!".red().bold());
    }

    let mut request = dialog.submit();
    if let Some(flavor) = args.flavor {
        request = request.with_flavor(flavor);
    }
    if let Some(note) = args.gm_note {
        request = request.with_gm_note(note);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| e.to_string())?;
    tracing::debug!(
        formula = %request.formula,
        total = request.desired_total,
        mode = %request.roll_mode,
        "submitting from the command line"
    );
    let outcome = runtime.block_on(director.perform(&host, &host, request));

    for record in host.messages() {
        let speaker = record.message.speaker.as_deref().unwrap_or("?");
        let flavor = record.message.flavor.as_deref().unwrap_or_default();
        println!(
            "  {} [{}] {flavor}",
            speaker.bold(),
            record.message.roll_mode
        );
        println!("  {}", record.message.roll);
    }
    for notice in host.notices() {
        print_notice(&notice);
    }

    let report = outcome.map_err(|e| e.to_string())?;
    let line = report.outcome.to_string();
    if report.outcome.category.is_success() {
        println!("  {}", line.green());
    } else {
        println!("  {}", line.red());
    }

    if args.write {
        tracing::debug!(path = %args.actor.display(), "writing actor back");
        let updated = host
            .actor(&actor_id)
            .ok_or_else(|| format!("actor {actor_id} disappeared"))?;
        let json = serde_json::to_string_pretty(&updated).map_err(|e| e.to_string())?;
        std::fs::write(args.actor, json)
            .map_err(|e| format!("cannot write {}: {e}", args.actor.display()))?;
    }

    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => println!("  {}", notice.text.cyan()),
        NoticeLevel::Warning => eprintln!("  {}", notice.text.yellow()),
        NoticeLevel::Error => eprintln!("  {}", notice.text.red()),
    }
}
