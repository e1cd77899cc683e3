use anyhow::Context;
use onboard_core::{
    config::Config,
    io, paths,
    stage_def::{StageButton, StageDefinition},
    types::Status,
};
use std::path::Path;

/// Starter content: (order, name, title, subtitle, offers an assisted button).
const DEFAULT_STAGES: &[(u32, &str, &str, &str, bool)] = &[
    (1, "meet-builder", "Meet your builder", "Say hello to the team", false),
    (2, "plumbing", "Plumbing", "Fixtures, taps and water heater", true),
    (3, "lighting", "Lighting", "Fittings for every room", true),
    (4, "flooring", "Flooring", "Tiles, timber and carpet", false),
    (5, "kitchen", "Kitchen", "Cabinets, benchtops and appliances", false),
    (6, "walkthrough", "Final walkthrough", "Inspect the finished home", false),
    (7, "handover", "Welcome home", "Keys and handover documents", false),
];

fn default_stage(
    order: u32,
    name: &str,
    title: &str,
    subtitle: &str,
    assisted: bool,
) -> StageDefinition {
    let mut def = StageDefinition::new(order, name, title);
    def.subtitle = subtitle.to_string();
    if order < 7 {
        def.buttons.push(StageButton {
            text: "I'll do it myself".to_string(),
            popup: format!(
                "Complete the {} selections, then submit for approval.",
                title.to_lowercase()
            ),
            status: Status::NotRequested,
        });
    }
    if assisted {
        def.buttons.push(StageButton {
            text: "Handle it for me".to_string(),
            popup: "Our team will contact you to take care of this step.".to_string(),
            status: Status::NotRequested,
        });
    }
    def
}

pub fn run(root: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let app_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onboarding".to_string())
    });

    println!("Initializing onboarding in: {}", root.display());

    for dir in [paths::ONBOARD_DIR, paths::USERS_DIR, paths::STAGES_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let config_path = paths::config_path(root);
    if !config_path.exists() {
        Config::new(&app_name)
            .save(root)
            .context("failed to write config.yaml")?;
        println!("  created: {}", paths::CONFIG_FILE);
    } else {
        println!("  exists:  {}", paths::CONFIG_FILE);
    }

    let existing = StageDefinition::list(root).context("failed to read stage definitions")?;
    if existing.is_empty() {
        for &(order, name, title, subtitle, assisted) in DEFAULT_STAGES {
            StageDefinition::create(root, default_stage(order, name, title, subtitle, assisted))
                .with_context(|| format!("failed to write stage {order}"))?;
        }
        println!("  created: {} default stage definitions", DEFAULT_STAGES.len());
    } else {
        println!("  exists:  {} stage definitions", existing.len());
    }

    tracing::debug!(root = %root.display(), "init complete");
    println!("Next: onboard user create <name> <email>");
    Ok(())
}
