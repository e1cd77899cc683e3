use crate::output::{print_json, print_table, print_warnings};
use anyhow::Context;
use clap::Subcommand;
use onboard_core::{
    stage_def::{self, StageButton, StageDefinition, StagePatch},
    types::Status,
};
use std::path::Path;

#[derive(Subcommand)]
pub enum StageSubcommand {
    /// Create a stage definition
    Create {
        order: u32,
        name: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        subtitle: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Button as "text" or "text|popup" (repeat up to twice)
        #[arg(long = "button")]
        buttons: Vec<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// List stage definitions
    List,
    /// Show a stage definition
    Show { order: u32 },
    /// Update fields of a stage definition
    Update {
        order: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replace all buttons ("text" or "text|popup")
        #[arg(long = "button")]
        buttons: Vec<String>,
        /// Remove every button
        #[arg(long, conflicts_with = "buttons")]
        clear_buttons: bool,
        /// Image path; pass an empty string to remove it
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a stage definition
    Delete { order: u32 },
    /// Check definitions against the fixed step keys
    Check,
}

pub fn run(root: &Path, subcmd: StageSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        StageSubcommand::Create {
            order,
            name,
            title,
            subtitle,
            description,
            buttons,
            image,
        } => {
            let title = title.unwrap_or_else(|| name.replace('-', " "));
            let mut def = StageDefinition::new(order, name, title);
            def.subtitle = subtitle;
            def.description = description;
            def.buttons = buttons.iter().map(|b| parse_button(b)).collect();
            def.image = image;
            create(root, def, json)
        }
        StageSubcommand::List => list(root, json),
        StageSubcommand::Show { order } => show(root, order, json),
        StageSubcommand::Update {
            order,
            name,
            title,
            subtitle,
            description,
            buttons,
            clear_buttons,
            image,
        } => {
            let buttons = if clear_buttons {
                Some(Vec::new())
            } else if buttons.is_empty() {
                None
            } else {
                Some(buttons.iter().map(|b| parse_button(b)).collect())
            };
            let patch = StagePatch {
                name,
                title,
                subtitle,
                description,
                buttons,
                image,
            };
            update(root, order, patch, json)
        }
        StageSubcommand::Delete { order } => delete(root, order, json),
        StageSubcommand::Check => check(root, json),
    }
}

/// `text|popup`, or just `text` with an empty popup.
fn parse_button(raw: &str) -> StageButton {
    let (text, popup) = raw.split_once('|').unwrap_or((raw, ""));
    StageButton {
        text: text.trim().to_string(),
        popup: popup.trim().to_string(),
        status: Status::NotRequested,
    }
}

fn create(root: &Path, def: StageDefinition, json: bool) -> anyhow::Result<()> {
    let order = def.order;
    let def = StageDefinition::create(root, def)
        .with_context(|| format!("failed to create stage {order}"))?;

    if json {
        print_json(&def)?;
    } else {
        match def.step_key() {
            Some(key) => println!("Created stage {order}: {} ({key})", def.title),
            None => println!("Created stage {order}: {} (not shown by any step)", def.title),
        }
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let defs = StageDefinition::list(root).context("failed to list stages")?;

    if json {
        return print_json(&defs);
    }

    if defs.is_empty() {
        println!("No stage definitions yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = defs
        .iter()
        .map(|d| {
            vec![
                d.order.to_string(),
                d.name.clone(),
                d.step_key().map(|k| k.label().to_string()).unwrap_or_else(|| "-".to_string()),
                d.buttons.len().to_string(),
                d.title.clone(),
            ]
        })
        .collect();
    print_table(&["ORDER", "NAME", "STEP", "BUTTONS", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, order: u32, json: bool) -> anyhow::Result<()> {
    let def = StageDefinition::load(root, order)
        .with_context(|| format!("stage {order} not found"))?;

    if json {
        return print_json(&def);
    }

    println!("Stage {}: {} — {}", def.order, def.name, def.title);
    if !def.subtitle.is_empty() {
        println!("Subtitle: {}", def.subtitle);
    }
    if !def.description.is_empty() {
        println!("\n{}\n", def.description);
    }
    if let Some(ref image) = def.image {
        println!("Image:    {image}");
    }
    for (i, b) in def.buttons.iter().enumerate() {
        println!("Button {}: {} [{}]", i + 1, b.text, b.status);
    }
    Ok(())
}

fn update(root: &Path, order: u32, patch: StagePatch, json: bool) -> anyhow::Result<()> {
    let def = StageDefinition::update(root, order, patch)
        .with_context(|| format!("failed to update stage {order}"))?;

    if json {
        print_json(&def)?;
    } else {
        println!("Updated stage {order}: {}", def.title);
    }
    Ok(())
}

fn delete(root: &Path, order: u32, json: bool) -> anyhow::Result<()> {
    StageDefinition::delete(root, order)
        .with_context(|| format!("failed to delete stage {order}"))?;

    if json {
        print_json(&serde_json::json!({ "order": order, "deleted": true }))?;
    } else {
        println!("Deleted stage {order}");
    }
    Ok(())
}

fn check(root: &Path, json: bool) -> anyhow::Result<()> {
    let defs = StageDefinition::list(root).context("failed to list stages")?;
    let warnings = stage_def::check_consistency(&defs);

    if json {
        return print_json(&serde_json::json!({ "warnings": warnings }));
    }

    if warnings.is_empty() {
        println!("Every step has a stage definition.");
        return Ok(());
    }
    if print_warnings(&warnings) {
        anyhow::bail!("stage definitions are inconsistent with the step table");
    }
    Ok(())
}
