use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use onboard_core::{config::Config, theme::Appearance};
use std::path::Path;

#[derive(Subcommand)]
pub enum ThemeSubcommand {
    /// Show colors, appearance and the generated CSS variables
    Show,
    /// Change one color (primary, secondary, accent, background, foreground)
    SetColor { name: String, value: String },
    /// Set light, dark or system appearance
    SetAppearance { appearance: Appearance },
    /// Restore the default colors
    Reset,
}

pub fn run(root: &Path, subcmd: ThemeSubcommand, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;

    match subcmd {
        ThemeSubcommand::Show => return show(&config, json),
        ThemeSubcommand::SetColor { name, value } => {
            config.ui.theme.set(&name, value)?;
        }
        ThemeSubcommand::SetAppearance { appearance } => {
            config.ui.appearance = appearance;
        }
        ThemeSubcommand::Reset => {
            config.ui.theme = Default::default();
        }
    }

    config.save(root).context("failed to save config")?;
    tracing::info!(appearance = %config.ui.appearance, "theme saved");
    show(&config, json)
}

fn show(config: &Config, json: bool) -> anyhow::Result<()> {
    let vars = config.ui.theme.css_variables();

    if json {
        return print_json(&serde_json::json!({
            "theme": config.ui.theme,
            "appearance": config.ui.appearance,
            "css_variables": vars.iter().cloned().collect::<std::collections::BTreeMap<_, _>>(),
        }));
    }

    println!("Appearance: {}\n", config.ui.appearance);
    let rows: Vec<Vec<String>> = vars.into_iter().map(|(name, value)| vec![name, value]).collect();
    print_table(&["VARIABLE", "VALUE"], rows);
    Ok(())
}
