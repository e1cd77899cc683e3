use crate::output::{print_json, print_warnings};
use anyhow::Context;
use clap::Subcommand;
use onboard_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show the parsed configuration
    Show,
    /// Validate the config for common mistakes
    Validate,
    /// Set the support contact shown to homebuyers
    SetSupportEmail { email: String },
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, json),
        ConfigSubcommand::Validate => validate(root, json),
        ConfigSubcommand::SetSupportEmail { email } => set_support_email(root, &email, json),
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    if json {
        return print_json(&config);
    }
    println!("App:        {}", config.app.name);
    println!(
        "Support:    {}",
        config.app.support_email.as_deref().unwrap_or("(not set)")
    );
    println!("Appearance: {}", config.ui.appearance);
    Ok(())
}

fn validate(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();

    let has_errors = if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
        warnings.iter().any(|w| w.level == WarnLevel::Error)
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
        false
    } else {
        print_warnings(&warnings)
    };

    if has_errors {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

fn set_support_email(root: &Path, email: &str, json: bool) -> anyhow::Result<()> {
    onboard_core::paths::validate_email(email)?;
    let mut config = Config::load(root).context("failed to load config")?;
    config.app.support_email = Some(email.to_string());
    config.save(root).context("failed to save config")?;

    if json {
        print_json(&serde_json::json!({ "support_email": email }))?;
    } else {
        println!("Support email set to {email}");
    }
    Ok(())
}
