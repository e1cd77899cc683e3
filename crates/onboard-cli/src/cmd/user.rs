use crate::output::{print_json, print_table, stage_label};
use anyhow::Context;
use clap::Subcommand;
use onboard_core::{
    stage_def::StageDefinition,
    types::{ActionKind, Stage},
    user::{TransitionCause, User, UserSummary},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Create a user (homebuyers start on stage 1; use --stage 0 for admins)
    Create {
        name: String,
        email: String,
        #[arg(long)]
        stage: Option<Stage>,
    },
    /// List all users
    List,
    /// Show a user, their current stage view and history
    Show { id: String },
    /// Apply a homebuyer action: self or assisted
    Advance {
        id: String,
        #[arg(long, default_value = "self")]
        action: ActionKind,
    },
    /// Approve a stage that is waiting on an administrator
    Approve { id: String },
    /// Override the stage value
    SetStage { id: String, stage: Stage },
    /// Delete a user
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: UserSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        UserSubcommand::Create { name, email, stage } => {
            create(root, &name, &email, stage.unwrap_or(Stage::START), json)
        }
        UserSubcommand::List => list(root, json),
        UserSubcommand::Show { id } => show(root, &id, json),
        UserSubcommand::Advance { id, action } => {
            mutate(root, &id, json, |u| u.advance(action).map(|_| ()))
        }
        UserSubcommand::Approve { id } => mutate(root, &id, json, |u| u.approve().map(|_| ())),
        UserSubcommand::SetStage { id, stage } => {
            mutate(root, &id, json, |u| {
                u.set_stage(stage);
                Ok(())
            })
        }
        UserSubcommand::Delete { id } => delete(root, &id, json),
    }
}

fn create(root: &Path, name: &str, email: &str, stage: Stage, json: bool) -> anyhow::Result<()> {
    let user = User::create(root, name, email, stage)
        .with_context(|| format!("failed to create user '{email}'"))?;

    if json {
        print_json(&user)?;
    } else {
        println!("Created user: {} <{}> ({})", user.name, user.email, user.id);
        println!("Stage: {} — {}", stage, user.view().step_label);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let users = User::list(root).context("failed to list users")?;

    if json {
        let summaries: Vec<UserSummary> = users.iter().map(User::summary).collect();
        return print_json(&summaries);
    }

    if users.is_empty() {
        println!("No users yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            let view = u.view();
            vec![
                u.id.clone(),
                u.name.clone(),
                u.email.clone(),
                stage_label(u.stage),
                view.step_label.to_string(),
                view.status.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "EMAIL", "STAGE", "STEP", "STATUS"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let user = User::load(root, id).with_context(|| format!("user '{id}' not found"))?;
    let view = user.view();
    let content = StageDefinition::for_step(root, view.step).context("failed to load stage")?;

    if json {
        return print_json(&serde_json::json!({
            "user": user,
            "view": view,
            "content": content,
        }));
    }

    println!("User:    {} <{}>", user.name, user.email);
    println!("Role:    {}", user.role());
    println!("Stage:   {}", stage_label(user.stage));
    println!("Step:    {}", view.step_label);
    println!("Status:  {}", view.status);
    if let Some(def) = content {
        println!("Content: {} — {}", def.title, def.subtitle);
    }

    if !user.stage_history.is_empty() {
        println!("\nHistory:");
        for t in &user.stage_history {
            let cause = match t.cause {
                TransitionCause::Action(a) => a.as_str(),
                TransitionCause::Approval => "approved",
                TransitionCause::Override => "override",
            };
            println!(
                "  {}  {} → {}  ({cause})",
                t.at.format("%Y-%m-%d %H:%M"),
                stage_label(t.from),
                stage_label(t.to),
            );
        }
    }
    Ok(())
}

fn mutate<F>(root: &Path, id: &str, json: bool, apply: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut User) -> onboard_core::Result<()>,
{
    let mut user = User::load(root, id).with_context(|| format!("user '{id}' not found"))?;
    let from = user.stage;
    apply(&mut user).with_context(|| format!("cannot move user '{id}'"))?;
    user.save(root).context("failed to save user")?;
    tracing::info!(user = %user.id, from, to = user.stage, "stage changed");

    let view = user.view();
    if json {
        print_json(&serde_json::json!({
            "id": user.id,
            "from": from,
            "stage": user.stage,
            "view": view,
        }))?;
    } else {
        println!(
            "{}: {} → {} ({}, {})",
            user.name,
            stage_label(from),
            stage_label(user.stage),
            view.step_label,
            view.status
        );
    }
    Ok(())
}

fn delete(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    User::delete(root, id).with_context(|| format!("failed to delete user '{id}'"))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
    } else {
        println!("Deleted user: {id}");
    }
    Ok(())
}
