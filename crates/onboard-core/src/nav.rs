use crate::types::Role;
use serde::{Deserialize, Serialize};

/// Commands a nav entry can trigger in place, without navigating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavCommand {
    Logout,
    ToggleAppearance,
}

impl NavCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            NavCommand::Logout => "logout",
            NavCommand::ToggleAppearance => "toggle_appearance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavAction {
    pub label: String,
    pub command: NavCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavItem {
    Action(NavAction),
    Link(NavLink),
}

impl NavItem {
    fn link(label: &str, href: &str) -> Self {
        NavItem::Link(NavLink {
            label: label.to_string(),
            href: href.to_string(),
        })
    }

    fn action(label: &str, command: NavCommand) -> Self {
        NavItem::Action(NavAction {
            label: label.to_string(),
            command,
        })
    }
}

pub fn nav_for(role: Role) -> Vec<NavItem> {
    let mut items = match role {
        Role::Admin => vec![
            NavItem::link("Dashboard", "/admin"),
            NavItem::link("Users", "/admin/users"),
            NavItem::link("Stages", "/admin/stages"),
            NavItem::link("Theme", "/admin/theme"),
        ],
        Role::Homebuyer => vec![NavItem::link("My onboarding", "/onboarding")],
    };
    items.push(NavItem::action("Toggle appearance", NavCommand::ToggleAppearance));
    items.push(NavItem::action("Log out", NavCommand::Logout));
    items
}
