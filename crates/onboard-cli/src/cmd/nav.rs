use crate::output::{print_json, print_table};
use onboard_core::nav::{nav_for, NavItem};
use onboard_core::types::Role;

pub fn run(role: &str, json: bool) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let items = nav_for(role);

    if json {
        return print_json(&items);
    }

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| match item {
            NavItem::Link(link) => vec![link.label.clone(), "link".to_string(), link.href.clone()],
            NavItem::Action(action) => vec![
                action.label.clone(),
                "action".to_string(),
                action.command.as_str().to_string(),
            ],
        })
        .collect();
    print_table(&["LABEL", "KIND", "TARGET"], rows);
    Ok(())
}
