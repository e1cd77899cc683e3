use crate::output::{print_json, stage_label};
use onboard_core::resolver;

pub fn run(value: f64, json: bool) -> anyhow::Result<()> {
    let view = resolver::resolve(value);

    if json {
        return print_json(&view);
    }

    println!("Stage:   {}", stage_label(value));
    println!("Step:    {}", view.step_label);
    println!("Status:  {}", view.status);
    println!("Image:   {}", view.image_index);
    let actions: Vec<&str> = view.actions.iter().map(|a| a.as_str()).collect();
    if actions.is_empty() {
        println!("Actions: none");
    } else if view.actions_enabled {
        println!("Actions: {}", actions.join(", "));
    } else {
        println!("Actions: {} (disabled)", actions.join(", "));
    }
    Ok(())
}
