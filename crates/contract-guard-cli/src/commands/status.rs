use contract_guard_core::{DegradationEffects, GuardStatus};

use super::Context;

pub fn run(ctx: &Context, at: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, _, status) = ctx.evaluate_at(at)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_status(&status);
    }
    Ok(())
}

pub fn run_effects(ctx: &Context, at: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let (_, contract, status) = ctx.evaluate_at(at)?;
    let effects = DegradationEffects::for_status(&status, contract.profile());
    println!("{}", serde_json::to_string_pretty(&effects)?);
    println!("css: {}", effects.to_css());
    Ok(())
}

fn print_status(status: &GuardStatus) {
    println!("Tier:        {}", status.tier);
    println!("Due:         {}", status.due_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Evaluated:   {}", status.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if status.is_overdue {
        println!(
            "Overdue:     yes ({} days / {} hours late{})",
            status.days_late,
            status.hours_late,
            if status.is_in_grace { ", in grace" } else { "" }
        );
    } else {
        let remaining = status.time_until_due();
        println!(
            "Overdue:     no ({}d {}h remaining)",
            remaining.num_days(),
            remaining.num_hours() % 24
        );
    }
    println!("Fade level:  {:.2}", status.fade_level);
    if !status.message.is_empty() {
        println!("Message:     {}", status.message);
    }
}
