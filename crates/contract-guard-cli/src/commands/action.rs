use clap::Subcommand;
use contract_guard_core::{ActionKind, ActionOutcome, PresentationShell};

use super::Context;

#[derive(Subcommand)]
pub enum ActionCommand {
    /// Open the payment request link (WhatsApp, else email)
    Pay {
        #[arg(long)]
        at: Option<String>,
        /// Print the link without opening it
        #[arg(long)]
        dry_run: bool,
    },
    /// Open the support contact link (email, else phone)
    Support {
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(ctx: &Context, command: ActionCommand) -> Result<(), Box<dyn std::error::Error>> {
    let (kind, at, dry_run) = match command {
        ActionCommand::Pay { at, dry_run } => (ActionKind::RequestPayment, at, dry_run),
        ActionCommand::Support { at, dry_run } => (ActionKind::ContactSupport, at, dry_run),
    };

    let (_, contract, status) = ctx.evaluate_at(at.as_deref())?;
    let shell = PresentationShell::new(contract);
    match shell.trigger(kind, &status)? {
        ActionOutcome::OpenLink(url) => {
            println!("{url}");
            if !dry_run {
                open::that(url.as_str())?;
            }
        }
        // The CLI registers no callbacks.
        ActionOutcome::Handled => {}
    }
    Ok(())
}
