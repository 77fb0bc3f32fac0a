use std::path::Path;

use contract_guard_core::shell::html::render_html;
use contract_guard_core::PresentationShell;

use super::{read_optional, Context};

const PLACEHOLDER_CONTENT: &str = "<main>protected content</main>";

pub fn run(
    ctx: &Context,
    at: Option<&str>,
    content: Option<&Path>,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, contract, status) = ctx.evaluate_at(at)?;
    let content = read_optional(content)?;
    let shell = PresentationShell::new(contract).with_options(config.shell.clone());
    let html = render_html(
        &shell.view(&status),
        content.as_deref().unwrap_or(PLACEHOLDER_CONTENT),
    );

    match out {
        Some(path) => {
            std::fs::write(path, html)?;
            println!("Rendered {} shell to {}", status.tier, path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}
