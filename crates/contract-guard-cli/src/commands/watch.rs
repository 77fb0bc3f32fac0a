use contract_guard_core::{ContractConfig, GuardController, GuardEvent};
use tracing::info;

use super::Context;

pub fn run(ctx: &Context, interval_ms: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.load_config()?;
    let mut settings = config.contract.clone();
    if let Some(ms) = interval_ms {
        settings.poll_interval_ms = ms;
    }
    // Validate before the runtime exists so config errors surface plainly.
    ContractConfig::try_from(&settings)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut controller = GuardController::system();
        controller.add_sink(|event: &GuardEvent| match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("failed to encode event: {e}"),
        });
        controller.start(&settings)?;
        info!("watching contract due {}", settings.due_at);

        tokio::signal::ctrl_c().await?;
        controller.stop();
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
