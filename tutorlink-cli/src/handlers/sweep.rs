//! Expiry sweeper command handlers

use crate::args::SweepArgs;
use crate::context::TutorlinkCliContext;
use crate::output::*;
use crate::utils::parse_instant;
use tracing::info;
use tutorlink::TutorlinkError;

/// Run a single sweep and print its report
pub async fn handle_sweep(
    args: SweepArgs,
    ctx: &TutorlinkCliContext,
    output_format: &str,
) -> tutorlink::Result<()> {
    let now = parse_instant(args.at.as_deref())?;
    let report = ctx.engine.sweeper().sweep_once(now).await?;
    ctx.engine.dispatcher().drain().await;

    if output_format == "json" {
        print_json(&report);
    } else {
        print_sweep_report(&report);
    }
    Ok(())
}

/// Run the periodic sweeper until Ctrl-C
pub async fn handle_run_sweeper(ctx: &TutorlinkCliContext, output_format: &str) -> tutorlink::Result<()> {
    let sweeper = ctx.engine.config().sweeper.clone();
    if !sweeper.enabled {
        return Err(TutorlinkError::Configuration(
            "the expiry sweeper is disabled (sweeper.enabled = false)".to_string(),
        ));
    }

    ctx.engine.start_sweeper();
    if output_format != "json" {
        println!(
            "{}",
            format_info(&format!(
                "Expiry sweeper running every {:?} with a {:?} TTL. Press Ctrl-C to stop.",
                sweeper.interval, sweeper.ttl
            ))
        );
    }

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| TutorlinkError::Other(format!("Failed to listen for Ctrl-C: {}", e)))?;
    info!("Interrupt received, stopping expiry sweeper");

    ctx.engine.shutdown().await;
    if output_format != "json" {
        println!("{}", format_success("Expiry sweeper stopped."));
    }
    Ok(())
}
