//! Diagnostics and maintenance handlers

use crate::args::ClearArgs;
use crate::context::TutorlinkCliContext;
use crate::output::*;
use serde::Serialize;
use std::io::BufRead;

#[derive(Debug, Serialize)]
struct Diagnosis {
    version: &'static str,
    storage_healthy: bool,
    storage_error: Option<String>,
    engine: &'static str,
    sweeper_enabled: bool,
    notifiers: Vec<String>,
    metadata: Option<serde_json::Value>,
}

pub async fn handle_diagnose(ctx: &TutorlinkCliContext, output_format: &str) -> tutorlink::Result<()> {
    let (storage_healthy, storage_error) = match ctx.store().health_check().await {
        Ok(healthy) => (healthy, None),
        Err(e) => (false, Some(e.to_string())),
    };
    let config = ctx.engine.config();

    let diagnosis = Diagnosis {
        version: tutorlink::VERSION,
        storage_healthy,
        storage_error,
        engine: config.storage.surrealdb.engine.as_str(),
        sweeper_enabled: config.sweeper.enabled,
        notifiers: ctx.engine.dispatcher().list_notifiers().await,
        metadata: ctx.store().get_metadata().await.ok(),
    };

    if output_format == "json" {
        print_json(&diagnosis);
        return Ok(());
    }

    match (&diagnosis.storage_error, diagnosis.storage_healthy) {
        (Some(e), _) => println!("{}", format_error(&format!("Storage: Error - {}", e))),
        (None, true) => println!(
            "{}",
            format_success(&format!("Storage: Healthy ({})", diagnosis.engine))
        ),
        (None, false) => println!("{}", format_error("Storage: Unhealthy")),
    }

    if diagnosis.sweeper_enabled {
        println!(
            "{}",
            format_success(&format!(
                "Expiry sweeper: every {:?}, TTL {:?}",
                config.sweeper.interval, config.sweeper.ttl
            ))
        );
    } else {
        println!("{}", format_warning("Expiry sweeper: disabled"));
    }

    if diagnosis.notifiers.is_empty() {
        println!("{}", format_warning("Notifiers: none registered"));
    } else {
        println!(
            "{}",
            format_info(&format!("Notifiers: {}", diagnosis.notifiers.join(", ")))
        );
    }

    if let Some(metadata) = &diagnosis.metadata {
        println!("Storage metadata: {}", metadata);
    }
    Ok(())
}

pub async fn handle_clear(
    args: ClearArgs,
    ctx: &TutorlinkCliContext,
    output_format: &str,
) -> tutorlink::Result<()> {
    if !args.yes {
        println!("Are you sure you want to clear all data? This cannot be undone.");
        println!("Type 'yes' to confirm:");

        let mut input = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| tutorlink::TutorlinkError::Other(format!("Failed to read input: {}", e)))?;
        if input.trim() != "yes" {
            println!("{}", format_info("Clear cancelled."));
            return Ok(());
        }
    }

    ctx.store().clear().await?;

    if output_format == "json" {
        print_json(&serde_json::json!({ "cleared": true }));
    } else {
        println!("{}", format_success("All data cleared."));
    }
    Ok(())
}
