use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tutorlink_cli::commands::Commands;
use tutorlink_cli::{ContextOptions, TutorlinkCliContext, execute, output_error};

#[derive(Parser)]
#[command(name = "tutorlink-cli")]
#[command(about = "Tutorlink relationship engine CLI", long_about = None)]
#[command(version = tutorlink::VERSION)]
struct Cli {
    /// Custom data directory for storage
    #[arg(long, short, global = true)]
    data_dir: Option<String>,

    /// Configuration file (toml, yaml or json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true)]
    memory: bool,

    /// Output format (table, json) - use json for tool integration
    #[arg(long, short, default_value = "table", global = true)]
    output: String,

    /// Use machine-readable output (alias for --output json)
    #[arg(long, global = true)]
    machine: bool,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Quiet mode (suppress all logging output)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = Cli::parse();

    // Priority: machine flag > env var > cli arg
    let output_format = if cli_args.machine {
        "json".to_string()
    } else if let Ok(env_output) = std::env::var("TUTORLINK_OUTPUT") {
        env_output
    } else {
        cli_args.output.clone()
    };

    let is_quiet = cli_args.quiet
        || std::env::var("TUTORLINK_QUIET")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

    let log_level = if is_quiet || cli_args.machine {
        Level::ERROR
    } else if cli_args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if matches!(cli_args.command, Commands::Version) {
        println!("Tutorlink CLI v{}", tutorlink::VERSION);
        return ExitCode::SUCCESS;
    }

    let options = ContextOptions {
        data_dir: cli_args.data_dir,
        config_file: cli_args.config,
        memory: cli_args.memory,
    };
    let ctx = match TutorlinkCliContext::new(options).await {
        Ok(ctx) => ctx,
        Err(e) => {
            output_error(&e, &output_format);
            return ExitCode::FAILURE;
        }
    };

    let owns_shutdown = matches!(cli_args.command, Commands::RunSweeper);
    let result = execute(cli_args.command, &ctx, &output_format).await;
    if !owns_shutdown {
        ctx.engine.shutdown().await;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output_error(&e, &output_format);
            ExitCode::FAILURE
        }
    }
}
