pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;
pub mod utils;

pub use context::{ContextOptions, TutorlinkCliContext};
pub use output::{
    CliColors, error_response, format_error, format_info, format_status, format_success,
    format_warning, output_error, print_json, print_relationship, print_relationship_list,
    print_subject_list, print_sweep_report, print_user, print_user_list,
};
pub use utils::{build_user, parse_instant, resolve_relationship_id};

use commands::Commands;

/// Run every command that needs an engine
pub async fn execute(
    command: Commands,
    ctx: &TutorlinkCliContext,
    output_format: &str,
) -> tutorlink::Result<()> {
    match command {
        Commands::Version => {
            println!("Tutorlink CLI v{}", tutorlink::VERSION);
            Ok(())
        }
        Commands::Diagnose => handlers::handle_diagnose(ctx, output_format).await,
        Commands::User(cmd) => handlers::handle_user_command(cmd, ctx, output_format).await,
        Commands::Subject(cmd) => handlers::handle_subject_command(cmd, ctx, output_format).await,
        Commands::Relationship(cmd) => {
            handlers::handle_relationship_command(cmd, ctx, output_format).await
        }
        Commands::Sweep(args) => handlers::handle_sweep(args, ctx, output_format).await,
        Commands::RunSweeper => handlers::handle_run_sweeper(ctx, output_format).await,
        Commands::Clear(args) => handlers::handle_clear(args, ctx, output_format).await,
    }
}
