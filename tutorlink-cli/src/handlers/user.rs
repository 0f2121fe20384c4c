//! User command handlers

use crate::commands::UserCommands;
use crate::context::TutorlinkCliContext;
use crate::output::*;
use crate::utils::build_user;
use colored::Colorize;
use serde_json::json;
use tutorlink::TutorlinkError;
use tutorlink::models::UserId;

pub async fn handle_user_command(
    cmd: UserCommands,
    ctx: &TutorlinkCliContext,
    output_format: &str,
) -> tutorlink::Result<()> {
    match cmd {
        UserCommands::Add(args) => {
            let user = ctx.store().create_user(build_user(&args)?).await?;

            if output_format == "json" {
                print_json(&user);
            } else {
                println!(
                    "{}",
                    format_success(&format!(
                        "User '{}' created as {}.",
                        user.id.as_str().color(CliColors::accent()),
                        user.role.label()
                    ))
                );
            }
        }

        UserCommands::Get(args) => {
            let id = UserId::from(args.id.as_str());
            let user = ctx
                .store()
                .get_user(&id)
                .await?
                .ok_or_else(|| TutorlinkError::NotFound(format!("user {}", id)))?;

            if output_format == "json" {
                print_json(&user);
            } else {
                print_user(&user);
            }
        }

        UserCommands::List(args) => {
            let users = ctx
                .store()
                .list_users(Some(args.limit), Some(args.offset))
                .await?;

            if output_format == "json" {
                print_json(&users);
            } else {
                print_user_list(&users);
            }
        }

        UserCommands::Delete(args) => {
            let id = UserId::from(args.id.as_str());
            if !ctx.store().delete_user(&id).await? {
                return Err(TutorlinkError::NotFound(format!("user {}", id)));
            }

            if output_format == "json" {
                print_json(&json!({ "deleted": true, "user_id": id }));
            } else {
                println!(
                    "{}",
                    format_success(&format!("User '{}' deleted.", id.as_str()))
                );
            }
        }
    }

    Ok(())
}
