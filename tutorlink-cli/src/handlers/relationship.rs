//! Relationship command handlers

use crate::commands::RelationshipCommands;
use crate::context::TutorlinkCliContext;
use crate::output::*;
use crate::utils::resolve_relationship_id;
use colored::Colorize;
use serde_json::json;
use tutorlink::models::{RelationshipId, SubjectId, UserId};
use tutorlink::relationships::RequestOutcome;

pub async fn handle_relationship_command(
    cmd: RelationshipCommands,
    ctx: &TutorlinkCliContext,
    output_format: &str,
) -> tutorlink::Result<()> {
    match cmd {
        RelationshipCommands::Request(args) => {
            let requester = UserId::from(args.requester.as_str());
            let provider = UserId::from(args.provider.as_str());
            let subjects = args.subjects.iter().map(|s| SubjectId::from(s.as_str()));

            let outcome = ctx
                .service()
                .request_relationship(&requester, &provider, subjects)
                .await?;
            let id = RelationshipId::for_pair(&requester, &provider);

            if output_format == "json" {
                print_json(&json!({ "relationship_id": id, "outcome": outcome }));
            } else {
                let msg = match outcome {
                    RequestOutcome::Created => "Relationship requested",
                    RequestOutcome::SubjectsUpdated => "Relationship subjects updated",
                };
                println!(
                    "{}",
                    format_success(&format!(
                        "{}: {}",
                        msg,
                        id.to_string().color(CliColors::accent())
                    ))
                );
            }
        }

        RelationshipCommands::Accept(args) => {
            let id = resolve_relationship_id(&args.id)?;
            ctx.service().accept_relationship(&id).await?;
            report_action(&id, "accepted", output_format);
        }

        RelationshipCommands::Reject(args) => {
            let id = resolve_relationship_id(&args.id)?;
            ctx.service().reject_relationship(&id, &args.reason).await?;
            report_action(&id, "rejected", output_format);
        }

        RelationshipCommands::Withdraw(args) => {
            let id = resolve_relationship_id(&args.id)?;
            ctx.service().withdraw_relationship(&id).await?;
            report_action(&id, "withdrawn", output_format);
        }

        RelationshipCommands::Remove(args) => {
            let id = resolve_relationship_id(&args.id)?;
            ctx.service().remove_relationship(&id, &args.reason).await?;
            report_action(&id, "removed", output_format);
        }

        RelationshipCommands::RemoveAll(args) => {
            let provider = UserId::from(args.provider.as_str());
            let removed = ctx
                .service()
                .remove_all_relationships(&provider, &args.reason)
                .await?;

            if output_format == "json" {
                print_json(&json!({ "provider_id": provider, "removed": removed }));
            } else {
                println!(
                    "{}",
                    format_success(&format!(
                        "Removed {} relationships of '{}'.",
                        removed,
                        provider.as_str().color(CliColors::accent())
                    ))
                );
            }
        }

        RelationshipCommands::Get(args) => {
            let id = resolve_relationship_id(&args.id)?;
            let relationship = ctx.service().get_relationship(&id).await?;

            if output_format == "json" {
                print_json(&relationship);
            } else {
                print_relationship(&relationship);
            }
        }

        RelationshipCommands::List(args) => {
            let (summaries, counterpart_label) = match (args.requester, args.provider) {
                (Some(requester), _) => (
                    ctx.service()
                        .list_for_requester(&UserId::from(requester))
                        .await?,
                    "Provider",
                ),
                (None, Some(provider)) => (
                    ctx.service()
                        .list_for_provider(&UserId::from(provider))
                        .await?,
                    "Requester",
                ),
                (None, None) => {
                    return Err(tutorlink::TutorlinkError::MissingArguments(
                        "requester or provider".to_string(),
                    ));
                }
            };

            if output_format == "json" {
                print_json(&summaries);
            } else {
                print_relationship_list(&summaries, counterpart_label);
            }
        }
    }

    Ok(())
}

fn report_action(id: &RelationshipId, action: &str, output_format: &str) {
    if output_format == "json" {
        print_json(&json!({ "relationship_id": id, "status": action }));
    } else {
        println!(
            "{}",
            format_success(&format!(
                "Relationship {} {}.",
                id.to_string().color(CliColors::accent()),
                action
            ))
        );
    }
}
