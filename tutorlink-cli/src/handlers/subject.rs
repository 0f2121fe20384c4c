//! Subject command handlers

use crate::commands::SubjectCommands;
use crate::context::TutorlinkCliContext;
use crate::output::*;
use colored::Colorize;
use tutorlink::TutorlinkError;
use tutorlink::models::{CourseId, Subject, SubjectId};

pub async fn handle_subject_command(
    cmd: SubjectCommands,
    ctx: &TutorlinkCliContext,
    output_format: &str,
) -> tutorlink::Result<()> {
    match cmd {
        SubjectCommands::Add(args) => {
            let id = SubjectId::from(args.id.trim());
            if id.is_blank() {
                return Err(TutorlinkError::MissingArguments("id".to_string()));
            }
            let subject = ctx
                .store()
                .create_subject(Subject::new(id, args.name, CourseId::new(args.course)))
                .await?;

            if output_format == "json" {
                print_json(&subject);
            } else {
                println!(
                    "{}",
                    format_success(&format!(
                        "Subject '{}' created in course {}.",
                        subject.id.as_str().color(CliColors::accent()),
                        subject.course_id.as_str()
                    ))
                );
            }
        }

        SubjectCommands::Get(args) => {
            let id = SubjectId::from(args.id.as_str());
            let subject = ctx
                .store()
                .get_subject(&id)
                .await?
                .ok_or_else(|| TutorlinkError::NotFound(format!("subject {}", id)))?;

            if output_format == "json" {
                print_json(&subject);
            } else {
                print_subject_list(std::slice::from_ref(&subject));
            }
        }

        SubjectCommands::List => {
            let subjects = ctx.store().list_subjects().await?;

            if output_format == "json" {
                print_json(&subjects);
            } else {
                print_subject_list(&subjects);
            }
        }
    }

    Ok(())
}
