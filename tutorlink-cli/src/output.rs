use colored::*;
use serde::Serialize;
use serde_json::json;
use tutorlink::TutorlinkError;
use tutorlink::models::{Relationship, RelationshipStatus, RelationshipSummary, Subject, User};
use tutorlink::sweeper::SweepReport;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn primary() -> Color {
        Color::White
    }

    pub fn accent() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Structured form of an error, built from the error catalog
pub fn error_response(error: &TutorlinkError) -> serde_json::Value {
    let metadata = error.metadata();
    let mut response = json!({
        "error": true,
        "code": metadata.code,
        "message": error.to_string(),
        "summary": metadata.message,
        "remediation": metadata.remediation,
        "http_status": metadata.http_status,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    if let TutorlinkError::PartialFailure { removed, failures } = error {
        response["details"] = json!({
            "removed": removed,
            "failures": failures,
        });
    }

    response
}

/// Report an error on stderr in the selected output format
pub fn output_error(error: &TutorlinkError, output_format: &str) {
    if output_format == "json" {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&error_response(error))
                .unwrap_or_else(|_| "{}".to_string())
        );
        return;
    }

    let metadata = error.metadata();
    eprintln!("{}", format_error(&error.to_string()));
    if let TutorlinkError::PartialFailure { failures, .. } = error {
        for failure in failures {
            eprintln!(
                "  {} {}",
                failure.relationship_id.to_string().color(CliColors::accent()),
                failure.cause.color(CliColors::muted())
            );
        }
    }
    eprintln!(
        "  {} {}",
        "hint:".color(CliColors::muted()).bold(),
        metadata.remediation.color(CliColors::muted())
    );
    eprintln!(
        "  {} {}",
        "code:".color(CliColors::muted()).bold(),
        metadata.code.as_str().color(CliColors::muted())
    );
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_status(status: RelationshipStatus) -> ColoredString {
    match status {
        RelationshipStatus::Pending => status.as_str().color(CliColors::warning()),
        RelationshipStatus::Accepted => status.as_str().color(CliColors::success()),
    }
}

fn join_subjects<'a>(subjects: impl IntoIterator<Item = &'a tutorlink::models::SubjectId>) -> String {
    subjects
        .into_iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_user(user: &User) {
    println!("{}", "━━━ User ━━━".color(CliColors::info()).bold());
    println!(
        "{}: {}",
        "ID".color(CliColors::muted()),
        user.id.as_str().color(CliColors::accent()).bold()
    );
    println!(
        "{}: {}",
        "Name".color(CliColors::muted()),
        user.name.color(CliColors::primary())
    );
    if let Some(email) = &user.email {
        println!(
            "{}: {}",
            "Email".color(CliColors::muted()),
            email.color(CliColors::primary())
        );
    }
    println!(
        "{}: {}",
        "Role".color(CliColors::muted()),
        user.role.label().color(CliColors::info())
    );
    if let Some(profile) = user.provider_profile() {
        println!(
            "{}: {}",
            "Subjects".color(CliColors::muted()),
            join_subjects(&profile.offered_subjects).color(CliColors::primary())
        );
        println!(
            "{}: {}",
            "Capacity".color(CliColors::muted()),
            profile.capacity_limit.to_string().color(CliColors::primary())
        );
    }
}

pub fn print_user_list(users: &[User]) {
    if users.is_empty() {
        println!("{}", format_info("No users found."));
        return;
    }

    println!("{}", format_info(&format!("Found {} users:", users.len())));
    println!();

    println!(
        "{:<24} {:<24} {:<20} {:<10} {}",
        "ID".color(CliColors::muted()).bold(),
        "Name".color(CliColors::muted()).bold(),
        "Role".color(CliColors::muted()).bold(),
        "Capacity".color(CliColors::muted()).bold(),
        "Subjects".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(110).color(CliColors::muted()));

    for user in users {
        let (capacity, subjects) = match user.provider_profile() {
            Some(profile) => (
                profile.capacity_limit.to_string(),
                join_subjects(&profile.offered_subjects),
            ),
            None => ("-".to_string(), String::new()),
        };
        println!(
            "{:<24} {:<24} {:<20} {:<10} {}",
            user.id.as_str().color(CliColors::accent()),
            user.name.color(CliColors::primary()),
            user.role.label().color(CliColors::info()),
            capacity.color(CliColors::primary()),
            subjects.color(CliColors::muted())
        );
    }
}

pub fn print_subject_list(subjects: &[Subject]) {
    if subjects.is_empty() {
        println!("{}", format_info("No subjects found."));
        return;
    }

    println!(
        "{:<24} {:<24} {}",
        "ID".color(CliColors::muted()).bold(),
        "Course".color(CliColors::muted()).bold(),
        "Name".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(80).color(CliColors::muted()));

    for subject in subjects {
        println!(
            "{:<24} {:<24} {}",
            subject.id.as_str().color(CliColors::accent()),
            subject.course_id.as_str().color(CliColors::info()),
            subject.name.color(CliColors::primary())
        );
    }
}

pub fn print_relationship(relationship: &Relationship) {
    println!(
        "{}",
        "━━━ Relationship Details ━━━"
            .color(CliColors::info())
            .bold()
    );
    println!(
        "{}: {}",
        "ID".color(CliColors::muted()),
        relationship.id.to_string().color(CliColors::accent()).bold()
    );
    println!(
        "{}: {}",
        "Requester".color(CliColors::muted()),
        relationship.requester_id.as_str().color(CliColors::accent())
    );
    println!(
        "{}: {}",
        "Provider".color(CliColors::muted()),
        relationship.provider_id.as_str().color(CliColors::accent())
    );
    println!(
        "{}: {}",
        "Status".color(CliColors::muted()),
        format_status(relationship.status)
    );
    println!(
        "{}: {}",
        "Subjects".color(CliColors::muted()),
        join_subjects(&relationship.subjects).color(CliColors::primary())
    );
    println!(
        "{}: {}",
        "Created".color(CliColors::muted()),
        relationship
            .created_on
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .color(CliColors::primary())
    );
}

/// Print relationship summaries; `counterpart_label` names the other party's column
pub fn print_relationship_list(relationships: &[RelationshipSummary], counterpart_label: &str) {
    if relationships.is_empty() {
        println!("{}", format_info("No relationships found."));
        return;
    }

    println!(
        "{}",
        format_info(&format!("Found {} relationships:", relationships.len()))
    );
    println!();

    println!(
        "{:<10} {:<24} {:<30} {:<20} {}",
        "Status".color(CliColors::muted()).bold(),
        counterpart_label.color(CliColors::muted()).bold(),
        "Subjects".color(CliColors::muted()).bold(),
        "Created".color(CliColors::muted()).bold(),
        "ID".color(CliColors::muted()).bold()
    );
    println!("{}", "─".repeat(120).color(CliColors::muted()));

    for summary in relationships {
        println!(
            "{:<10} {:<24} {:<30} {:<20} {}",
            format_status(summary.status),
            summary.counterpart.name.color(CliColors::accent()),
            join_subjects(&summary.subjects).color(CliColors::primary()),
            summary
                .created_on
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .color(CliColors::primary()),
            summary.id.to_string().color(CliColors::muted())
        );
    }
}

pub fn print_sweep_report(report: &SweepReport) {
    println!("{}", "━━━ Sweep Report ━━━".color(CliColors::info()).bold());
    println!(
        "{}: {}",
        "Expired".color(CliColors::muted()),
        report.expired.to_string().color(CliColors::success())
    );
    println!(
        "{}: {}",
        "Reminded".color(CliColors::muted()),
        report.reminded.to_string().color(CliColors::info())
    );
    let failed = report.failed.to_string();
    println!(
        "{}: {}",
        "Failed".color(CliColors::muted()),
        if report.failed > 0 {
            failed.color(CliColors::error())
        } else {
            failed.color(CliColors::primary())
        }
    );
    if report.interrupted {
        println!("{}", format_warning("Sweep was interrupted before finishing"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorlink::models::{RelationshipId, UserId};
    use tutorlink::relationships::RemovalFailure;

    #[test]
    fn test_error_response_uses_catalog() {
        let error = TutorlinkError::CapacityExceeded {
            provider_id: UserId::from("tutor"),
            limit: 2,
        };
        let response = error_response(&error);

        assert_eq!(response["code"], "CAPACITY_EXCEEDED");
        assert_eq!(response["http_status"], 409);
        assert_eq!(
            response["remediation"],
            error.metadata().remediation
        );
        assert!(response.get("details").is_none());
    }

    #[test]
    fn test_partial_failure_response_lists_failures() {
        let id = RelationshipId::for_pair(&UserId::from("a"), &UserId::from("b"));
        let error = TutorlinkError::PartialFailure {
            removed: 3,
            failures: vec![RemovalFailure {
                relationship_id: id,
                cause: "store unavailable".to_string(),
            }],
        };
        let response = error_response(&error);

        assert_eq!(response["code"], "PARTIAL_FAILURE");
        assert_eq!(response["details"]["removed"], 3);
        assert_eq!(
            response["details"]["failures"][0]["relationship_id"],
            id.to_string()
        );
    }
}
