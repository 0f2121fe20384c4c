//! Integration tests for the Tutorlink CLI
//!
//! Each test runs the command handlers against an isolated on-disk store in a
//! temporary directory.

use chrono::{Duration, Utc};
use tempfile::TempDir;
use tutorlink::TutorlinkError;
use tutorlink::error_codes::ErrorCode;
use tutorlink::models::{RelationshipId, RelationshipStatus, UserId};
use tutorlink_cli::args::*;
use tutorlink_cli::commands::{Commands, RelationshipCommands, UserCommands};
use tutorlink_cli::{ContextOptions, TutorlinkCliContext, execute};

/// Helper to create an isolated test CLI context
async fn create_test_context() -> (TutorlinkCliContext, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let options = ContextOptions {
        data_dir: Some(temp_dir.path().to_string_lossy().to_string()),
        config_file: None,
        memory: false,
    };
    let ctx = TutorlinkCliContext::new(options)
        .await
        .expect("Failed to initialize Tutorlink");
    (ctx, temp_dir)
}

fn add_user(id: &str, role: RoleArg, subjects: &[&str], capacity: Option<u32>) -> Commands {
    Commands::User(UserCommands::Add(AddUserArgs {
        id: id.to_string(),
        name: id.to_uppercase(),
        email: Some(format!("{}@example.org", id)),
        role,
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
        capacity,
    }))
}

fn request(requester: &str, provider: &str, subjects: &[&str]) -> Commands {
    Commands::Relationship(RelationshipCommands::Request(RequestArgs {
        requester: requester.to_string(),
        provider: provider.to_string(),
        subjects: subjects.iter().map(|s| s.to_string()).collect(),
    }))
}

fn accept(reference: &str) -> Commands {
    Commands::Relationship(RelationshipCommands::Accept(RelationshipRefArgs {
        id: reference.to_string(),
    }))
}

async fn seed(ctx: &TutorlinkCliContext) {
    for command in [
        add_user("student", RoleArg::Requester, &[], None),
        add_user("student-2", RoleArg::Requester, &[], None),
        add_user("tutor", RoleArg::Provider, &["math", "physics"], Some(1)),
    ] {
        execute(command, ctx, "json").await.unwrap();
    }
}

#[tokio::test]
async fn test_request_and_accept_by_pair_reference() {
    let (ctx, temp_dir) = create_test_context().await;
    seed(&ctx).await;

    execute(request("student", "tutor", &["math"]), &ctx, "table")
        .await
        .unwrap();
    execute(accept("student:tutor"), &ctx, "table").await.unwrap();

    let summaries = ctx
        .service()
        .list_for_provider(&UserId::from("tutor"))
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].status, RelationshipStatus::Accepted);
    assert_eq!(summaries[0].counterpart.name, "STUDENT");

    assert!(temp_dir.path().join("db").exists());
    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_capacity_error_carries_catalog_code() {
    let (ctx, _temp_dir) = create_test_context().await;
    seed(&ctx).await;

    execute(request("student", "tutor", &["math"]), &ctx, "json")
        .await
        .unwrap();
    execute(request("student-2", "tutor", &["physics"]), &ctx, "json")
        .await
        .unwrap();
    execute(accept("student:tutor"), &ctx, "json").await.unwrap();

    let err = execute(accept("student-2:tutor"), &ctx, "json")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CapacityExceeded);

    let response = tutorlink_cli::error_response(&err);
    assert_eq!(response["code"], "CAPACITY_EXCEEDED");
    assert_eq!(response["http_status"], 409);
    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let (ctx, _temp_dir) = create_test_context().await;
    seed(&ctx).await;
    execute(request("student", "tutor", &["math"]), &ctx, "json")
        .await
        .unwrap();

    let blank = Commands::Relationship(RelationshipCommands::Reject(RelationshipReasonArgs {
        id: "student:tutor".to_string(),
        reason: "   ".to_string(),
    }));
    let err = execute(blank, &ctx, "json").await.unwrap_err();
    assert!(matches!(err, TutorlinkError::MissingArguments(_)));

    let id = RelationshipId::for_pair(&UserId::from("student"), &UserId::from("tutor"));
    let reject = Commands::Relationship(RelationshipCommands::Reject(RelationshipReasonArgs {
        id: id.to_string(),
        reason: "Fully booked this term".to_string(),
    }));
    execute(reject, &ctx, "json").await.unwrap();

    assert!(ctx.store().get_relationship(&id).await.unwrap().is_none());
    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_sweep_at_future_instant_expires_pending() {
    let (ctx, _temp_dir) = create_test_context().await;
    seed(&ctx).await;
    execute(request("student", "tutor", &["math"]), &ctx, "json")
        .await
        .unwrap();

    let at = (Utc::now() + Duration::days(6)).to_rfc3339();
    execute(Commands::Sweep(SweepArgs { at: Some(at) }), &ctx, "table")
        .await
        .unwrap();

    let remaining = ctx
        .service()
        .list_for_requester(&UserId::from("student"))
        .await
        .unwrap();
    assert!(remaining.is_empty());
    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_remove_all_through_cli() {
    let (ctx, _temp_dir) = create_test_context().await;
    seed(&ctx).await;
    execute(request("student", "tutor", &["math"]), &ctx, "json")
        .await
        .unwrap();
    execute(request("student-2", "tutor", &["physics"]), &ctx, "json")
        .await
        .unwrap();

    let remove_all = Commands::Relationship(RelationshipCommands::RemoveAll(RemoveAllArgs {
        provider: "tutor".to_string(),
        reason: "Leaving the programme".to_string(),
    }));
    execute(remove_all, &ctx, "json").await.unwrap();

    assert!(
        ctx.service()
            .list_for_provider(&UserId::from("tutor"))
            .await
            .unwrap()
            .is_empty()
    );
    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_user_errors() {
    let (ctx, _temp_dir) = create_test_context().await;

    let err = execute(
        add_user("tutor", RoleArg::Provider, &[], Some(2)),
        &ctx,
        "json",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TutorlinkError::MissingArguments(_)));

    let err = execute(
        Commands::User(UserCommands::Get(GetUserArgs {
            id: "ghost".to_string(),
        })),
        &ctx,
        "json",
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);

    let err = execute(
        Commands::Relationship(RelationshipCommands::List(ListRelationshipsArgs {
            requester: None,
            provider: None,
        })),
        &ctx,
        "json",
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TutorlinkError::MissingArguments(_)));
    ctx.engine.shutdown().await;
}

#[tokio::test]
async fn test_clear_without_prompt() {
    let (ctx, _temp_dir) = create_test_context().await;
    seed(&ctx).await;

    execute(Commands::Clear(ClearArgs { yes: true }), &ctx, "json")
        .await
        .unwrap();

    assert!(ctx.store().list_users(None, None).await.unwrap().is_empty());
    ctx.engine.shutdown().await;
}
