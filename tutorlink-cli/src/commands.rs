//! Command enum definitions
//!
//! This module contains all CLI command enums that define the command structure.

use crate::args::*;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Display version information
    Version,

    /// Run diagnostic checks
    #[command(alias = "health")]
    Diagnose,

    /// User account commands
    #[command(subcommand)]
    User(UserCommands),

    /// Subject catalogue commands
    #[command(subcommand)]
    Subject(SubjectCommands),

    /// Relationship lifecycle commands
    #[command(subcommand, alias = "rel")]
    Relationship(RelationshipCommands),

    /// Run one expiry sweep and print its report
    Sweep(SweepArgs),

    /// Run the periodic expiry sweeper until interrupted
    RunSweeper,

    /// Clear all data from storage
    Clear(ClearArgs),
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    #[command(long_about = r#"
Create a user account. Requesters ask providers for relationships; providers
offer a set of subjects and accept at most --capacity relationships at once.

EXAMPLES:
  tutorlink-cli user add student-1 --name "Bob"
  tutorlink-cli user add tutor-1 --name "Ada" --role provider -s math -s physics -c 3
"#)]
    Add(AddUserArgs),

    /// Show a user account
    Get(GetUserArgs),

    /// List user accounts
    List(ListUsersArgs),

    /// Delete a user account
    Delete(DeleteUserArgs),
}

#[derive(Subcommand)]
pub enum SubjectCommands {
    /// Create a subject
    Add(AddSubjectArgs),

    /// Show a subject
    Get(GetSubjectArgs),

    /// List all subjects
    List,
}

#[derive(Subcommand)]
pub enum RelationshipCommands {
    /// Ask a provider for a relationship
    #[command(long_about = r#"
Ask a provider for a relationship covering one or more subjects. Repeating
the request with a different subject set replaces the subjects of the pending
or accepted relationship.

EXAMPLES:
  tutorlink-cli relationship request student-1 tutor-1 -s math
"#)]
    Request(RequestArgs),

    /// Accept a pending relationship
    Accept(RelationshipRefArgs),

    /// Reject a pending relationship
    Reject(RelationshipReasonArgs),

    /// Withdraw a relationship as the requester
    Withdraw(RelationshipRefArgs),

    /// Remove a relationship as the provider
    Remove(RelationshipReasonArgs),

    /// Remove every relationship of a provider
    RemoveAll(RemoveAllArgs),

    /// Show a relationship
    Get(RelationshipRefArgs),

    /// List relationships of a requester or provider
    List(ListRelationshipsArgs),
}
