//! Command argument structures
//!
//! This module contains all CLI argument structs organized by command category.

use clap::{Args, ValueEnum};

/// Capability of a new account
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Can only request relationships
    Requester,
    /// Can only receive requests
    Provider,
    /// Can request and receive
    Both,
}

// User command arguments
#[derive(Args)]
pub struct AddUserArgs {
    /// User ID
    pub id: String,

    /// Display name used in notifications
    #[arg(long, short)]
    pub name: String,

    /// Contact address for notifications
    #[arg(long, short)]
    pub email: Option<String>,

    /// Account capability
    #[arg(long, short, value_enum, default_value = "requester")]
    pub role: RoleArg,

    /// Subject offered by the provider (repeatable)
    #[arg(long = "subject", short = 's')]
    pub subjects: Vec<String>,

    /// Maximum number of accepted relationships for a provider
    #[arg(long, short = 'c')]
    pub capacity: Option<u32>,
}

#[derive(Args)]
pub struct GetUserArgs {
    /// User ID
    pub id: String,
}

#[derive(Args)]
pub struct ListUsersArgs {
    /// Maximum number of results
    #[arg(short, long, default_value_t = 50)]
    pub limit: usize,

    /// Number of users to skip
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

#[derive(Args)]
pub struct DeleteUserArgs {
    /// User ID
    pub id: String,
}

// Subject command arguments
#[derive(Args)]
pub struct AddSubjectArgs {
    /// Subject ID
    pub id: String,

    /// Human readable name
    #[arg(long, short)]
    pub name: String,

    /// Course the subject belongs to
    #[arg(long, short)]
    pub course: String,
}

#[derive(Args)]
pub struct GetSubjectArgs {
    /// Subject ID
    pub id: String,
}

// Relationship command arguments
#[derive(Args)]
pub struct RequestArgs {
    /// Requesting user ID
    pub requester: String,

    /// Provider user ID
    pub provider: String,

    /// Requested subject (repeatable)
    #[arg(long = "subject", short = 's')]
    pub subjects: Vec<String>,
}

#[derive(Args)]
pub struct RelationshipRefArgs {
    /// Relationship ID, or `requester:provider`
    pub id: String,
}

#[derive(Args)]
pub struct RelationshipReasonArgs {
    /// Relationship ID, or `requester:provider`
    pub id: String,

    /// Reason forwarded to the requester
    #[arg(long, short)]
    pub reason: String,
}

#[derive(Args)]
pub struct RemoveAllArgs {
    /// Provider user ID
    pub provider: String,

    /// Reason forwarded to every requester
    #[arg(long, short)]
    pub reason: String,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ListRelationshipsArgs {
    /// List relationships this user requested
    #[arg(long)]
    pub requester: Option<String>,

    /// List relationships this user provides
    #[arg(long)]
    pub provider: Option<String>,
}

// Sweeper command arguments
#[derive(Args)]
pub struct SweepArgs {
    /// Evaluate expiry as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}
