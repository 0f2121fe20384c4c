use crate::args::{AddUserArgs, RoleArg};
use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use tutorlink::TutorlinkError;
use tutorlink::models::{ProviderProfile, RelationshipId, Role, SubjectId, User, UserId};

/// Accept either a relationship UUID or a `requester:provider` pair
pub fn resolve_relationship_id(reference: &str) -> tutorlink::Result<RelationshipId> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(TutorlinkError::MissingArguments("relationship_id".to_string()));
    }

    if let Ok(id) = reference.parse::<RelationshipId>() {
        return Ok(id);
    }

    match reference.split_once(':') {
        Some((requester, provider)) if !requester.is_empty() && !provider.is_empty() => Ok(
            RelationshipId::for_pair(&UserId::from(requester), &UserId::from(provider)),
        ),
        _ => Err(TutorlinkError::NotFound(format!(
            "relationship '{}' (expected a UUID or requester:provider)",
            reference
        ))),
    }
}

/// Build the user described by `user add` arguments
pub fn build_user(args: &AddUserArgs) -> tutorlink::Result<User> {
    let role = match args.role {
        RoleArg::Requester => {
            if !args.subjects.is_empty() || args.capacity.is_some() {
                tracing::warn!(user_id = %args.id, "Ignoring provider options for a requester");
            }
            Role::RequesterOnly
        }
        RoleArg::Provider => Role::ProviderOnly {
            profile: provider_profile(args)?,
        },
        RoleArg::Both => Role::Both {
            profile: provider_profile(args)?,
        },
    };

    let user = User {
        id: UserId::from(args.id.trim()),
        name: args.name.clone(),
        email: args.email.clone(),
        role,
    };
    if user.id.is_blank() {
        return Err(TutorlinkError::MissingArguments("id".to_string()));
    }
    Ok(user)
}

fn provider_profile(args: &AddUserArgs) -> tutorlink::Result<ProviderProfile> {
    let subjects: Vec<SubjectId> = args
        .subjects
        .iter()
        .map(|s| SubjectId::from(s.trim()))
        .filter(|s| !s.is_blank())
        .collect();
    let capacity = args.capacity.and_then(NonZeroU32::new);

    match (subjects.is_empty(), capacity) {
        (false, Some(capacity)) => Ok(ProviderProfile::new(subjects, capacity)),
        (true, None) => Err(TutorlinkError::MissingArguments("subject, capacity".to_string())),
        (true, Some(_)) => Err(TutorlinkError::MissingArguments("subject".to_string())),
        (false, None) => Err(TutorlinkError::MissingArguments("capacity".to_string())),
    }
}

/// Parse an optional RFC 3339 instant, defaulting to now
pub fn parse_instant(value: Option<&str>) -> tutorlink::Result<DateTime<Utc>> {
    match value {
        None => Ok(Utc::now()),
        Some(value) => DateTime::parse_from_rfc3339(value.trim())
            .map(|instant| instant.with_timezone(&Utc))
            .map_err(|e| TutorlinkError::Other(format!("Invalid instant '{}': {}", value, e))),
    }
}
