//! Structural validation of relationship requests

use crate::models::{SubjectId, UserId};
use crate::{Result, TutorlinkError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Relationship request as received at a boundary, before validation.
///
/// Every field is optional so that a missing field surfaces as
/// `MissingArguments` rather than as a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipRequestInput {
    pub requester_id: Option<String>,
    pub provider_id: Option<String>,
    pub subject_ids: Option<Vec<String>>,
}

/// A request that passed structural validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub requester_id: UserId,
    pub provider_id: UserId,
    pub subjects: BTreeSet<SubjectId>,
}

impl RelationshipRequestInput {
    pub fn new(
        requester_id: impl Into<String>,
        provider_id: impl Into<String>,
        subject_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            requester_id: Some(requester_id.into()),
            provider_id: Some(provider_id.into()),
            subject_ids: Some(subject_ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn validate(self) -> Result<ValidatedRequest> {
        let requester_id = UserId::new(self.requester_id.unwrap_or_default());
        let provider_id = UserId::new(self.provider_id.unwrap_or_default());
        let subjects = self
            .subject_ids
            .unwrap_or_default()
            .into_iter()
            .map(SubjectId::new);

        let subjects = validate_request(&requester_id, &provider_id, subjects)?;
        Ok(ValidatedRequest {
            requester_id,
            provider_id,
            subjects,
        })
    }
}

/// Check the arguments of a relationship request.
///
/// Returns the requested subjects collapsed into a set. Blank subject ids count
/// as missing. Two equal non-blank ids fail with `SameParty` before the
/// subjects are looked at.
pub fn validate_request(
    requester_id: &UserId,
    provider_id: &UserId,
    subject_ids: impl IntoIterator<Item = SubjectId>,
) -> Result<BTreeSet<SubjectId>> {
    let subjects: BTreeSet<SubjectId> = subject_ids.into_iter().collect();

    let mut missing = Vec::new();
    if requester_id.is_blank() {
        missing.push("requester_id");
    }
    if provider_id.is_blank() {
        missing.push("provider_id");
    }

    // A self-request fails the same way whatever subjects it names
    if missing.is_empty() && requester_id == provider_id {
        return Err(TutorlinkError::SameParty);
    }

    if subjects.is_empty() || subjects.iter().any(SubjectId::is_blank) {
        missing.push("subject_ids");
    }
    if !missing.is_empty() {
        return Err(TutorlinkError::MissingArguments(missing.join(", ")));
    }

    Ok(subjects)
}

/// Require a non-blank free-text reason. Returns it trimmed.
pub fn validate_reason(reason: &str) -> Result<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(TutorlinkError::MissingArguments("reason".to_string()));
    }
    Ok(reason)
}

/// Require a non-blank user id
pub fn require_user_id(user_id: &UserId, field: &str) -> Result<()> {
    if user_id.is_blank() {
        return Err(TutorlinkError::MissingArguments(field.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(ids: &[&str]) -> Vec<SubjectId> {
        ids.iter().map(|s| SubjectId::from(*s)).collect()
    }

    #[test]
    fn test_valid_request_collapses_duplicates() {
        let set = validate_request(
            &UserId::from("student"),
            &UserId::from("tutor"),
            subjects(&["math", "physics", "math"]),
        )
        .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_missing_arguments_are_listed() {
        let err = validate_request(&UserId::from(""), &UserId::from("tutor"), Vec::new())
            .unwrap_err();
        match err {
            TutorlinkError::MissingArguments(fields) => {
                assert_eq!(fields, "requester_id, subject_ids");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_subject_is_missing() {
        let err = validate_request(
            &UserId::from("student"),
            &UserId::from("tutor"),
            subjects(&["math", "  "]),
        )
        .unwrap_err();
        assert!(matches!(err, TutorlinkError::MissingArguments(_)));
    }

    #[test]
    fn test_same_party() {
        let err = validate_request(
            &UserId::from("alice"),
            &UserId::from("alice"),
            subjects(&["math"]),
        )
        .unwrap_err();
        assert!(matches!(err, TutorlinkError::SameParty));
    }

    #[test]
    fn test_same_party_regardless_of_subjects() {
        let alice = UserId::from("alice");
        for requested in [Vec::new(), subjects(&["  "]), subjects(&["math", "art"])] {
            let err = validate_request(&alice, &alice, requested).unwrap_err();
            assert!(matches!(err, TutorlinkError::SameParty));
        }
    }

    #[test]
    fn test_missing_arguments_checked_before_same_party() {
        let err = validate_request(&UserId::from(" "), &UserId::from(" "), Vec::new()).unwrap_err();
        assert!(matches!(err, TutorlinkError::MissingArguments(_)));
    }

    #[test]
    fn test_input_from_json() {
        let input: RelationshipRequestInput =
            serde_json::from_str(r#"{"requester_id": "student", "subject_ids": ["math"]}"#)
                .unwrap();
        let err = input.validate().unwrap_err();
        assert!(matches!(err, TutorlinkError::MissingArguments(f) if f == "provider_id"));

        let ok = RelationshipRequestInput::new("student", "tutor", ["math", "math"])
            .validate()
            .unwrap();
        assert_eq!(ok.provider_id, UserId::from("tutor"));
        assert_eq!(ok.subjects.len(), 1);
    }

    #[test]
    fn test_reason() {
        assert_eq!(validate_reason("  no slots left ").unwrap(), "no slots left");
        assert!(validate_reason("   ").is_err());
    }
}
