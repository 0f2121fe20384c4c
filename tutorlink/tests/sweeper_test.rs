//! Expiry sweeper against a wired engine

mod common;

use chrono::{Duration, Utc};
use common::{TestEngine, subjects};
use std::collections::BTreeSet;
use tutorlink::prelude::*;

#[tokio::test]
async fn test_pending_request_reminded_then_expired() {
    let t = TestEngine::new().await;
    let student = t.add_requester("student").await;
    let tutor = t.add_provider("tutor", &["math"], 1).await;

    t.service()
        .request_relationship(&student, &tutor, subjects(&["math"]))
        .await
        .unwrap();
    let id = RelationshipId::for_pair(&student, &tutor);
    let created = t.service().get_relationship(&id).await.unwrap().created_on;
    t.settle().await;
    t.notifier.clear();

    // T+5d: still inside the 5.5 day window
    let report = t
        .engine
        .sweeper()
        .sweep_once(created + Duration::days(5))
        .await
        .unwrap();
    assert_eq!(report.expired, 0);
    assert_eq!(report.reminded, 1);
    assert!(t.service().get_relationship(&id).await.is_ok());

    // T+6d: past the window
    let report = t
        .engine
        .sweeper()
        .sweep_once(created + Duration::days(6))
        .await
        .unwrap();
    assert_eq!(report.expired, 1);
    assert_eq!(report.failed, 0);
    assert!(t.service().get_relationship(&id).await.is_err());

    t.settle().await;
    let reminder = &t.notifier.of_kind(NotificationKind::ExpiryReminder)[0];
    assert!(reminder.is_addressed_to(&tutor));
    assert!(!reminder.is_addressed_to(&student));

    let expired = t.notifier.of_kind(NotificationKind::Expired);
    assert_eq!(expired.len(), 1);
    assert!(expired[0].is_addressed_to(&student));
    assert!(expired[0].is_addressed_to(&tutor));
}

#[tokio::test]
async fn test_sweep_only_touches_stale_pending_records() {
    let t = TestEngine::new().await;
    let tutor = t.add_provider("tutor", &["math"], 5).await;
    let now = Utc::now();

    let mut stale = Vec::new();
    for (name, age_days, accepted) in [
        ("old-pending", 10, false),
        ("older-pending", 8, false),
        ("old-accepted", 10, true),
        ("fresh-pending", 1, false),
    ] {
        let student = t.add_requester(name).await;
        let mut relationship = Relationship::pending_at(
            student.clone(),
            tutor.clone(),
            BTreeSet::from([SubjectId::from("math")]),
            now - Duration::days(age_days),
        );
        if accepted {
            relationship.status = RelationshipStatus::Accepted;
        }
        t.engine
            .store()
            .insert_relationship(relationship)
            .await
            .unwrap();
        if !accepted && age_days > 5 {
            stale.push(RelationshipId::for_pair(&student, &tutor));
        }
    }

    let report = t.engine.sweeper().sweep_once(now).await.unwrap();
    assert_eq!(report.expired, 2);
    assert_eq!(report.reminded, 1);
    assert!(!report.interrupted);

    for id in stale {
        assert!(t.engine.store().get_relationship(&id).await.unwrap().is_none());
    }
    assert_eq!(t.relationship_count().await, 2);
    assert_eq!(t.accepted_count(&tutor).await, 1);
}
