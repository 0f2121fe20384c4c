//! Capacity limits under request-time and accept-time checks, and under
//! concurrent accepts

mod common;

use common::{TestEngine, subjects};
use tutorlink::prelude::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_accepts_never_exceed_limit() {
    let t = TestEngine::new().await;
    let tutor = t.add_provider("tutor", &["math"], 2).await;

    let mut ids = Vec::new();
    for i in 0..10 {
        let student = t.add_requester(&format!("student-{}", i)).await;
        t.service()
            .request_relationship(&student, &tutor, subjects(&["math"]))
            .await
            .expect("request failed");
        ids.push(RelationshipId::for_pair(&student, &tutor));
    }

    let mut tasks = Vec::new();
    for id in ids {
        let service = t.service().clone();
        tasks.push(tokio::spawn(
            async move { service.accept_relationship(&id).await },
        ));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.expect("accept task panicked") {
            Ok(()) => accepted += 1,
            Err(TutorlinkError::CapacityExceeded { limit, .. }) => {
                assert_eq!(limit, 2);
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(accepted, 2);
    assert_eq!(rejected, 8);
    assert_eq!(t.accepted_count(&tutor).await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_and_accepts_on_full_provider() {
    let t = TestEngine::new().await;
    let tutor = t.add_provider("tutor", &["math"], 1).await;
    let first = t.add_requester("first").await;
    let second = t.add_requester("second").await;

    for student in [&first, &second] {
        t.service()
            .request_relationship(student, &tutor, subjects(&["math"]))
            .await
            .unwrap();
    }

    let a = {
        let service = t.service().clone();
        let id = RelationshipId::for_pair(&first, &tutor);
        tokio::spawn(async move { service.accept_relationship(&id).await })
    };
    let b = {
        let service = t.service().clone();
        let id = RelationshipId::for_pair(&second, &tutor);
        tokio::spawn(async move { service.accept_relationship(&id).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(t.accepted_count(&tutor).await, 1);
}

/// Two providers with a limit of one each and two requesters. Request-time
/// and accept-time checks are exercised separately.
#[tokio::test]
async fn test_request_time_and_accept_time_checks() {
    let t = TestEngine::new().await;
    let p1 = t.add_provider("provider-1", &["math"], 1).await;
    let p2 = t.add_provider("provider-2", &["math"], 1).await;
    let r1 = t.add_requester("requester-1").await;
    let r2 = t.add_requester("requester-2").await;

    // Accept-time: both requests to p1 are admitted while p1 is empty,
    // the second accept finds p1 full
    t.service()
        .request_relationship(&r1, &p1, subjects(&["math"]))
        .await
        .unwrap();
    t.service()
        .request_relationship(&r2, &p1, subjects(&["math"]))
        .await
        .unwrap();
    t.service()
        .accept_relationship(&RelationshipId::for_pair(&r1, &p1))
        .await
        .unwrap();
    let err = t
        .service()
        .accept_relationship(&RelationshipId::for_pair(&r2, &p1))
        .await
        .unwrap_err();
    assert!(matches!(err, TutorlinkError::CapacityExceeded { ref provider_id, limit: 1 } if provider_id == &p1));
    assert_eq!(err.metadata().http_status, 409);

    // The losing request stays pending
    let pending = t
        .service()
        .get_relationship(&RelationshipId::for_pair(&r2, &p1))
        .await
        .unwrap();
    assert!(pending.is_pending());

    // Request-time: once p2 is full, a new request to p2 is refused outright
    t.service()
        .request_relationship(&r1, &p2, subjects(&["math"]))
        .await
        .unwrap();
    t.service()
        .accept_relationship(&RelationshipId::for_pair(&r1, &p2))
        .await
        .unwrap();
    let err = t
        .service()
        .request_relationship(&r2, &p2, subjects(&["math"]))
        .await
        .unwrap_err();
    assert!(matches!(err, TutorlinkError::CapacityExceeded { .. }));
    assert!(
        t.engine
            .store()
            .get_relationship_by_pair(&r2, &p2)
            .await
            .unwrap()
            .is_none()
    );

    // Freeing a slot makes room again
    t.service()
        .withdraw_relationship(&RelationshipId::for_pair(&r1, &p2))
        .await
        .unwrap();
    t.service()
        .request_relationship(&r2, &p2, subjects(&["math"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_provider_that_lost_capability_cannot_accept() {
    let t = TestEngine::new().await;
    let tutor = t.add_provider("tutor", &["math"], 3).await;
    let student = t.add_requester("student").await;

    t.service()
        .request_relationship(&student, &tutor, subjects(&["math"]))
        .await
        .unwrap();

    let mut user = t.engine.store().get_user(&tutor).await.unwrap().unwrap();
    user.role = Role::RequesterOnly;
    t.engine.store().update_user(user).await.unwrap();

    let err = t
        .service()
        .accept_relationship(&RelationshipId::for_pair(&student, &tutor))
        .await
        .unwrap_err();
    assert!(matches!(err, TutorlinkError::CapacityExceeded { limit: 0, .. }));
}
