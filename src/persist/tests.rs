use super::*;
use crate::model::WaypointKind;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

fn sample_waypoint() -> Waypoint {
    Waypoint {
        id: Uuid::new_v4(),
        kind: WaypointKind::Bus,
        date_from: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
        date_to: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        base_price: 35,
        is_favorite: false,
        destination: Uuid::new_v4(),
        offers: vec![],
    }
}

#[tokio::test]
async fn load_returns_seeded_collection() {
    let waypoint = sample_waypoint();
    let backend = MockPersistence::new(vec![waypoint.clone()]);

    let loaded = backend.load().await.unwrap();
    assert_eq!(loaded, vec![waypoint]);
}

#[tokio::test]
async fn apply_echoes_the_accepted_snapshot() {
    let waypoint = sample_waypoint();
    let backend = MockPersistence::new(vec![waypoint.clone()]);

    let updated = waypoint.with_base_price(99);
    let echo = backend.apply(UserAction::Update, &updated).await.unwrap();
    assert_eq!(echo, updated);

    let loaded = backend.load().await.unwrap();
    assert_eq!(loaded[0].base_price, 99);
}

#[tokio::test]
async fn update_of_unknown_waypoint_is_rejected() {
    let backend = MockPersistence::new(vec![]);
    let result = backend.apply(UserAction::Update, &sample_waypoint()).await;
    assert!(matches!(result, Err(PersistenceError::Rejected(_))));
}

#[tokio::test]
async fn remove_drops_from_journal() {
    let waypoint = sample_waypoint();
    let backend = MockPersistence::new(vec![waypoint.clone()]);

    backend.apply(UserAction::Remove, &waypoint).await.unwrap();
    assert!(backend.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn fail_next_fails_exactly_once() {
    let waypoint = sample_waypoint();
    let backend = MockPersistence::new(vec![waypoint.clone()]);
    backend.fail_next();

    let first = backend.apply(UserAction::Update, &waypoint).await;
    assert_eq!(first, Err(PersistenceError::Unavailable));

    // Journal untouched by the failed attempt
    assert_eq!(backend.load().await.unwrap(), vec![waypoint.clone()]);

    let second = backend.apply(UserAction::Update, &waypoint).await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn failure_rate_of_one_always_fails() {
    let waypoint = sample_waypoint();
    let backend = MockPersistence::new(vec![waypoint.clone()]).with_failure_rate(1.0);

    for _ in 0..5 {
        let result = backend.apply(UserAction::Update, &waypoint).await;
        assert_eq!(result, Err(PersistenceError::Unavailable));
    }
}
