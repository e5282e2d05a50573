// End-to-end editor flow against the mock persistence backend: open, edit,
// submit, cancel, fail, retry, delete, driven through the public Board API
// the way the binary drives it.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tripline::board::policy::{Filter, SortOrder};
use tripline::board::Board;
use tripline::catalog::{DestinationCatalog, OfferCatalog};
use tripline::mock;
use tripline::model::{Mode, Waypoint, WaypointKind};
use tripline::persist::MockPersistence;
use tripline::presenter::{DraftEdit, Gesture};
use uuid::Uuid;

struct Fixture {
    board: Board<MockPersistence>,
    ids: Vec<Uuid>,
}

async fn fixture(count: usize) -> Fixture {
    let destination_list = mock::destinations();
    let destination_ids: Vec<Uuid> = destination_list.iter().map(|d| d.id).collect();
    let destinations = Arc::new(DestinationCatalog::new(destination_list));
    let offers = Arc::new(OfferCatalog::new(mock::offers()));

    // Deterministic seed: evenly spaced future waypoints, no randomness
    let base = Utc::now() + Duration::hours(1);
    let seed: Vec<Waypoint> = (0..count)
        .map(|index| Waypoint {
            id: Uuid::new_v4(),
            kind: WaypointKind::Taxi,
            date_from: base + Duration::hours(index as i64),
            date_to: base + Duration::hours(index as i64 + 1),
            base_price: 100 + index as u32,
            is_favorite: false,
            destination: destination_ids[index % destination_ids.len()],
            offers: vec![],
        })
        .collect();
    let ids = seed.iter().map(|w| w.id).collect();

    let mut board = Board::new(MockPersistence::new(seed), destinations, offers);
    board.init().await.unwrap();
    Fixture { board, ids }
}

#[tokio::test]
async fn full_edit_cycle_lands_in_the_store() {
    let Fixture { mut board, ids } = fixture(3).await;
    let target = ids[1];

    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    board.apply_draft(target, DraftEdit::SetBasePrice(555));
    board.apply_draft(target, DraftEdit::SetKind(WaypointKind::Flight));
    board.handle_gesture(target, Gesture::Submit).await.unwrap();

    let stored = board.store().find(target).unwrap();
    assert_eq!(stored.base_price, 555);
    assert_eq!(stored.kind, WaypointKind::Flight);
    assert_eq!(board.presenter(target).unwrap().mode(), Mode::Default);
    assert_eq!(board.editing_count(), 0);
}

#[tokio::test]
async fn cancel_discards_the_draft() {
    let Fixture { mut board, ids } = fixture(1).await;
    let target = ids[0];
    let before = board.store().find(target).unwrap().clone();

    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    board.apply_draft(target, DraftEdit::SetBasePrice(1));
    board.handle_gesture(target, Gesture::CloseEditor).await.unwrap();

    assert_eq!(board.store().find(target).unwrap(), &before);

    // Reopening starts from the untouched snapshot
    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    let draft = board
        .presenter(target)
        .unwrap()
        .edit_view()
        .unwrap()
        .draft()
        .clone();
    assert_eq!(draft, before);
}

#[tokio::test]
async fn opening_a_second_editor_closes_the_first() {
    let Fixture { mut board, ids } = fixture(2).await;

    board.handle_gesture(ids[0], Gesture::OpenEditor).await.unwrap();
    board.handle_gesture(ids[1], Gesture::OpenEditor).await.unwrap();

    assert_eq!(board.editing_count(), 1);
    assert_eq!(board.presenter(ids[0]).unwrap().mode(), Mode::Default);
    assert_eq!(board.presenter(ids[1]).unwrap().mode(), Mode::Editing);
}

#[tokio::test]
async fn failed_save_then_retry_succeeds() {
    let Fixture { mut board, ids } = fixture(1).await;
    let target = ids[0];

    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    board.apply_draft(target, DraftEdit::SetBasePrice(777));

    board.store().backend().fail_next();
    board.handle_gesture(target, Gesture::Submit).await.unwrap();

    // Rolled back, editor still open and interactive, draft intact
    assert_ne!(board.store().find(target).unwrap().base_price, 777);
    let presenter = board.presenter(target).unwrap();
    assert_eq!(presenter.mode(), Mode::Editing);
    assert_eq!(presenter.edit_view().unwrap().draft().base_price, 777);

    board.handle_gesture(target, Gesture::Submit).await.unwrap();
    assert_eq!(board.store().find(target).unwrap().base_price, 777);
    assert_eq!(board.editing_count(), 0);
}

#[tokio::test]
async fn delete_removes_the_row_everywhere() {
    let Fixture { mut board, ids } = fixture(2).await;
    let target = ids[0];

    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    board.handle_gesture(target, Gesture::Delete).await.unwrap();

    assert!(board.store().find(target).is_none());
    assert!(board.presenter(target).is_none());
    assert_eq!(board.visible(), &[ids[1]]);
}

#[tokio::test]
async fn filter_and_sort_survive_a_store_mutation() {
    let Fixture { mut board, ids } = fixture(3).await;
    board.set_sort(SortOrder::Price).unwrap();
    board.set_filter(Filter::Future).unwrap();

    // Prices were seeded ascending, so price sort reverses the order
    let reversed: Vec<Uuid> = ids.iter().rev().copied().collect();
    assert_eq!(board.visible(), reversed.as_slice());

    // A price-only edit is a row patch; the order is left alone
    let target = ids[0];
    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    board.apply_draft(target, DraftEdit::SetBasePrice(10_000));
    board.handle_gesture(target, Gesture::Submit).await.unwrap();
    assert_eq!(board.visible(), reversed.as_slice());

    // An interval change recomputes the order, which now leads with the
    // repriced waypoint
    let from = Utc::now() + Duration::hours(24);
    board.handle_gesture(target, Gesture::OpenEditor).await.unwrap();
    board.apply_draft(target, DraftEdit::SetDates(from, from + Duration::hours(1)));
    board.handle_gesture(target, Gesture::Submit).await.unwrap();

    assert_eq!(board.visible().first(), Some(&target));
}

#[tokio::test]
async fn escape_closes_whichever_editor_is_open() {
    let Fixture { mut board, ids } = fixture(2).await;

    board.handle_gesture(ids[1], Gesture::OpenEditor).await.unwrap();
    board.handle_escape().unwrap();
    assert_eq!(board.editing_count(), 0);

    // A second escape with nothing open is harmless
    board.handle_escape().unwrap();
}

#[tokio::test]
async fn snapshot_renders_every_visible_row() {
    let Fixture { board, ids } = fixture(4).await;
    let snapshot = board.snapshot();
    assert!(snapshot.contains("filters:"));
    assert!(snapshot.contains("sort:"));
    assert_eq!(snapshot.matches("Taxi").count(), ids.len());
}
