use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tripline::board::Board;
use tripline::catalog::{DestinationCatalog, OfferCatalog};
use tripline::config::{load_config, TriplineConfig};
use tripline::mock;
use tripline::persist::MockPersistence;
use tripline::presenter::{DraftEdit, Gesture};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripline=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path).map_err(|e| anyhow::anyhow!("{e}"))?,
        None => TriplineConfig::default(),
    };
    info!(?config, "Tripline starting");

    let destination_list = mock::destinations();
    let destination_ids: Vec<_> = destination_list.iter().map(|d| d.id).collect();
    let destinations = Arc::new(DestinationCatalog::new(destination_list));
    let offers = Arc::new(OfferCatalog::new(mock::offers()));

    let seed = mock::waypoints(
        config.board.waypoint_count,
        &destinations,
        &offers,
        &destination_ids,
    );
    let backend = MockPersistence::new(seed)
        .with_latency(Duration::from_millis(config.persistence.latency_ms))
        .with_failure_rate(config.persistence.failure_rate);

    let mut board = Board::new(backend, destinations, offers);
    board.init().await?;
    info!(count = board.visible().len(), "Board initialized");
    println!("{}", board.snapshot());

    // Scripted walk through the editor flow
    let Some(first) = board.visible().first().copied() else {
        return Ok(());
    };

    board.handle_gesture(first, Gesture::OpenEditor).await?;
    board.apply_draft(first, DraftEdit::SetBasePrice(999));
    println!("{}", board.snapshot());

    board.handle_gesture(first, Gesture::Submit).await?;
    println!("{}", board.snapshot());

    board.handle_gesture(first, Gesture::ToggleFavorite).await?;

    // Deterministic failure: the delete attempt shakes the form
    board.handle_gesture(first, Gesture::OpenEditor).await?;
    board.store().backend().fail_next();
    board.handle_gesture(first, Gesture::Delete).await?;
    println!("{}", board.snapshot());

    // Retry succeeds
    board.handle_gesture(first, Gesture::Delete).await?;
    println!("{}", board.snapshot());

    info!(count = board.visible().len(), "Tripline demo finished");
    Ok(())
}
