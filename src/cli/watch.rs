use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::planner::{
    payload_storage::PayloadStorage, shutdown::detect_shutdown, store::PlannerStore,
    ticker::RolloverTicker,
};

use super::dashboard::{render_dashboard, Painter};

/// Redraws the dashboard on every tick until ctrl-c. Changes made by other `planner` invocations
/// are picked up on the next tick.
pub async fn watch<S: PayloadStorage>(
    store: &mut PlannerStore<S>,
    interval: Duration,
    painter: Painter,
) -> Result<()> {
    let shutdown = store.shutdown_token();
    let ticker = RolloverTicker::for_store(store, interval);
    info!("Watching with a {interval:?} interval");

    let (_, result) = tokio::join!(
        detect_shutdown(shutdown),
        ticker.run(store, |store| {
            if painter.is_ansi() {
                // Clear the screen and move the cursor home.
                print!("\x1B[2J\x1B[H");
            } else {
                println!("----");
            }
            print!("{}", render_dashboard(store, &painter));
        }),
    );
    result
}
