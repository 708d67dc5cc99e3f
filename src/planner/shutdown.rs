use tokio::select;
use tokio_util::sync::CancellationToken;

/// Cancels `cancelation` on ctrl-c. Returns early when the token gets cancelled some other way,
/// so joining on it never outlives the work it guards.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
        _ = cancelation.cancelled() => (),
    };
}
