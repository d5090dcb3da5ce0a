use tokio::select;
use tokio_util::sync::CancellationToken;

/// Waits for a termination signal and cancels the given token. Detached
/// processes on Windows don't receive console signals, there the daemon is
/// stopped by killing the process instead.
pub async fn detect_shutdown(cancelation: CancellationToken) {
    select! {
        _ = tokio::signal::ctrl_c() => {
            cancelation.cancel();
        },
    };
}
