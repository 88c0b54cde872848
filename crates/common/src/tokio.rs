use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Run job until it ends or token is cancelled
pub async fn spawn_with_token<R>(
    name: &'static str,
    token: CancellationToken,
    f: impl Future<Output = R>,
) {
    tokio::select! {
        _ = token.cancelled() => log::debug!("job {name} cancelled"),
        _ = f => log::debug!("job {name} finished"),
    }
}
