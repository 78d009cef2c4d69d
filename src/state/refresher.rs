use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-polls today's league schedule and the focus club's game on separate
/// cadences. Rankings are only reloaded on demand.
pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
    today_every: Duration,
    focus_every: Duration,
}

impl PeriodicRefresher {
    pub fn new(
        network_requests: mpsc::Sender<NetworkRequest>,
        today_every: Duration,
        focus_every: Duration,
    ) -> Self {
        Self { network_requests, today_every, focus_every }
    }

    pub async fn run(self) {
        let mut today_interval = interval(self.today_every);
        let mut focus_interval = interval(self.focus_every);
        // Skip the immediate first ticks so startup loading isn't double-triggered.
        today_interval.tick().await;
        focus_interval.tick().await;

        loop {
            let request = tokio::select! {
                _ = today_interval.tick() => NetworkRequest::RefreshToday,
                _ = focus_interval.tick() => NetworkRequest::RefreshFocus,
            };
            if self.network_requests.send(request).await.is_err() {
                break;
            }
        }
    }
}
