//! Drives submitted turns concurrently

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use super::{ChatSession, Entry, PendingTurn, RelayClient, TurnId};

/// Called once per turn with its resolved transcript entry
pub type OnResolved = Arc<dyn Fn(TurnId, &Entry) + Send + Sync>;

/// Sends each turn on its own task without waiting for earlier ones.
///
/// Finished tasks are reaped on every submission, so only turns still in flight
/// are held.
pub struct TurnRunner {
    client: Arc<RelayClient>,
    session: Arc<Mutex<ChatSession>>,
    on_resolved: OnResolved,
    tasks: JoinSet<()>,
}

impl TurnRunner {
    pub fn new(client: RelayClient, on_resolved: OnResolved) -> Self {
        Self {
            client: Arc::new(client),
            session: Arc::new(Mutex::new(ChatSession::new())),
            on_resolved,
            tasks: JoinSet::new(),
        }
    }

    /// Record a turn and start sending it. `None` for blank input.
    pub async fn submit(&mut self, text: &str) -> Option<PendingTurn> {
        self.reap();

        let turn = self.session.lock().await.submit_turn(text)?;

        let client = self.client.clone();
        let session = self.session.clone();
        let on_resolved = self.on_resolved.clone();
        let id = turn.id;
        let request = turn.request.clone();

        self.tasks.spawn(async move {
            let outcome = client.send(&request).await;
            if let Err(e) = &outcome {
                tracing::warn!(turn = %id, error = %e, "Turn failed");
            }

            let mut session = session.lock().await;
            if let Some(entry) = session.resolve(id, outcome) {
                on_resolved(id, entry);
            }
        });

        Some(turn)
    }

    /// Drop tasks that have already finished
    pub fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(e) = result {
                tracing::error!(error = %e, "Turn task panicked");
            }
        }
    }

    /// Number of task handles currently held
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn session(&self) -> Arc<Mutex<ChatSession>> {
        self.session.clone()
    }

    /// Wait for every outstanding turn
    pub async fn finish(mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Turn task panicked");
            }
        }
    }
}
