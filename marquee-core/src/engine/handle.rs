//! Cloneable front door to the search engine actor.

use tokio::sync::{mpsc, oneshot};

use super::commands::{SearchCommand, UiState};
use crate::MarqueeError;

/// Async surface a presentation layer holds to drive the search engine.
///
/// Every method is a command round-trip to the actor task. Clones share the
/// one command channel and can live on any thread; a presentation surface
/// holds a handle and owns nothing else of the engine.
#[derive(Clone)]
pub struct SearchHandle {
    sender: mpsc::Sender<SearchCommand>,
}

impl SearchHandle {
    /// Wraps the actor's command sender.
    pub fn new(sender: mpsc::Sender<SearchCommand>) -> Self {
        Self { sender }
    }

    /// Updates the query text.
    ///
    /// Every call restarts the debounce timer; a catalog fetch runs once the
    /// text has been quiet for the configured period. The text is used
    /// exactly as given, with no trimming or case normalization.
    ///
    /// # Errors
    /// - `MarqueeError::EngineShutdown` - The engine actor has stopped
    pub async fn set_query(&self, query: &str) -> Result<(), MarqueeError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SearchCommand::SetQuery {
            query: query.to_string(),
            responder,
        };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| MarqueeError::EngineShutdown)?;

        rx.await.map_err(|_| MarqueeError::EngineShutdown)
    }

    /// Reads a snapshot of the current UI state.
    ///
    /// The snapshot is a clone taken on the actor task, so it is always
    /// internally consistent: results, loading flag, and error all describe
    /// the same moment.
    ///
    /// # Errors
    /// - `MarqueeError::EngineShutdown` - The engine actor has stopped
    pub async fn snapshot(&self) -> Result<UiState, MarqueeError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SearchCommand::Snapshot { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| MarqueeError::EngineShutdown)?;

        rx.await.map_err(|_| MarqueeError::EngineShutdown)
    }

    /// Stops the engine actor.
    ///
    /// After this resolves, every further operation on any clone of the
    /// handle returns `MarqueeError::EngineShutdown`.
    ///
    /// # Errors
    /// - `MarqueeError::EngineShutdown` - The engine actor had already stopped
    pub async fn shutdown(&self) -> Result<(), MarqueeError> {
        let (responder, rx) = oneshot::channel();
        let cmd = SearchCommand::Shutdown { responder };

        self.sender
            .send(cmd)
            .await
            .map_err(|_| MarqueeError::EngineShutdown)?;

        rx.await.map_err(|_| MarqueeError::EngineShutdown)
    }

    /// True while the actor is alive and accepting commands.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}
