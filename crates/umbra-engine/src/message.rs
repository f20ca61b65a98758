//! Typed message vocabulary and the serving loop.
//!
//! Commands and replies serialize as `{"type": ..., "data": ...}` objects:
//!
//! ```rust
//! use umbra_engine::Command;
//!
//! let cmd: Command = serde_json::from_str(
//!     r##"{"type": "UPDATE_COLOR", "data": {"original": "#fff", "new": "#222"}}"##,
//! ).unwrap();
//! assert_eq!(cmd, Command::UpdateColor { original: "#fff".into(), replacement: "#222".into() });
//!
//! let cmd: Command = serde_json::from_str(r#"{"type": "EXTRACT_COLORS"}"#).unwrap();
//! assert_eq!(cmd, Command::ExtractColors);
//! ```
//!
//! [`serve`] drains an inbox of [`Envelope`]s strictly in arrival order, so
//! every command runs to completion before the next starts. [`EngineHandle`]
//! is the client side.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use umbra_render::ColorMappings;

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::page::{ColorSource, StyleHost};
use crate::sampling::ColorCount;

/// A request to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Sample the page's rendered colors.
    ExtractColors,

    /// Enable or disable dark mode with a full mapping table.
    Apply {
        enabled: bool,
        #[serde(rename = "colorMappings", default)]
        color_mappings: ColorMappings,
    },

    /// Merge one mapping entry.
    UpdateColor {
        original: String,
        #[serde(rename = "new")]
        replacement: String,
    },
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::ExtractColors => "EXTRACT_COLORS",
            Command::Apply { .. } => "APPLY",
            Command::UpdateColor { .. } => "UPDATE_COLOR",
        }
    }
}

/// The engine's answer to one [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reply {
    Colors(Vec<ColorCount>),
    Applied { success: bool },
    Updated { success: bool },
}

impl Reply {
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Colors(_) => "COLORS",
            Reply::Applied { .. } => "APPLIED",
            Reply::Updated { .. } => "UPDATED",
        }
    }
}

/// A command paired with the channel its reply goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub command: Command,
    pub reply: oneshot::Sender<Reply>,
}

impl<P: ColorSource + StyleHost> Engine<P> {
    /// Runs one command against the engine.
    pub async fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::ExtractColors => Reply::Colors(self.extract_colors().await),
            Command::Apply {
                enabled,
                color_mappings,
            } => Reply::Applied {
                success: self.apply(enabled, color_mappings),
            },
            Command::UpdateColor {
                original,
                replacement,
            } => Reply::Updated {
                success: self.update_color_mapping(&original, &replacement),
            },
        }
    }
}

/// Serves `inbox` until every sender is dropped, then hands the engine back.
pub async fn serve<P>(mut engine: Engine<P>, mut inbox: mpsc::UnboundedReceiver<Envelope>) -> Engine<P>
where
    P: ColorSource + StyleHost,
{
    info!("engine serving");
    while let Some(Envelope { command, reply }) = inbox.recv().await {
        let kind = command.kind();
        debug!(kind, "handling command");
        let response = engine.handle(command).await;
        if reply.send(response).is_err() {
            debug!(kind, "requester went away before the reply");
        }
    }
    info!("engine inbox closed");
    engine
}

/// Client side of a serving engine.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: mpsc::UnboundedSender<Envelope>,
}

impl EngineHandle {
    /// Creates a handle and the inbox to pass to [`serve`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Envelope>) {
        let (sender, inbox) = mpsc::unbounded_channel();
        (Self { sender }, inbox)
    }

    /// Spawns [`serve`] for `engine` on the current runtime.
    ///
    /// The task finishes, returning the engine, once every handle is dropped.
    pub fn spawn<P>(engine: Engine<P>) -> (Self, JoinHandle<Engine<P>>)
    where
        P: ColorSource + StyleHost + Send + Sync + 'static,
        P::Element: Send + Sync,
    {
        let (handle, inbox) = Self::channel();
        let task = tokio::spawn(serve(engine, inbox));
        (handle, task)
    }

    /// Sends `command` and waits for its reply.
    pub async fn request(&self, command: Command) -> Result<Reply> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(Envelope { command, reply })
            .map_err(|_| EngineError::Disconnected)?;
        response.await.map_err(|_| EngineError::Disconnected)
    }

    pub async fn extract_colors(&self) -> Result<Vec<ColorCount>> {
        match self.request(Command::ExtractColors).await? {
            Reply::Colors(colors) => Ok(colors),
            other => Err(unexpected("COLORS", &other)),
        }
    }

    pub async fn apply(&self, enabled: bool, color_mappings: ColorMappings) -> Result<bool> {
        let command = Command::Apply {
            enabled,
            color_mappings,
        };
        match self.request(command).await? {
            Reply::Applied { success } => Ok(success),
            other => Err(unexpected("APPLIED", &other)),
        }
    }

    pub async fn update_color(
        &self,
        original: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Result<bool> {
        let command = Command::UpdateColor {
            original: original.into(),
            replacement: replacement.into(),
        };
        match self.request(command).await? {
            Reply::Updated { success } => Ok(success),
            other => Err(unexpected("UPDATED", &other)),
        }
    }
}

fn unexpected(expected: &'static str, actual: &Reply) -> EngineError {
    EngineError::UnexpectedReply {
        expected,
        actual: actual.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotPage;
    use serde_json::json;

    #[test]
    fn test_apply_wire_shape() {
        let cmd: Command = serde_json::from_value(json!({
            "type": "APPLY",
            "data": {"enabled": true, "colorMappings": {"#FFF": "#111"}}
        }))
        .unwrap();
        let Command::Apply { enabled, color_mappings } = cmd else {
            panic!("wrong variant");
        };
        assert!(enabled);
        assert_eq!(color_mappings.get("#fff"), Some("#111"));
    }

    #[test]
    fn test_apply_mappings_default_to_empty() {
        let cmd: Command =
            serde_json::from_value(json!({"type": "APPLY", "data": {"enabled": false}})).unwrap();
        assert_eq!(
            cmd,
            Command::Apply { enabled: false, color_mappings: ColorMappings::new() }
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_value::<Command>(json!({"type": "RELOAD"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_reply_wire_shape() {
        let reply = Reply::Colors(vec![ColorCount { color: "#ffffff".into(), count: 3 }]);
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"type": "COLORS", "data": [{"color": "#ffffff", "count": 3}]})
        );
        assert_eq!(
            serde_json::to_value(Reply::Updated { success: false }).unwrap(),
            json!({"type": "UPDATED", "data": {"success": false}})
        );
    }

    #[tokio::test]
    async fn test_handle_dispatches() {
        let mut engine = Engine::new(SnapshotPage::default());
        let reply = engine
            .handle(Command::UpdateColor { original: "#FFF".into(), replacement: "#000".into() })
            .await;
        assert_eq!(reply, Reply::Updated { success: true });
        assert_eq!(engine.state().color_mappings.get("#fff"), Some("#000"));
        assert_eq!(engine.handle(Command::ExtractColors).await, Reply::Colors(vec![]));
    }

    #[tokio::test]
    async fn test_handle_reports_disconnect() {
        let (handle, inbox) = EngineHandle::channel();
        drop(inbox);
        assert_eq!(handle.extract_colors().await, Err(EngineError::Disconnected));
    }
}
