use std::time::{SystemTime, UNIX_EPOCH};

use log::Level;

use crate::event::{Message, MessageEventArgs, MessageKind};
use crate::ui_bridge::error::UiBridgeError;
use crate::ui_bridge::MessageSink;

/// Writes every message at or above `min_kind` to the `log` facade as
/// `[source] HH:MM:SS Kind: text`.
#[derive(Debug)]
pub struct ConsoleSink {
    min_kind: MessageKind,
}

impl ConsoleSink {
    pub const NAME: &'static str = "console";

    pub fn new(min_kind: MessageKind) -> Self {
        Self { min_kind }
    }

    /// UTC wall-clock time of day
    pub fn format_time(time: SystemTime) -> String {
        if let Ok(duration) = time.duration_since(UNIX_EPOCH) {
            let secs = duration.as_secs();
            format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
        } else {
            String::from("00:00:00")
        }
    }

    pub fn format_line(message: &Message) -> String {
        format!(
            "[{}] {} {}: {}",
            message.source_id().unwrap_or("-"),
            Self::format_time(message.timestamp()),
            message.kind(),
            message.text()
        )
    }

    fn level(kind: MessageKind) -> Level {
        match kind {
            MessageKind::Debug => Level::Debug,
            MessageKind::Info => Level::Info,
            MessageKind::Warning => Level::Warn,
            MessageKind::Error => Level::Error,
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(MessageKind::Info)
    }
}

impl MessageSink for ConsoleSink {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn handle_message(&mut self, args: &MessageEventArgs<'_>) -> Result<(), UiBridgeError> {
        let kind = args.message.kind();
        if kind >= self.min_kind {
            let line = Self::format_line(args.message);
            log::log!(target: "dockyard::console", Self::level(kind), "{}", line);
        }
        Ok(())
    }
}
