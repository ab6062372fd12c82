/// Mapping from relay messages to what a display client does with them
use tokio::sync::mpsc;

use crate::logger::{self, LogTag};
use crate::relay::{Message, MessageKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayAction {
    /// Put this text on screen
    Show(String),
    /// Take the text down
    Hide,
    /// The relay accepted this client
    Confirmed,
}

impl DisplayAction {
    pub fn from_message(message: &Message) -> Self {
        match message.kind() {
            MessageKind::Update if message.is_empty_update() => DisplayAction::Hide,
            MessageKind::Update => DisplayAction::Show(message.content().to_string()),
            MessageKind::Clear => DisplayAction::Hide,
            MessageKind::Connected => DisplayAction::Confirmed,
        }
    }
}

/// Whatever renders the shared text (terminal, overlay window, ...)
pub trait DisplaySurface {
    fn show(&mut self, text: &str);

    fn hide(&mut self);

    fn connected(&mut self) {
        logger::info(LogTag::Client, "Connected to relay server");
    }
}

pub fn apply<S: DisplaySurface + ?Sized>(surface: &mut S, action: &DisplayAction) {
    match action {
        DisplayAction::Show(text) => surface.show(text),
        DisplayAction::Hide => surface.hide(),
        DisplayAction::Confirmed => surface.connected(),
    }
}

/// Feed inbound relay messages to `surface` until the client stops
pub async fn drive_display<S: DisplaySurface + ?Sized>(
    mut inbound: mpsc::Receiver<Message>,
    surface: &mut S,
) {
    while let Some(message) = inbound.recv().await {
        let action = DisplayAction::from_message(&message);
        logger::debug(
            LogTag::Client,
            &format!("Display action for {}: {:?}", message.kind(), action),
        );
        apply(surface, &action);
    }
}
