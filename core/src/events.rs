use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Delay between the last hit and the run-complete notification, leaves room for exit animations.
pub const RUN_COMPLETE_DELAY: Duration = Duration::from_millis(1000);

/// How long a next-target notice stays up in the shell.
pub const NOTICE_DURATION: Duration = Duration::from_millis(1500);

/// Notifications from the core to whatever draws the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GameEvent {
    /// The number the player must find next. `first` is set on run start.
    #[serde(rename_all = "camelCase")]
    NextTarget { label: CellCount, first: bool },
    RunComplete(RunSummary),
    #[serde(rename_all = "camelCase")]
    CellUpdated {
        cell_index: CellCount,
        display_text: String,
        eliminated: bool,
    },
}

pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}
