use serde::{Deserialize, Serialize};

use crate::CellCount;

/// Lifecycle of a single cell within a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Alive,
    Dead,
}

impl CellStatus {
    pub const fn is_alive(self) -> bool {
        matches!(self, Self::Alive)
    }
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::Alive
    }
}

/// What a cell should show for one tick.
///
/// `Hidden` still carries the drawn magnitude so the signed encoding can be
/// reproduced, but callers should blank the cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellRoll {
    /// Already eliminated, leave the shown content alone.
    Dead,
    Hidden(CellCount),
    Shown(CellCount),
}

impl CellRoll {
    /// `0` for dead cells, `-n` for hidden, `+n` for shown.
    pub const fn as_signed(self) -> i32 {
        match self {
            Self::Dead => 0,
            Self::Hidden(n) => -(n as i32),
            Self::Shown(n) => n as i32,
        }
    }

    pub const fn shown(self) -> Option<CellCount> {
        match self {
            Self::Shown(n) => Some(n),
            _ => None,
        }
    }
}
