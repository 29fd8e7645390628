use std::io;

use thiserror::Error;

use crate::parking::VehicleClass;

pub type Result<T> = std::result::Result<T, ParkingError>;

/// Errors of the allocation engine and the assignment log.
#[derive(Debug, Error)]
pub enum ParkingError {
    /// Rejected plate text. Plates must contain at least one non-whitespace
    /// character and no line breaks.
    #[error("invalid plate {0:?}")]
    InvalidPlate(String),

    /// Every spot of the class is occupied.
    #[error("no free {0} spot left")]
    NoCapacity(VehicleClass),

    /// The id is outside the configured range of the class.
    #[error("there is no {class} spot {id}")]
    SpotNotFound { class: VehicleClass, id: u32 },

    #[error("{class} spot {id} is already occupied")]
    SpotOccupied { class: VehicleClass, id: u32 },

    #[error("{class} spot {id} is not occupied")]
    SpotNotOccupied { class: VehicleClass, id: u32 },

    #[error("assignment log io failed: {0}")]
    Io(#[from] io::Error),

    /// A log line that does not parse as an assignment. Reported with its
    /// 1-based line number; the file is left untouched for inspection.
    #[error("assignment log line {line_no} is corrupt: {content:?}")]
    CorruptEntry { line_no: usize, content: String },
}
