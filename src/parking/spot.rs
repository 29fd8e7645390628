use serde::Serialize;

/// A single parking spot. Occupancy is derived from the plate: a spot with a
/// plate is occupied, a spot without one is vacant. There is no separate flag
/// that could drift out of sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkingSpot {
    id: u32,
    plate: Option<String>,
}

impl ParkingSpot {
    pub fn new(id: u32) -> Self {
        ParkingSpot { id, plate: None }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn occupied(&self) -> bool {
        self.plate.is_some()
    }

    pub fn plate(&self) -> Option<&str> {
        self.plate.as_deref()
    }

    /// Stores the plate. Callers must have checked vacancy; occupying an
    /// occupied spot is a programming error, not a user error.
    pub fn occupy(&mut self, plate: String) {
        assert!(
            self.plate.is_none(),
            "Spot {} is already occupied by {:?}.",
            self.id,
            self.plate
        );
        self.plate = Some(plate);
    }

    pub fn vacate(&mut self) {
        self.plate = None;
    }

    pub fn status(&self) -> SpotStatus {
        SpotStatus {
            id: self.id,
            occupied: self.occupied(),
            plate: self.plate.clone(),
        }
    }
}

/// Owned view of a spot for rendering and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotStatus {
    pub id: u32,
    pub occupied: bool,
    pub plate: Option<String>,
}
