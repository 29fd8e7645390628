use nohash_hasher::IntMap;

use crate::parking::spot::{ParkingSpot, SpotStatus};

/// All spots of one vehicle class. The spots live in a vec ordered by
/// ascending id, which fixes the scan order for sequential allocation. The
/// map holds indices into that vec for constant time lookup by id, so both
/// access paths share a single set of records.
///
/// The set of spots is fixed at construction. Ids run from 1 to the
/// configured capacity without gaps.
#[derive(Debug)]
pub struct ParkingLot {
    spots: Vec<ParkingSpot>,
    index: IntMap<u32, usize>,
}

impl ParkingLot {
    pub fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "A lot needs at least one spot.");
        let spots: Vec<ParkingSpot> = (1..=capacity).map(ParkingSpot::new).collect();
        let index = spots
            .iter()
            .enumerate()
            .map(|(i, spot)| (spot.id(), i))
            .collect();
        ParkingLot { spots, index }
    }

    pub fn capacity(&self) -> u32 {
        self.spots.len() as u32
    }

    pub fn get(&self, id: u32) -> Option<&ParkingSpot> {
        self.index.get(&id).map(|&i| &self.spots[i])
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut ParkingSpot> {
        let i = *self.index.get(&id)?;
        Some(&mut self.spots[i])
    }

    /// Id of the vacant spot with the lowest id, if any. Two calls without a
    /// mutation in between return the same id.
    pub fn find_first_free(&self) -> Option<u32> {
        self.spots
            .iter()
            .find(|spot| !spot.occupied())
            .map(|spot| spot.id())
    }

    /// Ids of all vacant spots in ascending order.
    pub fn free_ids(&self) -> Vec<u32> {
        self.spots
            .iter()
            .filter(|spot| !spot.occupied())
            .map(|spot| spot.id())
            .collect()
    }

    /// Status of every spot in ascending id order.
    pub fn snapshot(&self) -> Vec<SpotStatus> {
        self.spots.iter().map(ParkingSpot::status).collect()
    }
}
