use tracing::info;

use crate::parking::config::Config;
use crate::parking::error::{ParkingError, Result};
use crate::parking::log::{Assignment, AssignmentLog};
use crate::parking::lot::ParkingLot;
use crate::parking::spot::{ParkingSpot, SpotStatus};
use crate::parking::VehicleClass;

/// Allocation engine over one lot per vehicle class and the assignment log.
///
/// Every mutation writes the log before it touches the lots. A failed write
/// leaves the lots unchanged, so the file never claims less than what memory
/// holds and a crash between the two steps is recovered by replaying the
/// file on the next start.
#[derive(Debug)]
pub struct ParkingEngine {
    car: ParkingLot,
    motorcycle: ParkingLot,
    log: AssignmentLog,
}

impl ParkingEngine {
    /// Builds the lots from the configured capacities and restores their
    /// occupancy from the assignment log. A missing log file is created
    /// empty. Fails if the log contains a corrupt, duplicate or out of range
    /// entry; the file is left as is for inspection.
    pub fn open(config: &Config) -> Result<Self> {
        let log = AssignmentLog::open(config.log_path())?;
        let mut engine = ParkingEngine {
            car: ParkingLot::new(config.capacity.of(VehicleClass::Car)),
            motorcycle: ParkingLot::new(config.capacity.of(VehicleClass::Motorcycle)),
            log,
        };
        engine.replay()?;
        Ok(engine)
    }

    fn replay(&mut self) -> Result<()> {
        let entries = self.log.entries()?;
        let count = entries.len();
        for Assignment {
            class,
            spot_id,
            plate,
        } in entries
        {
            let spot = self.spot_mut(class, spot_id)?;
            if spot.occupied() {
                return Err(ParkingError::SpotOccupied { class, id: spot_id });
            }
            spot.occupy(plate);
        }
        if count > 0 {
            info!("Restored {} assignments from {:?}", count, self.log.path());
        }
        Ok(())
    }

    /// Parks on the vacant spot with the lowest id and returns that id.
    pub fn park_next(&mut self, class: VehicleClass, plate: &str) -> Result<u32> {
        validate_plate(plate)?;
        let spot_id = self
            .lot(class)
            .find_first_free()
            .ok_or(ParkingError::NoCapacity(class))?;

        self.log.append(class, spot_id, plate)?;
        self.spot_mut(class, spot_id)?.occupy(plate.to_string());
        info!("Parked {} on {} spot {}", plate, class, spot_id);
        Ok(spot_id)
    }

    /// Parks on the requested spot, which must exist and be vacant.
    pub fn park_at(&mut self, class: VehicleClass, spot_id: u32, plate: &str) -> Result<u32> {
        validate_plate(plate)?;
        let spot = self
            .lot(class)
            .get(spot_id)
            .ok_or(ParkingError::SpotNotFound { class, id: spot_id })?;
        if spot.occupied() {
            return Err(ParkingError::SpotOccupied { class, id: spot_id });
        }

        self.log.append(class, spot_id, plate)?;
        self.spot_mut(class, spot_id)?.occupy(plate.to_string());
        info!("Parked {} on chosen {} spot {}", plate, class, spot_id);
        Ok(spot_id)
    }

    /// Vacates an occupied spot. The log line is removed first, the spot is
    /// cleared second, so an io failure keeps the spot allocated.
    pub fn release(&mut self, class: VehicleClass, spot_id: u32) -> Result<()> {
        let spot = self
            .lot(class)
            .get(spot_id)
            .ok_or(ParkingError::SpotNotFound { class, id: spot_id })?;
        let plate = spot
            .plate()
            .ok_or(ParkingError::SpotNotOccupied { class, id: spot_id })?
            .to_string();

        self.log.remove_entry(class, spot_id, &plate)?;
        self.spot_mut(class, spot_id)?.vacate();
        info!("Released {} from {} spot {}", plate, class, spot_id);
        Ok(())
    }

    pub fn snapshot(&self, class: VehicleClass) -> Vec<SpotStatus> {
        self.lot(class).snapshot()
    }

    pub fn free_ids(&self, class: VehicleClass) -> Vec<u32> {
        self.lot(class).free_ids()
    }

    fn lot(&self, class: VehicleClass) -> &ParkingLot {
        match class {
            VehicleClass::Car => &self.car,
            VehicleClass::Motorcycle => &self.motorcycle,
        }
    }

    fn lot_mut(&mut self, class: VehicleClass) -> &mut ParkingLot {
        match class {
            VehicleClass::Car => &mut self.car,
            VehicleClass::Motorcycle => &mut self.motorcycle,
        }
    }

    fn spot_mut(&mut self, class: VehicleClass, id: u32) -> Result<&mut ParkingSpot> {
        self.lot_mut(class)
            .get_mut(id)
            .ok_or(ParkingError::SpotNotFound { class, id })
    }
}

fn validate_plate(plate: &str) -> Result<()> {
    if plate.trim().is_empty() || plate.contains(['\n', '\r']) {
        return Err(ParkingError::InvalidPlate(plate.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::parking::config::Config;
    use crate::parking::engine::ParkingEngine;
    use crate::parking::error::ParkingError;
    use crate::parking::VehicleClass;

    fn test_config(dir: &TempDir, car: u32, motorcycle: u32) -> Config {
        let mut config = Config::default();
        config.capacity.car = car;
        config.capacity.motorcycle = motorcycle;
        config.log_file = Some(dir.path().join("plate_numbers.txt"));
        config
    }

    fn log_content(config: &Config) -> String {
        fs::read_to_string(config.log_path()).unwrap()
    }

    #[test]
    fn park_next_takes_lowest_free_id() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        assert_eq!(1, engine.park_next(VehicleClass::Car, "A").unwrap());
        assert_eq!(2, engine.park_next(VehicleClass::Car, "B").unwrap());
        assert_eq!(3, engine.park_next(VehicleClass::Car, "C").unwrap());
    }

    #[test]
    fn park_next_reuses_released_spot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();
        engine.park_next(VehicleClass::Car, "A").unwrap();
        engine.park_next(VehicleClass::Car, "B").unwrap();

        engine.release(VehicleClass::Car, 1).unwrap();

        assert_eq!(1, engine.park_next(VehicleClass::Car, "C").unwrap());
    }

    #[test]
    fn park_next_on_full_lot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 2, 2);
        let mut engine = ParkingEngine::open(&config).unwrap();
        engine.park_next(VehicleClass::Car, "A").unwrap();
        engine.park_next(VehicleClass::Car, "B").unwrap();
        let before = log_content(&config);

        let err = engine.park_next(VehicleClass::Car, "C").unwrap_err();

        assert!(matches!(err, ParkingError::NoCapacity(VehicleClass::Car)));
        // neither the lots nor the file changed
        assert!(engine.free_ids(VehicleClass::Car).is_empty());
        assert_eq!(before, log_content(&config));
    }

    #[test]
    fn park_at_takes_the_chosen_spot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        assert_eq!(2, engine.park_at(VehicleClass::Car, 2, "A").unwrap());

        let snapshot = engine.snapshot(VehicleClass::Car);
        assert!(!snapshot[0].occupied);
        assert!(snapshot[1].occupied);
        assert_eq!(Some(String::from("A")), snapshot[1].plate);
    }

    #[test]
    fn chosen_spot_release_leaves_no_trace() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 5, 5);
        let mut engine = ParkingEngine::open(&config).unwrap();
        engine.park_at(VehicleClass::Car, 5, "ABC123").unwrap();

        engine.release(VehicleClass::Car, 5).unwrap();

        assert_eq!("", log_content(&config));
        assert_eq!(1, engine.park_next(VehicleClass::Car, "XYZ789").unwrap());
    }

    #[test]
    fn park_at_occupied_spot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();
        engine.park_at(VehicleClass::Car, 1, "A").unwrap();

        let err = engine.park_at(VehicleClass::Car, 1, "B").unwrap_err();

        assert!(matches!(
            err,
            ParkingError::SpotOccupied {
                class: VehicleClass::Car,
                id: 1
            }
        ));
        // the original assignment is untouched
        assert_eq!(
            Some(String::from("A")),
            engine.snapshot(VehicleClass::Car)[0].plate
        );
    }

    #[test]
    fn park_at_unknown_spot() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        for id in [0, 4] {
            let err = engine.park_at(VehicleClass::Car, id, "A").unwrap_err();
            assert!(matches!(err, ParkingError::SpotNotFound { id: got, .. } if got == id));
        }
    }

    #[test]
    fn invalid_plates_are_rejected_before_anything_happens() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        for plate in ["", "   ", "\t", "AB\nCD", "AB\rCD"] {
            let err = engine.park_next(VehicleClass::Car, plate).unwrap_err();
            assert!(matches!(err, ParkingError::InvalidPlate(_)), "plate {plate:?}");

            let err = engine.park_at(VehicleClass::Car, 1, plate).unwrap_err();
            assert!(matches!(err, ParkingError::InvalidPlate(_)), "plate {plate:?}");
        }

        assert_eq!(3, engine.free_ids(VehicleClass::Car).len());
        assert_eq!("", log_content(&config));
    }

    #[test]
    fn release_errors() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        let err = engine.release(VehicleClass::Car, 2).unwrap_err();
        assert!(matches!(err, ParkingError::SpotNotOccupied { id: 2, .. }));

        let err = engine.release(VehicleClass::Car, 9).unwrap_err();
        assert!(matches!(err, ParkingError::SpotNotFound { id: 9, .. }));
    }

    #[test]
    fn id_spaces_of_the_classes_are_independent() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        assert_eq!(1, engine.park_next(VehicleClass::Car, "CAR-1").unwrap());
        assert_eq!(
            1,
            engine.park_next(VehicleClass::Motorcycle, "MOTO-1").unwrap()
        );

        engine.release(VehicleClass::Car, 1).unwrap();

        // the motorcycle assignment with the same id is untouched
        assert_eq!(
            Some(String::from("MOTO-1")),
            engine.snapshot(VehicleClass::Motorcycle)[0].plate
        );
        assert_eq!(
            "Motorcycle - Spot: 1 - Plate: MOTO-1\n",
            log_content(&config)
        );
    }

    #[test]
    fn log_file_mirrors_occupied_spots() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        engine.park_next(VehicleClass::Car, "A").unwrap();
        engine.park_next(VehicleClass::Car, "B").unwrap();
        engine.park_next(VehicleClass::Motorcycle, "M").unwrap();
        engine.release(VehicleClass::Car, 1).unwrap();
        engine.park_next(VehicleClass::Car, "C").unwrap();

        assert_eq!(
            "Car - Spot: 2 - Plate: B\nMotorcycle - Spot: 1 - Plate: M\nCar - Spot: 1 - Plate: C\n",
            log_content(&config)
        );
    }

    #[test]
    fn capacity_scenario_with_three_spots() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir, 3, 3);
        let mut engine = ParkingEngine::open(&config).unwrap();

        assert_eq!(1, engine.park_next(VehicleClass::Car, "P1").unwrap());
        assert_eq!(2, engine.park_next(VehicleClass::Car, "P2").unwrap());

        let err = engine.park_at(VehicleClass::Car, 1, "P3").unwrap_err();
        assert!(matches!(err, ParkingError::SpotOccupied { id: 1, .. }));

        engine.release(VehicleClass::Car, 1).unwrap();
        assert!(!log_content(&config).contains("Spot: 1"));

        assert_eq!(1, engine.park_next(VehicleClass::Car, "P3").unwrap());
    }
}
