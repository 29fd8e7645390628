use clap::ValueEnum;

pub mod config;
pub mod engine;
pub mod error;
pub mod log;
pub mod logging;
pub mod lot;
pub mod spot;

/// Vehicle classes managed by the engine. Each class has its own lot with an
/// independent spot id space, so a car spot 1 and a motorcycle spot 1 coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VehicleClass {
    Car,
    Motorcycle,
}

impl VehicleClass {
    /// Parses the literal used in assignment log lines. Case sensitive, since
    /// the log is machine written.
    pub fn from_literal(literal: &str) -> Option<Self> {
        match literal {
            "Car" => Some(VehicleClass::Car),
            "Motorcycle" => Some(VehicleClass::Motorcycle),
            _ => None,
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleClass::Car => write!(f, "Car"),
            VehicleClass::Motorcycle => write!(f, "Motorcycle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parking::VehicleClass;

    #[test]
    fn literal_matches_display() {
        for class in [VehicleClass::Car, VehicleClass::Motorcycle] {
            assert_eq!(
                Some(class),
                VehicleClass::from_literal(&class.to_string())
            );
        }
    }

    #[test]
    fn unknown_literal() {
        assert_eq!(None, VehicleClass::from_literal("Truck"));
        assert_eq!(None, VehicleClass::from_literal("car"));
        assert_eq!(None, VehicleClass::from_literal(""));
    }
}
