use clap::Parser;
use itertools::Itertools;

use rust_park::parking::config::{Command, CommandLineArgs, Config};
use rust_park::parking::engine::ParkingEngine;
use rust_park::parking::error::Result;
use rust_park::parking::logging;
use rust_park::parking::VehicleClass;

fn main() {
    let args = CommandLineArgs::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::default(),
    };
    let _log_guards = logging::init_logging(&config);

    if let Err(e) = run(&config, args.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Command) -> Result<()> {
    let mut engine = ParkingEngine::open(config)?;

    match command {
        Command::Status { class, json } => status(&engine, class, json),
        Command::Park { class, plate, spot } => {
            let spot_id = match spot {
                Some(id) => engine.park_at(class, id, &plate)?,
                None => engine.park_next(class, &plate)?,
            };
            println!("{class} with plate {plate} parked on spot {spot_id}");
        }
        Command::Free { class } => {
            let free = engine.free_ids(class);
            if free.is_empty() {
                println!("No free {class} spots");
            } else {
                println!("Free {class} spots: {}", free.iter().join(", "));
            }
        }
        Command::Leave { class, spot } => {
            engine.release(class, spot)?;
            println!("{class} spot {spot} is free again");
        }
    }
    Ok(())
}

fn status(engine: &ParkingEngine, class: Option<VehicleClass>, json: bool) {
    let classes = match class {
        Some(class) => vec![class],
        None => vec![VehicleClass::Car, VehicleClass::Motorcycle],
    };

    if json {
        let mut doc = serde_json::Map::new();
        for class in &classes {
            let snapshot = serde_json::to_value(engine.snapshot(*class))
                .expect("Failed to serialize snapshot");
            doc.insert(class.to_string(), snapshot);
        }
        let doc = serde_json::Value::Object(doc);
        println!(
            "{}",
            serde_json::to_string_pretty(&doc).expect("Failed to serialize snapshot")
        );
    } else {
        for class in classes {
            print_class(engine, class);
        }
    }
}

fn print_class(engine: &ParkingEngine, class: VehicleClass) {
    let snapshot = engine.snapshot(class);
    let occupied = snapshot.iter().filter(|status| status.occupied).count();
    println!("{} spots ({}/{} occupied)", class, occupied, snapshot.len());
    for status in snapshot {
        match status.plate {
            Some(plate) => println!("{:>4} {}", status.id, plate),
            None => println!("{:>4} free", status.id),
        }
    }
}
