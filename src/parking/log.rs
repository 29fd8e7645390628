use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::parking::error::{ParkingError, Result};
use crate::parking::VehicleClass;

/// One active assignment, as recorded in the log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub class: VehicleClass,
    pub spot_id: u32,
    pub plate: String,
}

/// Flat text log of the currently active assignments, one line per occupied
/// spot:
///
/// `<class> - Spot: <id> - Plate: <plate>`
///
/// Allocations append a line, releases rewrite the file without the released
/// line. The file therefore always mirrors the set of occupied spots and is
/// the source of truth after a crash.
///
/// The log holds no open handle. Every operation opens the file, works on it
/// and closes it again, so nothing is lost when the process dies between
/// operations.
#[derive(Debug)]
pub struct AssignmentLog {
    path: PathBuf,
}

impl AssignmentLog {
    /// Opens the log at the given path. A missing file is created empty,
    /// including missing parent directories.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            File::create(&path)?;
            info!("Created assignment log {:?}", path);
        }
        Ok(AssignmentLog { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one assignment line and flushes it to disk.
    pub fn append(&self, class: VehicleClass, spot_id: u32, plate: &str) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", format_entry(class, spot_id, plate))?;
        writer.flush()?;
        Ok(())
    }

    /// Rewrites the log without the line matching the given assignment. Only
    /// whole lines equal to the class/id/plate triple are dropped; the order
    /// of the remaining lines is preserved. The kept lines go to a scratch
    /// file next to the log which is then renamed over it, so an interrupted
    /// rewrite never truncates the log.
    pub fn remove_entry(&self, class: VehicleClass, spot_id: u32, plate: &str) -> Result<()> {
        let needle = format_entry(class, spot_id, plate);
        let reader = BufReader::new(File::open(&self.path)?);
        let mut kept = Vec::new();
        let mut removed = 0;
        for line in reader.lines() {
            let line = line?;
            if line == needle {
                removed += 1;
            } else {
                kept.push(line);
            }
        }

        if removed == 0 {
            warn!("No line {:?} in {:?}, log and lots have diverged", needle, self.path);
        }

        let scratch = self.path.with_extension("tmp");
        let mut file = File::create(&scratch)?;
        for line in &kept {
            writeln!(file, "{line}")?;
        }
        file.sync_all()?;
        std::fs::rename(&scratch, &self.path)?;
        Ok(())
    }

    /// Reads all assignments in file order. Fails on the first line that does
    /// not parse; blank lines are ignored.
    pub fn entries(&self) -> Result<Vec<Assignment>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut entries = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_entry(&line) {
                Some(assignment) => entries.push(assignment),
                None => {
                    return Err(ParkingError::CorruptEntry {
                        line_no: i + 1,
                        content: line,
                    })
                }
            }
        }
        Ok(entries)
    }
}

fn format_entry(class: VehicleClass, spot_id: u32, plate: &str) -> String {
    format!("{class} - Spot: {spot_id} - Plate: {plate}")
}

/// Plates are stored verbatim, without escaping. Splitting on the leftmost
/// separators reconstructs any plate that has no line breaks, because the
/// class literal and the numeric id cannot contain a separator themselves.
fn parse_entry(line: &str) -> Option<Assignment> {
    let (class, rest) = line.split_once(" - Spot: ")?;
    let (spot_id, plate) = rest.split_once(" - Plate: ")?;

    let class = VehicleClass::from_literal(class)?;
    let spot_id: u32 = spot_id.parse().ok()?;
    if plate.trim().is_empty() {
        return None;
    }

    Some(Assignment {
        class,
        spot_id,
        plate: plate.to_string(),
    })
}
