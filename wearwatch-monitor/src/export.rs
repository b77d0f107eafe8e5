// Wearwatch Monitor - Live monitoring session
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Tabular dump of the rolling store.

use crate::error::{MonitorError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use wearwatch::Reading;

/// Download file name.
pub const EXPORT_FILE_NAME: &str = "live_monitoring.csv";

/// Column order of the export.
pub const COLUMNS: [&str; 9] = [
    "time",
    "air_temperature",
    "process_temperature",
    "rotational_speed",
    "torque",
    "tool_wear",
    "temp_delta",
    "power_est",
    "failure_prob",
];

/// One CSV row; field order is the column order.
#[derive(Debug, Serialize)]
struct ExportRow {
    time: u64,
    air_temperature: f64,
    process_temperature: f64,
    rotational_speed: f64,
    torque: f64,
    tool_wear: f64,
    temp_delta: f64,
    power_est: f64,
    failure_prob: f64,
}

impl From<&Reading> for ExportRow {
    fn from(r: &Reading) -> Self {
        let s = r.sensors();
        Self {
            time: r.time,
            air_temperature: s.air_temperature,
            process_temperature: s.process_temperature,
            rotational_speed: s.rotational_speed,
            torque: s.torque,
            tool_wear: s.tool_wear,
            temp_delta: r.sample.temp_delta,
            power_est: r.sample.power_est,
            failure_prob: r.failure_prob,
        }
    }
}

/// Write `readings` as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, readings: &[Reading]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    // An empty store still gets a header.
    if readings.is_empty() {
        wtr.write_record(COLUMNS)?;
    }
    for reading in readings {
        wtr.serialize(ExportRow::from(reading))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(readings: &[Reading]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, readings)?;
    String::from_utf8(buf)
        .map_err(|e| MonitorError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

pub fn write_csv_file(path: impl AsRef<Path>, readings: &[Reading]) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, readings)
}
