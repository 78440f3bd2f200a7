//! CSV-based table loader
//!
//! Loads rate, bracket and cap tables from CSV files in data/tables/

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};
use std::fs::File;
use std::path::Path;

use super::brackets::{BracketTable, TaxBracket};
use super::tax_rules::ReliefCaps;
use super::vehicle::{FactorTable, ProductConfig, SegmentTable, VehicleSegment};
use crate::error::TableError;

/// Default path to the tables directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

pub const TAX_BRACKETS_FILE: &str = "tax_brackets.csv";
pub const RELIEF_CAPS_FILE: &str = "relief_caps.csv";
pub const CAR_SEGMENTS_FILE: &str = "car_segments.csv";
pub const DRIVER_AGE_FACTORS_FILE: &str = "driver_age_factors.csv";
pub const REGION_FACTORS_FILE: &str = "region_factors.csv";
pub const BODY_TYPE_FACTORS_FILE: &str = "body_type_factors.csv";
pub const OWNERSHIP_FACTORS_FILE: &str = "ownership_factors.csv";
pub const INSURANCE_PRODUCT_FILE: &str = "insurance_product.csv";

/// Records of one CSV file with the line number of each
fn read_records(path: &Path) -> Result<Vec<(u64, StringRecord)>, TableError> {
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        records.push((line, record));
    }

    debug!("read {} rows from {}", records.len(), path.display());
    Ok(records)
}

fn column<'a>(
    record: &'a StringRecord,
    index: usize,
    path: &Path,
    line: u64,
) -> Result<&'a str, TableError> {
    record.get(index).ok_or_else(|| TableError::MissingColumn {
        path: path.to_path_buf(),
        line,
        expected: index + 1,
        found: record.len(),
    })
}

fn number(record: &StringRecord, index: usize, path: &Path, line: u64) -> Result<f64, TableError> {
    let raw = column(record, index, path, line)?;
    raw.parse::<f64>().map_err(|_| TableError::BadNumber {
        path: path.to_path_buf(),
        line,
        value: raw.to_string(),
    })
}

/// Load the bracket table
/// Columns: year, lower, upper (empty for the top bracket), rate
pub fn load_tax_brackets(dir: &Path) -> Result<BracketTable, TableError> {
    let path = dir.join(TAX_BRACKETS_FILE);
    let mut year = 0u16;
    let mut brackets = Vec::new();

    for (line, record) in read_records(&path)? {
        year = number(&record, 0, &path, line)? as u16;
        let lower = number(&record, 1, &path, line)?;
        let upper = if column(&record, 2, &path, line)?.is_empty() {
            None
        } else {
            Some(number(&record, 2, &path, line)?)
        };
        let rate = number(&record, 3, &path, line)?;
        brackets.push(TaxBracket::new(lower, upper, rate));
    }

    BracketTable::new(year, brackets)
}

/// Load relief caps, starting from the statutory defaults
/// Columns: relief, cap
pub fn load_relief_caps(dir: &Path) -> Result<ReliefCaps, TableError> {
    let path = dir.join(RELIEF_CAPS_FILE);
    let mut caps = ReliefCaps::default();

    for (line, record) in read_records(&path)? {
        let key = column(&record, 0, &path, line)?;
        let cap = number(&record, 1, &path, line)?;
        if !caps.set(key, cap) {
            warn!("{} line {}: ignoring unknown relief {:?}", path.display(), line, key);
        }
    }

    Ok(caps)
}

/// Load vehicle segments
/// Columns: segment, name, insurance_rate, servicing_rate, fuel_efficiency, minor_service, major_service
pub fn load_segments(dir: &Path) -> Result<SegmentTable, TableError> {
    let path = dir.join(CAR_SEGMENTS_FILE);
    let mut table = SegmentTable::default();

    for (line, record) in read_records(&path)? {
        table.insert(VehicleSegment {
            code: column(&record, 0, &path, line)?.to_string(),
            name: column(&record, 1, &path, line)?.to_string(),
            insurance_rate: number(&record, 2, &path, line)?,
            servicing_rate: number(&record, 3, &path, line)?,
            fuel_efficiency: number(&record, 4, &path, line)?,
            minor_service: number(&record, 5, &path, line)?,
            major_service: number(&record, 6, &path, line)?,
        });
    }

    Ok(table)
}

/// Load a key -> factor table; a "default" row sets the fallback factor
/// Columns: key, factor
pub fn load_factor_table(dir: &Path, file_name: &str) -> Result<FactorTable, TableError> {
    let path = dir.join(file_name);
    let mut table = FactorTable::default();

    for (line, record) in read_records(&path)? {
        let key = column(&record, 0, &path, line)?;
        let factor = number(&record, 1, &path, line)?;
        table.set(key, factor);
    }

    Ok(table)
}

/// Load motor product constants, starting from the defaults
/// Columns: key, value
pub fn load_product_config(dir: &Path) -> Result<ProductConfig, TableError> {
    let path = dir.join(INSURANCE_PRODUCT_FILE);
    let mut config = ProductConfig::default();

    for (line, record) in read_records(&path)? {
        let key = column(&record, 0, &path, line)?;
        let value = number(&record, 1, &path, line)?;
        if !config.set(key, value) {
            warn!("{} line {}: ignoring unknown setting {:?}", path.display(), line, key);
        }
    }

    Ok(config)
}
