// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV parsing for inventory imports and bulk price updates.
//!
//! Parsing is tolerant at the row level: a malformed row is reported
//! with its line number and skipped, and the remaining rows are still
//! applied. A malformed header rejects the whole file.

use serde::Deserialize;
use tracing::debug;

use admast::PriceUpdate;
use admast_domain::InventoryUnit;

use crate::error::ApiError;
use crate::request_response::CsvRowError;

/// Expected header for price update files.
const PRICE_HEADERS: [&str; 2] = ["unit_code", "discounted_rate"];

/// Headers every inventory import file must carry. Optional columns
/// may follow in any order.
const UNIT_REQUIRED_HEADERS: [&str; 5] =
    ["unit_code", "outlet_name", "location_name", "state", "district"];

#[derive(Debug, Deserialize)]
struct PriceRow {
    unit_code: String,
    discounted_rate: i64,
}

#[derive(Debug, Deserialize)]
struct UnitRow {
    unit_code: String,
    outlet_name: String,
    location_name: String,
    state: String,
    district: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    width_ft: Option<f64>,
    #[serde(default)]
    height_ft: Option<f64>,
    #[serde(default)]
    rate_per_sqft: Option<i64>,
    #[serde(default)]
    discounted_rate: Option<i64>,
    #[serde(default)]
    printing_charge: Option<i64>,
    #[serde(default)]
    installation_charge: Option<i64>,
}

impl UnitRow {
    fn into_unit(self) -> InventoryUnit {
        let mut unit: InventoryUnit = InventoryUnit::new(
            &self.unit_code,
            self.outlet_name,
            self.location_name,
            self.state,
            self.district,
        );
        unit.city = self.city.filter(|c| !c.is_empty());
        unit.width_ft = self.width_ft;
        unit.height_ft = self.height_ft;
        unit.rate_per_sqft = self.rate_per_sqft;
        unit.discounted_rate = self.discounted_rate;
        unit.printing_charge = self.printing_charge;
        unit.installation_charge = self.installation_charge;
        unit
    }
}

/// Parses a bulk price update file.
///
/// The file must carry exactly the header `unit_code,discounted_rate`.
///
/// # Errors
///
/// Returns an error if the header is malformed. Row-level failures are
/// collected, not fatal.
pub fn parse_price_rows(content: &str) -> Result<(Vec<PriceUpdate>, Vec<CsvRowError>), ApiError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("csv"),
            message: format!("Failed to read CSV header: {e}"),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if headers != PRICE_HEADERS {
        return Err(ApiError::InvalidInput {
            field: String::from("csv"),
            message: format!(
                "Expected header '{}', found '{}'",
                PRICE_HEADERS.join(","),
                headers.join(",")
            ),
        });
    }

    let mut updates: Vec<PriceUpdate> = Vec::new();
    let mut errors: Vec<CsvRowError> = Vec::new();

    for (index, row) in reader.deserialize::<PriceRow>().enumerate() {
        // Header occupies line 1
        let line: usize = index + 2;
        match row {
            Ok(row) => updates.push(PriceUpdate {
                unit_code: row.unit_code,
                discounted_rate: row.discounted_rate,
            }),
            Err(e) => errors.push(CsvRowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    debug!(
        rows = updates.len(),
        errors = errors.len(),
        "Parsed price update CSV"
    );
    Ok((updates, errors))
}

/// Parses an inventory import file.
///
/// The file must carry at least the columns `unit_code`, `outlet_name`,
/// `location_name`, `state`, and `district`; the numeric columns are
/// optional and empty cells become `None`.
///
/// # Errors
///
/// Returns an error if a required column is missing. Row-level failures
/// are collected, not fatal.
pub fn parse_unit_rows(content: &str) -> Result<(Vec<InventoryUnit>, Vec<CsvRowError>), ApiError> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("csv"),
            message: format!("Failed to read CSV header: {e}"),
        })?
        .iter()
        .map(str::to_string)
        .collect();

    for required in UNIT_REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(ApiError::InvalidInput {
                field: String::from("csv"),
                message: format!("Missing required column '{required}'"),
            });
        }
    }

    let mut units: Vec<InventoryUnit> = Vec::new();
    let mut errors: Vec<CsvRowError> = Vec::new();

    for (index, row) in reader.deserialize::<UnitRow>().enumerate() {
        let line: usize = index + 2;
        match row {
            Ok(row) => units.push(row.into_unit()),
            Err(e) => errors.push(CsvRowError {
                line,
                message: e.to_string(),
            }),
        }
    }

    debug!(
        rows = units.len(),
        errors = errors.len(),
        "Parsed inventory import CSV"
    );
    Ok((units, errors))
}
