use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::loader::DataError;

/// Supported year range of the dataset, inclusive.
pub const YEAR_MIN: u16 = 2010;
pub const YEAR_MAX: u16 = 2023;

// Tolerance for the `total >= max(source)` invariant; capacities are in GW.
const CAPACITY_EPS: f64 = 1e-6;

// ---------------------------------------------------------------------------
// CountryYearRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single (country, year) observation, mirroring the CSV schema.
///
/// The economic columns are optional: blank cells deserialize to `None` and
/// are excluded downstream rather than zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryYearRecord {
    #[serde(rename = "Entity")]
    pub country: String,
    #[serde(rename = "Code")]
    pub code: String,
    #[serde(rename = "Year")]
    pub year: u16,
    #[serde(rename = "Solar_GW")]
    pub solar_gw: f64,
    #[serde(rename = "Wind_GW")]
    pub wind_gw: f64,
    #[serde(rename = "Hydro_GW")]
    pub hydro_gw: f64,
    #[serde(rename = "Total_GW")]
    pub total_gw: f64,
    #[serde(rename = "Population")]
    pub population: Option<u64>,
    #[serde(rename = "GDP_per_Capita")]
    pub gdp_per_capita: Option<f64>,
    #[serde(rename = "Capacity_per_Capita_kW")]
    pub capacity_per_capita_kw: Option<f64>,
}

impl CountryYearRecord {
    /// Whether this row is a regional/world aggregate rather than a country.
    /// Aggregates stay selectable in the snapshot views but are excluded from
    /// every cross-country derivation.
    pub fn is_aggregate(&self) -> bool {
        self.country == "World" || self.code.starts_with("OWID_")
    }

    /// Validate the per-row invariants, returning a format error with
    /// (country, year) context on the first violation.
    fn validate(&self) -> Result<(), DataError> {
        let ctx = |msg: String| DataError::Format(format!("{} {}: {msg}", self.country, self.year));

        if !(YEAR_MIN..=YEAR_MAX).contains(&self.year) {
            return Err(ctx(format!(
                "year outside supported range {YEAR_MIN}-{YEAR_MAX}"
            )));
        }

        for (name, value) in [
            ("Solar_GW", self.solar_gw),
            ("Wind_GW", self.wind_gw),
            ("Hydro_GW", self.hydro_gw),
            ("Total_GW", self.total_gw),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ctx(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        let max_source = self.solar_gw.max(self.wind_gw).max(self.hydro_gw);
        if self.total_gw + CAPACITY_EPS < max_source {
            return Err(ctx(format!(
                "Total_GW {} is smaller than largest source {max_source}",
                self.total_gw
            )));
        }

        if self.population == Some(0) {
            return Err(ctx("Population must be positive".into()));
        }
        for (name, value) in [
            ("GDP_per_Capita", self.gdp_per_capita),
            ("Capacity_per_Capita_kW", self.capacity_per_capita_kw),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ctx(format!("{name} must be a non-negative number, got {v}")));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EnergyTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full validated table with pre-computed indices. Immutable after load.
#[derive(Debug, Clone)]
pub struct EnergyTable {
    /// All records (rows), in file order.
    pub rows: Vec<CountryYearRecord>,
    /// country → (year → row index). BTreeMap ordering keeps every
    /// derivation over it deterministic.
    pub by_country: BTreeMap<String, BTreeMap<u16, usize>>,
    /// Sorted unique country names (aggregates included).
    pub countries: Vec<String>,
    /// Sorted unique years present in the data.
    pub years: Vec<u16>,
}

impl EnergyTable {
    /// Validate rows and build the lookup indices.
    pub fn from_rows(mut rows: Vec<CountryYearRecord>) -> Result<Self, DataError> {
        let mut by_country: BTreeMap<String, BTreeMap<u16, usize>> = BTreeMap::new();
        let mut years: Vec<u16> = Vec::new();

        for (i, row) in rows.iter_mut().enumerate() {
            row.validate()?;

            // Derive the per-capita column when it is blank but derivable.
            if row.capacity_per_capita_kw.is_none() {
                if let Some(pop) = row.population {
                    // 1 GW = 1e6 kW
                    row.capacity_per_capita_kw = Some(row.total_gw * 1_000_000.0 / pop as f64);
                }
            }

            let per_year = by_country.entry(row.country.clone()).or_default();
            if per_year.insert(row.year, i).is_some() {
                return Err(DataError::Format(format!(
                    "duplicate record for {} in {}",
                    row.country, row.year
                )));
            }
            if !years.contains(&row.year) {
                years.push(row.year);
            }
        }
        years.sort_unstable();

        let countries: Vec<String> = by_country.keys().cloned().collect();
        Ok(EnergyTable {
            rows,
            by_country,
            countries,
            years,
        })
    }

    /// Look up the single record for an exact (country, year) pair.
    pub fn get(&self, country: &str, year: u16) -> Option<&CountryYearRecord> {
        let idx = *self.by_country.get(country)?.get(&year)?;
        Some(&self.rows[idx])
    }

    /// First and last year present in the data.
    pub fn year_span(&self) -> Option<(u16, u16)> {
        match (self.years.first(), self.years.last()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
