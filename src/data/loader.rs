use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

use super::model::{CountryYearRecord, EnergyTable};

/// Fixed dataset path, resolved against the working directory.
pub const DATASET_PATH: &str = "final_renewables_dataset.csv";

/// Columns the CSV must carry. Checked up front so a schema mismatch reads
/// as "missing column" instead of a per-row deserialization error.
const REQUIRED_COLUMNS: [&str; 10] = [
    "Entity",
    "Code",
    "Year",
    "Solar_GW",
    "Wind_GW",
    "Hydro_GW",
    "Total_GW",
    "Population",
    "GDP_per_Capita",
    "Capacity_per_Capita_kW",
];

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Loading failures. Both variants are fatal at startup.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset not found at {path}")]
    NotFound { path: PathBuf },
    #[error("dataset format error: {0}")]
    Format(String),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

static TABLE: OnceLock<EnergyTable> = OnceLock::new();

/// Load the dataset from [`DATASET_PATH`], caching the parsed table for the
/// process lifetime. Repeated calls return the same reference without
/// touching the file again.
pub fn load() -> Result<&'static EnergyTable, DataError> {
    if let Some(table) = TABLE.get() {
        return Ok(table);
    }
    let table = load_path(Path::new(DATASET_PATH))?;
    log::info!(
        "loaded {} records covering {} entities",
        table.len(),
        table.countries.len()
    );
    Ok(TABLE.get_or_init(|| table))
}

/// Parse and validate a dataset file. Uncached; `load()` and tests go
/// through here.
pub fn load_path(path: &Path) -> Result<EnergyTable, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::Format(format!("opening CSV: {e}")))?;

    let headers = reader
        .headers()
        .map_err(|e| DataError::Format(format!("reading CSV headers: {e}")))?;
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DataError::Format(format!("missing column '{col}'")));
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<CountryYearRecord>().enumerate() {
        let record = result.map_err(|e| DataError::Format(format!("CSV row {row_no}: {e}")))?;
        rows.push(record);
    }

    EnergyTable::from_rows(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Entity,Code,Year,Solar_GW,Wind_GW,Hydro_GW,Total_GW,Population,GDP_per_Capita,Capacity_per_Capita_kW";

    /// Write a CSV to a unique temp path; removed on drop.
    struct TempCsv(PathBuf);

    impl TempCsv {
        fn new(name: &str, body: &str) -> Self {
            let path = std::env::temp_dir().join(format!("renewatch-{name}-{}.csv", std::process::id()));
            std::fs::write(&path, body).unwrap();
            TempCsv(path)
        }
    }

    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_path(Path::new("/nonexistent/renewables.csv")).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[test]
    fn parses_a_well_formed_file() {
        let csv = TempCsv::new(
            "ok",
            &format!(
                "{HEADER}\n\
                 Alpha,ALP,2020,2.0,3.0,5.0,10.0,1000000,25000.0,10.0\n\
                 Beta,BET,2020,1.0,1.0,1.0,3.0,500000,12000.0,6.0\n"
            ),
        );
        let table = load_path(&csv.0).unwrap();
        assert_eq!(table.len(), 2);

        let alpha = table.get("Alpha", 2020).unwrap();
        assert_eq!(alpha.code, "ALP");
        assert_eq!(alpha.solar_gw, 2.0);
        assert_eq!(alpha.population, Some(1_000_000));
    }

    #[test]
    fn missing_column_is_a_format_error() {
        let csv = TempCsv::new(
            "nocol",
            "Entity,Code,Year,Solar_GW,Wind_GW,Hydro_GW,Total_GW,Population,GDP_per_Capita\n\
             Alpha,ALP,2020,2.0,3.0,5.0,10.0,1000000,25000.0\n",
        );
        let err = load_path(&csv.0).unwrap_err();
        assert!(err.to_string().contains("missing column 'Capacity_per_Capita_kW'"));
    }

    #[test]
    fn unparseable_cell_is_a_format_error() {
        let csv = TempCsv::new(
            "badcell",
            &format!("{HEADER}\nAlpha,ALP,2020,not-a-number,3.0,5.0,10.0,1000000,25000.0,10.0\n"),
        );
        let err = load_path(&csv.0).unwrap_err();
        assert!(matches!(err, DataError::Format(_)));
        assert!(err.to_string().contains("CSV row 0"));
    }

    #[test]
    fn duplicate_pair_is_a_format_error() {
        let csv = TempCsv::new(
            "dup",
            &format!(
                "{HEADER}\n\
                 Alpha,ALP,2020,2.0,3.0,5.0,10.0,1000000,25000.0,10.0\n\
                 Alpha,ALP,2020,1.0,1.0,1.0,3.0,1000000,25000.0,3.0\n"
            ),
        );
        let err = load_path(&csv.0).unwrap_err();
        assert!(err.to_string().contains("duplicate record"));
    }

    #[test]
    fn blank_optional_cells_become_none() {
        let csv = TempCsv::new(
            "blanks",
            &format!("{HEADER}\nAlpha,ALP,2020,2.0,3.0,5.0,10.0,,,\n"),
        );
        let table = load_path(&csv.0).unwrap();
        let alpha = table.get("Alpha", 2020).unwrap();
        assert_eq!(alpha.population, None);
        assert_eq!(alpha.gdp_per_capita, None);
        assert_eq!(alpha.capacity_per_capita_kw, None);
    }
}
