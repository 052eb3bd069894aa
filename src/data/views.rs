use std::collections::BTreeMap;

use thiserror::Error;

use super::model::{EnergyTable, YEAR_MAX, YEAR_MIN};

// ---------------------------------------------------------------------------
// View outputs
// ---------------------------------------------------------------------------

/// Recoverable "no record for this filter combination" error. The UI shows an
/// empty state for the affected view instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no record for {country} in {year}")]
pub struct NoRecord {
    pub country: String,
    pub year: u16,
}

/// Capacity snapshot of one (country, year) record.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub solar_gw: f64,
    pub wind_gw: f64,
    pub hydro_gw: f64,
    pub total_gw: f64,
    pub capacity_per_capita_kw: Option<f64>,
}

/// Normalized global source shares for one year; the three shares sum to 1.0
/// unless the year's total is zero, in which case all are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct MixShares {
    pub year: u16,
    pub solar: f64,
    pub wind: f64,
    pub hydro: f64,
}

/// Absolute global capacity per source for one year, in GW.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTotals {
    pub year: u16,
    pub solar_gw: f64,
    pub wind_gw: f64,
    pub hydro_gw: f64,
}

/// One country's growth ranking entry with its full charted series.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthSeries {
    pub country: String,
    /// total[end_year] - total[start_year], missing endpoints counted as 0.
    pub growth_gw: f64,
    /// (year, total_gw) for every year the country has a record, ascending.
    pub series: Vec<(u16, f64)>,
}

/// One point of the GDP vs capacity-per-capita scatter.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    pub gdp_per_capita: f64,
    pub capacity_per_capita_kw: f64,
    pub population: u64,
}

/// One entry of the per-capita ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct PerCapitaEntry {
    pub country: String,
    pub capacity_per_capita_kw: f64,
}

/// One country tile of the capacity map (country code → scalar).
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub code: String,
    pub country: String,
    pub total_gw: f64,
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------
//
// All functions are pure over (&EnergyTable, parameters) and rebuild fresh
// output structures on every call. Aggregate rows (World, OWID_* regions)
// are excluded everywhere except `snapshot_for`.

/// The capacity snapshot for an exact (country, year) pair.
pub fn snapshot_for(table: &EnergyTable, country: &str, year: u16) -> Result<Snapshot, NoRecord> {
    let row = table.get(country, year).ok_or_else(|| NoRecord {
        country: country.to_string(),
        year,
    })?;
    Ok(Snapshot {
        solar_gw: row.solar_gw,
        wind_gw: row.wind_gw,
        hydro_gw: row.hydro_gw,
        total_gw: row.total_gw,
        capacity_per_capita_kw: row.capacity_per_capita_kw,
    })
}

/// Global source shares per year across the whole supported range.
pub fn global_mix_by_year(table: &EnergyTable) -> Vec<MixShares> {
    let sums = global_sums(table);
    (YEAR_MIN..=YEAR_MAX)
        .map(|year| {
            let [solar, wind, hydro] = sums.get(&year).copied().unwrap_or([0.0; 3]);
            let total = solar + wind + hydro;
            if total > 0.0 {
                MixShares {
                    year,
                    solar: solar / total,
                    wind: wind / total,
                    hydro: hydro / total,
                }
            } else {
                MixShares {
                    year,
                    solar: 0.0,
                    wind: 0.0,
                    hydro: 0.0,
                }
            }
        })
        .collect()
}

/// Absolute global capacity per source per year (feeds the stacked area).
pub fn global_totals_by_year(table: &EnergyTable) -> Vec<SourceTotals> {
    let sums = global_sums(table);
    (YEAR_MIN..=YEAR_MAX)
        .map(|year| {
            let [solar_gw, wind_gw, hydro_gw] = sums.get(&year).copied().unwrap_or([0.0; 3]);
            SourceTotals {
                year,
                solar_gw,
                wind_gw,
                hydro_gw,
            }
        })
        .collect()
}

fn global_sums(table: &EnergyTable) -> BTreeMap<u16, [f64; 3]> {
    let mut sums: BTreeMap<u16, [f64; 3]> = BTreeMap::new();
    for row in table.rows.iter().filter(|r| !r.is_aggregate()) {
        let entry = sums.entry(row.year).or_default();
        entry[0] += row.solar_gw;
        entry[1] += row.wind_gw;
        entry[2] += row.hydro_gw;
    }
    sums
}

/// The n countries with the highest total-capacity growth between the two
/// years, each with its full per-year series. A missing endpoint year counts
/// as 0 GW. Ordered by growth descending, ties broken by name ascending.
pub fn top_n_growth(
    table: &EnergyTable,
    n: usize,
    start_year: u16,
    end_year: u16,
) -> Vec<GrowthSeries> {
    let mut ranked: Vec<GrowthSeries> = table
        .by_country
        .iter()
        .filter(|(country, _)| !is_aggregate_country(table, country))
        .map(|(country, per_year)| {
            let total_at = |year: u16| {
                per_year
                    .get(&year)
                    .map(|&i| table.rows[i].total_gw)
                    .unwrap_or(0.0)
            };
            GrowthSeries {
                country: country.clone(),
                growth_gw: total_at(end_year) - total_at(start_year),
                series: per_year
                    .iter()
                    .map(|(&year, &i)| (year, table.rows[i].total_gw))
                    .collect(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.growth_gw
            .total_cmp(&a.growth_gw)
            .then_with(|| a.country.cmp(&b.country))
    });
    ranked.truncate(n);
    ranked
}

/// Scatter points for every non-aggregate country that has a record in the
/// given year carrying all three values. Countries missing any of them are
/// excluded, not defaulted. Ordered by country name ascending.
pub fn gdp_vs_capacity_per_capita(table: &EnergyTable, year: u16) -> Vec<ScatterPoint> {
    table
        .by_country
        .iter()
        .filter_map(|(country, per_year)| {
            let row = &table.rows[*per_year.get(&year)?];
            if row.is_aggregate() {
                return None;
            }
            Some(ScatterPoint {
                country: country.clone(),
                gdp_per_capita: row.gdp_per_capita?,
                capacity_per_capita_kw: row.capacity_per_capita_kw?,
                population: row.population?,
            })
        })
        .collect()
}

/// Top n countries by capacity-per-capita for the given year, descending,
/// ties broken by name ascending. Countries without a per-capita value for
/// that year are excluded.
pub fn top_n_per_capita(table: &EnergyTable, n: usize, year: u16) -> Vec<PerCapitaEntry> {
    let mut ranked: Vec<PerCapitaEntry> = table
        .by_country
        .iter()
        .filter_map(|(country, per_year)| {
            let row = &table.rows[*per_year.get(&year)?];
            if row.is_aggregate() {
                return None;
            }
            Some(PerCapitaEntry {
                country: country.clone(),
                capacity_per_capita_kw: row.capacity_per_capita_kw?,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.capacity_per_capita_kw
            .total_cmp(&a.capacity_per_capita_kw)
            .then_with(|| a.country.cmp(&b.country))
    });
    ranked.truncate(n);
    ranked
}

/// Total capacity per country for the given year (the map view's
/// code → scalar input), ordered by value descending, ties by name.
pub fn capacity_by_country(table: &EnergyTable, year: u16) -> Vec<MapEntry> {
    let mut entries: Vec<MapEntry> = table
        .by_country
        .iter()
        .filter_map(|(country, per_year)| {
            let row = &table.rows[*per_year.get(&year)?];
            if row.is_aggregate() {
                return None;
            }
            Some(MapEntry {
                code: row.code.clone(),
                country: country.clone(),
                total_gw: row.total_gw,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_gw
            .total_cmp(&a.total_gw)
            .then_with(|| a.country.cmp(&b.country))
    });
    entries
}

fn is_aggregate_country(table: &EnergyTable, country: &str) -> bool {
    table
        .by_country
        .get(country)
        .and_then(|per_year| per_year.values().next())
        .map(|&i| table.rows[i].is_aggregate())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CountryYearRecord;

    const TOL: f64 = 1e-12;

    fn row(country: &str, year: u16, solar: f64, wind: f64, hydro: f64) -> CountryYearRecord {
        let total = solar + wind + hydro;
        CountryYearRecord {
            country: country.to_string(),
            code: country[..country.len().min(3)].to_ascii_uppercase(),
            year,
            solar_gw: solar,
            wind_gw: wind,
            hydro_gw: hydro,
            total_gw: total,
            population: Some(1_000_000),
            gdp_per_capita: Some(20_000.0),
            capacity_per_capita_kw: Some(total),
        }
    }

    fn world(year: u16, solar: f64, wind: f64, hydro: f64) -> CountryYearRecord {
        let mut r = row("World", year, solar, wind, hydro);
        r.code = "OWID_WRL".to_string();
        r
    }

    fn table(rows: Vec<CountryYearRecord>) -> EnergyTable {
        EnergyTable::from_rows(rows).unwrap()
    }

    #[test]
    fn snapshot_matches_source_row() {
        let t = table(vec![row("Alpha", 2020, 2.0, 3.0, 5.0)]);
        let snap = snapshot_for(&t, "Alpha", 2020).unwrap();
        assert_eq!(snap.solar_gw, 2.0);
        assert_eq!(snap.wind_gw, 3.0);
        assert_eq!(snap.hydro_gw, 5.0);
        assert_eq!(snap.total_gw, 10.0);
        assert_eq!(snap.capacity_per_capita_kw, Some(10.0));
    }

    #[test]
    fn snapshot_for_absent_pair_is_no_record() {
        let t = table(vec![row("Alpha", 2020, 2.0, 3.0, 5.0)]);
        let err = snapshot_for(&t, "Alpha", 2021).unwrap_err();
        assert_eq!(
            err,
            NoRecord {
                country: "Alpha".to_string(),
                year: 2021
            }
        );
        assert!(snapshot_for(&t, "Beta", 2020).is_err());
    }

    #[test]
    fn global_mix_matches_worked_example() {
        // Alpha 2020: 2/3/5 (total 10), Beta 2020: 1/1/1 (total 3).
        let t = table(vec![
            row("Alpha", 2020, 2.0, 3.0, 5.0),
            row("Beta", 2020, 1.0, 1.0, 1.0),
        ]);
        let mix = global_mix_by_year(&t);
        let y2020 = mix.iter().find(|m| m.year == 2020).unwrap();
        assert!((y2020.solar - 3.0 / 13.0).abs() < TOL);
        assert!((y2020.wind - 4.0 / 13.0).abs() < TOL);
        assert!((y2020.hydro - 6.0 / 13.0).abs() < TOL);
    }

    #[test]
    fn global_mix_shares_sum_to_one_or_are_all_zero() {
        let t = table(vec![
            row("Alpha", 2020, 2.0, 3.0, 5.0),
            row("Beta", 2020, 1.0, 1.0, 1.0),
            row("Alpha", 2021, 0.0, 0.0, 0.0),
        ]);
        for m in global_mix_by_year(&t) {
            let sum = m.solar + m.wind + m.hydro;
            if m.year == 2020 {
                assert!((sum - 1.0).abs() < 1e-9, "year {}: sum {sum}", m.year);
            } else {
                // No data or all-zero capacity: shares are all zero.
                assert_eq!((m.solar, m.wind, m.hydro), (0.0, 0.0, 0.0));
            }
        }
    }

    #[test]
    fn global_views_exclude_aggregate_rows() {
        let t = table(vec![
            row("Alpha", 2020, 2.0, 3.0, 5.0),
            world(2020, 100.0, 100.0, 100.0),
        ]);
        let totals = global_totals_by_year(&t);
        let y2020 = totals.iter().find(|s| s.year == 2020).unwrap();
        assert_eq!((y2020.solar_gw, y2020.wind_gw, y2020.hydro_gw), (2.0, 3.0, 5.0));

        assert!(capacity_by_country(&t, 2020).iter().all(|e| e.country != "World"));
        assert!(top_n_growth(&t, 10, 2010, 2023).iter().all(|g| g.country != "World"));
        assert!(gdp_vs_capacity_per_capita(&t, 2020).iter().all(|p| p.country != "World"));
        assert!(top_n_per_capita(&t, 10, 2020).iter().all(|e| e.country != "World"));
    }

    #[test]
    fn top_growth_ranks_five_distinct_countries_descending() {
        let mut rows = Vec::new();
        // Six countries; growth between 2010 and 2023 is i * 10 GW.
        for (i, name) in ["Ca", "Ba", "Fa", "Da", "Ea", "Aa"].iter().enumerate() {
            rows.push(row(name, 2010, 1.0, 1.0, 1.0));
            rows.push(row(name, 2023, 1.0 + (i + 1) as f64 * 10.0, 1.0, 1.0));
        }
        let top = top_n_growth(&table(rows), 5, 2010, 2023);

        assert_eq!(top.len(), 5);
        let names: Vec<&str> = top.iter().map(|g| g.country.as_str()).collect();
        assert_eq!(names, vec!["Aa", "Ea", "Da", "Fa", "Ba"]);
        for pair in top.windows(2) {
            assert!(pair[0].growth_gw >= pair[1].growth_gw);
        }
        // Each entry carries its ordered per-year series.
        assert_eq!(top[0].series, vec![(2010, 3.0), (2023, 63.0)]);
    }

    #[test]
    fn top_growth_breaks_ties_by_name_ascending() {
        let t = table(vec![
            row("Beta", 2010, 1.0, 0.0, 0.0),
            row("Beta", 2023, 6.0, 0.0, 0.0),
            row("Alpha", 2010, 2.0, 0.0, 0.0),
            row("Alpha", 2023, 7.0, 0.0, 0.0),
        ]);
        let top = top_n_growth(&t, 2, 2010, 2023);
        assert_eq!(top[0].country, "Alpha");
        assert_eq!(top[1].country, "Beta");
        assert_eq!(top[0].growth_gw, top[1].growth_gw);
    }

    #[test]
    fn top_growth_counts_missing_endpoint_as_zero() {
        let t = table(vec![
            // No 2010 record: growth is the full 2023 total.
            row("Alpha", 2023, 4.0, 4.0, 4.0),
            row("Beta", 2010, 1.0, 1.0, 1.0),
            row("Beta", 2023, 2.0, 2.0, 2.0),
        ]);
        let top = top_n_growth(&t, 2, 2010, 2023);
        assert_eq!(top[0].country, "Alpha");
        assert_eq!(top[0].growth_gw, 12.0);
        assert_eq!(top[1].growth_gw, 3.0);
        // The charted series only contains years that exist.
        assert_eq!(top[0].series, vec![(2023, 12.0)]);
    }

    #[test]
    fn scatter_excludes_countries_missing_data() {
        let mut no_gdp = row("NoGdp", 2020, 1.0, 1.0, 1.0);
        no_gdp.gdp_per_capita = None;
        let mut no_pop = row("NoPop", 2020, 1.0, 1.0, 1.0);
        no_pop.population = None;
        no_pop.capacity_per_capita_kw = Some(3.0);

        let t = table(vec![
            row("Alpha", 2020, 2.0, 3.0, 5.0),
            row("Beta", 2020, 1.0, 1.0, 1.0),
            row("Gamma", 2021, 1.0, 1.0, 1.0), // wrong year
            no_gdp,
            no_pop,
        ]);
        let points = gdp_vs_capacity_per_capita(&t, 2020);
        let names: Vec<&str> = points.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(points[0].gdp_per_capita, 20_000.0);
        assert_eq!(points[0].population, 1_000_000);
    }

    #[test]
    fn top_per_capita_returns_exactly_n_sorted_descending() {
        let mut rows = Vec::new();
        for i in 0..12 {
            let name = format!("C{i:02}");
            let mut r = row(&name, 2020, i as f64, 0.0, 0.0);
            r.capacity_per_capita_kw = Some(i as f64);
            rows.push(r);
        }
        let top = top_n_per_capita(&table(rows), 10, 2020);

        assert_eq!(top.len(), 10);
        assert_eq!(top[0].country, "C11");
        assert_eq!(top[0].capacity_per_capita_kw, 11.0);
        for pair in top.windows(2) {
            assert!(pair[0].capacity_per_capita_kw >= pair[1].capacity_per_capita_kw);
        }
    }

    #[test]
    fn top_per_capita_breaks_ties_by_name_and_skips_missing() {
        let mut no_value = row("Missing", 2020, 9.0, 0.0, 0.0);
        no_value.population = None;
        no_value.capacity_per_capita_kw = None;

        let t = table(vec![
            row("Beta", 2020, 5.0, 0.0, 0.0),
            row("Alpha", 2020, 5.0, 0.0, 0.0),
            no_value,
        ]);
        let top = top_n_per_capita(&t, 10, 2020);
        let names: Vec<&str> = top.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn capacity_map_orders_by_value_descending() {
        let t = table(vec![
            row("Small", 2020, 1.0, 0.0, 0.0),
            row("Big", 2020, 9.0, 9.0, 9.0),
            row("Mid", 2020, 5.0, 0.0, 0.0),
        ]);
        let entries = capacity_by_country(&t, 2020);
        let names: Vec<&str> = entries.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(names, vec!["Big", "Mid", "Small"]);
        assert_eq!(entries[0].code, "BIG");
    }
}
