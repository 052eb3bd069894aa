use serde::Serialize;

/// Dataset row matching the dashboard's expected CSV schema.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Entity")]
    entity: String,
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Year")]
    year: u16,
    #[serde(rename = "Solar_GW")]
    solar_gw: f64,
    #[serde(rename = "Wind_GW")]
    wind_gw: f64,
    #[serde(rename = "Hydro_GW")]
    hydro_gw: f64,
    #[serde(rename = "Total_GW")]
    total_gw: f64,
    #[serde(rename = "Population")]
    population: Option<u64>,
    #[serde(rename = "GDP_per_Capita")]
    gdp_per_capita: Option<f64>,
    #[serde(rename = "Capacity_per_Capita_kW")]
    capacity_per_capita_kw: Option<f64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Country {
    name: &'static str,
    code: &'static str,
    population_2010: u64,
    gdp_2010: Option<f64>,
    // 2010 capacity in GW and annual growth rate per source.
    solar: (f64, f64),
    wind: (f64, f64),
    hydro: (f64, f64),
}

fn countries() -> Vec<Country> {
    vec![
        Country { name: "China", code: "CHN", population_2010: 1_337_000_000, gdp_2010: Some(4_550.0), solar: (0.9, 0.48), wind: (29.6, 0.22), hydro: (216.0, 0.04) },
        Country { name: "United States", code: "USA", population_2010: 309_300_000, gdp_2010: Some(48_470.0), solar: (2.0, 0.35), wind: (39.1, 0.10), hydro: (78.8, 0.003) },
        Country { name: "India", code: "IND", population_2010: 1_234_000_000, gdp_2010: Some(1_350.0), solar: (0.1, 0.55), wind: (13.0, 0.10), hydro: (37.6, 0.02) },
        Country { name: "Germany", code: "DEU", population_2010: 81_800_000, gdp_2010: Some(41_530.0), solar: (18.0, 0.09), wind: (26.9, 0.06), hydro: (4.4, 0.002) },
        Country { name: "Brazil", code: "BRA", population_2010: 196_800_000, gdp_2010: Some(11_290.0), solar: (0.01, 0.65), wind: (0.9, 0.30), hydro: (80.7, 0.02) },
        Country { name: "Norway", code: "NOR", population_2010: 4_890_000, gdp_2010: Some(87_700.0), solar: (0.01, 0.30), wind: (0.4, 0.20), hydro: (29.7, 0.01) },
        Country { name: "Japan", code: "JPN", population_2010: 128_100_000, gdp_2010: Some(44_510.0), solar: (3.6, 0.22), wind: (2.3, 0.06), hydro: (49.0, 0.001) },
        Country { name: "Spain", code: "ESP", population_2010: 46_600_000, gdp_2010: Some(30_500.0), solar: (4.0, 0.12), wind: (20.7, 0.05), hydro: (18.5, 0.004) },
        Country { name: "Australia", code: "AUS", population_2010: 22_000_000, gdp_2010: Some(52_000.0), solar: (0.6, 0.35), wind: (2.0, 0.15), hydro: (8.0, 0.001) },
        Country { name: "Canada", code: "CAN", population_2010: 34_000_000, gdp_2010: Some(47_450.0), solar: (0.2, 0.30), wind: (4.0, 0.12), hydro: (75.0, 0.01) },
        // No GDP series: exercises the dashboard's missing-data exclusion.
        Country { name: "Iceland", code: "ISL", population_2010: 318_000, gdp_2010: None, solar: (0.0, 0.0), wind: (0.003, 0.25), hydro: (1.9, 0.01) },
        Country { name: "Denmark", code: "DNK", population_2010: 5_550_000, gdp_2010: Some(58_040.0), solar: (0.007, 0.45), wind: (3.8, 0.08), hydro: (0.009, 0.0) },
    ]
}

fn capacity(base: f64, rate: f64, years_in: u32, noise: f64) -> f64 {
    (base * (1.0 + rate).powi(years_in as i32) * (1.0 + noise)).max(0.0)
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let mut rows: Vec<Row> = Vec::new();

    for year in 2010u16..=2023 {
        let years_in = (year - 2010) as u32;
        let mut world_solar = 0.0;
        let mut world_wind = 0.0;
        let mut world_hydro = 0.0;
        let mut world_pop: u64 = 0;

        for c in countries() {
            let solar = capacity(c.solar.0, c.solar.1, years_in, rng.gauss(0.0, 0.02));
            let wind = capacity(c.wind.0, c.wind.1, years_in, rng.gauss(0.0, 0.02));
            let hydro = capacity(c.hydro.0, c.hydro.1, years_in, rng.gauss(0.0, 0.01));
            let total = solar + wind + hydro;

            let population =
                (c.population_2010 as f64 * 1.009f64.powi(years_in as i32)) as u64;
            let gdp = c
                .gdp_2010
                .map(|g| g * 1.025f64.powi(years_in as i32) * (1.0 + rng.gauss(0.0, 0.03)));

            world_solar += solar;
            world_wind += wind;
            world_hydro += hydro;
            world_pop += population;

            rows.push(Row {
                entity: c.name.to_string(),
                code: c.code.to_string(),
                year,
                solar_gw: solar,
                wind_gw: wind,
                hydro_gw: hydro,
                total_gw: total,
                population: Some(population),
                gdp_per_capita: gdp,
                capacity_per_capita_kw: Some(total * 1_000_000.0 / population as f64),
            });
        }

        let world_total = world_solar + world_wind + world_hydro;
        rows.push(Row {
            entity: "World".to_string(),
            code: "OWID_WRL".to_string(),
            year,
            solar_gw: world_solar,
            wind_gw: world_wind,
            hydro_gw: world_hydro,
            total_gw: world_total,
            population: Some(world_pop),
            gdp_per_capita: None,
            capacity_per_capita_kw: Some(world_total * 1_000_000.0 / world_pop as f64),
        });
    }

    let output_path = "final_renewables_dataset.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    let n_rows = rows.len();
    for row in rows {
        writer.serialize(row).expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");

    println!("Wrote {n_rows} rows to {output_path}");
}
