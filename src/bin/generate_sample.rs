//! Writes a synthetic survey file in the awkward shape real exports come in:
//! `;`-delimited, decimal commas, blank cells and the odd truncated row.

use anyhow::{Context, Result};
use csv::WriterBuilder;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// (abbr, name, lon, lat)
const LOCATIONS: [(&str, &str, f64, f64); 10] = [
    ("AL", "Alabama", -86.63186, 32.84057),
    ("AZ", "Arizona", -111.76381, 34.86597),
    ("CA", "California", -120.99999, 37.63864),
    ("FL", "Florida", -81.92896, 28.93204),
    ("IL", "Illinois", -88.99771, 40.48501),
    ("NY", "New York", -75.54397, 42.82700),
    ("OH", "Ohio", -82.40426, 40.06021),
    ("OR", "Oregon", -120.15503, 44.56745),
    ("TX", "Texas", -99.42677, 31.82724),
    ("WA", "Washington", -120.47001, 47.52227),
];

/// (topic, typical prevalence %)
const TOPICS: [(&str, f64); 4] = [
    ("Subjective cognitive decline or memory loss among older adults", 11.0),
    ("Obesity", 30.0),
    ("Frequent mental distress", 12.0),
    ("Lifetime diagnosis of depression", 18.0),
];

const AGE_GROUPS: [&str; 3] = ["50-64 years", "65 years or older", "Overall"];

const STRATA: [&str; 5] = ["Overall", "Female", "Male", "Hispanic", "White, non-Hispanic"];

fn decimal_comma(v: f64) -> String {
    format!("{v:.1}").replace('.', ",")
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_survey.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer.write_record([
        "Topic",
        "Age Group",
        "LocationAbbr",
        "LocationDesc",
        "Stratification1",
        "Data_Value",
        "Low_Confidence_Limit",
        "High_Confidence_Limit",
        "Geolocation",
    ])?;

    let mut rows = 0usize;
    let mut truncated = 0usize;
    for &(topic, base) in &TOPICS {
        for &age in &AGE_GROUPS {
            for &(abbr, name, lon, lat) in &LOCATIONS {
                for &stratum in &STRATA {
                    if rng.chance(0.01) {
                        writer.write_record([topic, age, abbr])?;
                        truncated += 1;
                        continue;
                    }

                    let value = base * (0.7 + 0.6 * rng.next_f64());
                    let margin = 1.0 + 3.0 * rng.next_f64();
                    let (data, low, high) = if rng.chance(0.05) {
                        (String::new(), String::new(), String::new())
                    } else {
                        (
                            decimal_comma(value),
                            decimal_comma(value - margin),
                            decimal_comma(value + margin),
                        )
                    };
                    let geolocation = if rng.chance(0.02) {
                        String::new()
                    } else {
                        format!("POINT ({lon} {lat})")
                    };

                    writer.write_record([
                        topic,
                        age,
                        abbr,
                        name,
                        stratum,
                        data.as_str(),
                        low.as_str(),
                        high.as_str(),
                        geolocation.as_str(),
                    ])?;
                    rows += 1;
                }
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows ({truncated} truncated) to {output_path}");
    Ok(())
}
