use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

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

/// Last day of `month` in `year`.
fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// (capital, annual mean °C, seasonal amplitude °C). Southern hemisphere:
/// warmest around January.
const CAPITALS: [(&str, f64, f64); 3] = [
    ("Brasília", 21.5, 1.8),
    ("Curitiba", 17.5, 4.0),
    ("Recife", 26.5, 1.2),
];

/// Warming trend per year.
const TREND_PER_YEAR: f64 = 0.04;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_temperatures.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(["DATA MEDIÇÃO", "CAPITAL", "TEMP. MÉDIA MENSAL"])?;

    let mut rows = 0;
    for year in 2015..2025 {
        for month in 1..=12 {
            let date = month_end(year, month).context("invalid calendar month")?;
            let phase = 2.0 * std::f64::consts::PI * (date.month0() as f64) / 12.0;
            for &(capital, mean, amplitude) in &CAPITALS {
                let expected =
                    mean + amplitude * phase.cos() + TREND_PER_YEAR * (year - 2015) as f64;
                let value = rng.gauss(expected, 0.6);
                writer.write_record([
                    date.to_string(),
                    capital.to_string(),
                    format!("{value:.2}"),
                ])?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing output file")?;

    println!("Wrote {rows} monthly observations to {output_path}");
    Ok(())
}
