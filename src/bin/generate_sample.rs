use anyhow::{Context, Result};
use chrono::{Days, Local};

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

/// Writes `sample_bbm.csv`: a fuel log covering the last 40 days, oldest first,
/// with a few deliberately malformed rows the dashboard must tolerate.
fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let today = Local::now().date_naive();

    // (unit, typical litres per refuelling)
    let units = [
        ("DT-01", 180.0),
        ("DT-02", 175.0),
        ("DT-07", 160.0),
        ("EX-03", 320.0),
        ("EX-05", 290.0),
        ("GR-11", 120.0),
        ("LV-21", 45.0),
    ];
    let sites = ["Pit A", "Pit B", "Fuel Station 1", "Workshop"];

    let output_path = "sample_bbm.csv";
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output_path)
        .context("creating output file")?;
    writer.write_record(["WAKTU", "UNIT", "VOLUME", "LOKASI"])?;

    let mut rows = 0usize;
    for days_ago in (0..40u64).rev() {
        let Some(date) = today.checked_sub_days(Days::new(days_ago)) else {
            continue;
        };
        let per_day = 4 + rng.below(6);
        let mut minutes: Vec<usize> = (0..per_day).map(|_| 360 + rng.below(14 * 60)).collect();
        minutes.sort_unstable();

        for minute in minutes {
            let (unit, typical) = units[rng.below(units.len())];
            let volume = typical * (0.6 + 0.8 * rng.next_f64());
            let timestamp = format!(
                "{} {:02}:{:02}:{:02}",
                date.format("%Y-%m-%d"),
                minute / 60,
                minute % 60,
                rng.below(60)
            );
            let volume_text = format!("{volume:.1}");
            writer.write_record([
                timestamp.as_str(),
                unit,
                volume_text.as_str(),
                sites[rng.below(sites.len())],
            ])?;
            rows += 1;
        }
    }

    // Rows a hand-edited sheet tends to contain.
    writer.write_record(["", "DT-01", "50", "Pit A"])?;
    writer.write_record(["", "", "", ""])?;
    let late = format!("{} 23:10:00", today.format("%Y-%m-%d"));
    writer.write_record([late.as_str(), "LV-21", "n/a"])?;
    rows += 3;

    writer.flush().context("writing output file")?;

    println!("Wrote {rows} rows (plus header) to {output_path}");
    Ok(())
}
