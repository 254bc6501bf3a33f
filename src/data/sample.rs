//! Built-in deterministic penguin sample.
//!
//! Mirrors the shape of the published Palmer Penguins table: 344 rows in
//! species blocks (Adelie 152, Gentoo 124, Chinstrap 68), per-species
//! measurement distributions close to the real ones, two rows with every
//! measurement missing and eleven rows with unknown sex.

use super::model::{Dataset, Observation};

struct SpeciesProfile {
    name: &'static str,
    /// (island, rows) blocks, in row order.
    islands: &'static [(&'static str, usize)],
    /// (mean, std-dev) for bill length, bill depth, flipper length, body mass.
    bill_length: (f64, f64),
    bill_depth: (f64, f64),
    flipper_length: (f64, f64),
    body_mass: (f64, f64),
    /// Row offsets (within the species block) with every measurement missing.
    all_missing: &'static [usize],
    /// Row offsets with unknown sex.
    sex_missing: &'static [usize],
}

const PROFILES: [SpeciesProfile; 3] = [
    SpeciesProfile {
        name: "Adelie",
        islands: &[("Torgersen", 52), ("Biscoe", 44), ("Dream", 56)],
        bill_length: (38.8, 2.66),
        bill_depth: (18.3, 1.22),
        flipper_length: (190.0, 6.54),
        body_mass: (3700.0, 458.6),
        all_missing: &[3],
        sex_missing: &[3, 8, 9, 10, 11, 47],
    },
    SpeciesProfile {
        name: "Gentoo",
        islands: &[("Biscoe", 124)],
        bill_length: (47.5, 3.08),
        bill_depth: (15.0, 0.98),
        flipper_length: (217.2, 6.48),
        body_mass: (5076.0, 504.1),
        all_missing: &[123],
        sex_missing: &[8, 46, 64, 118, 123],
    },
    SpeciesProfile {
        name: "Chinstrap",
        islands: &[("Dream", 68)],
        bill_length: (48.8, 3.34),
        bill_depth: (18.4, 1.14),
        flipper_length: (195.8, 7.13),
        body_mass: (3733.0, 384.3),
        all_missing: &[],
        sex_missing: &[],
    },
];

const YEARS: [i64; 3] = [2007, 2008, 2009];

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
    fn gauss(&mut self, (mean, std_dev): (f64, f64)) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round_to(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// The 344-row sample dataset.
pub fn penguins() -> Dataset {
    Dataset::from_rows(observations(42))
}

fn observations(seed: u64) -> Vec<Observation> {
    let mut rng = SimpleRng::new(seed);
    let mut rows = Vec::with_capacity(344);

    for profile in &PROFILES {
        let islands = profile
            .islands
            .iter()
            .flat_map(|&(island, n)| std::iter::repeat(island).take(n));

        for (offset, island) in islands.enumerate() {
            // Draw even for missing rows so the stream stays aligned.
            let bill_length = round_to(rng.gauss(profile.bill_length), 0.1);
            let bill_depth = round_to(rng.gauss(profile.bill_depth), 0.1);
            let flipper_length = rng.gauss(profile.flipper_length).round();
            let body_mass = round_to(rng.gauss(profile.body_mass), 25.0);

            let measured = !profile.all_missing.contains(&offset);
            let sex = (!profile.sex_missing.contains(&offset))
                .then(|| (if offset % 2 == 0 { "male" } else { "female" }).to_string());

            rows.push(Observation {
                species: profile.name.to_string(),
                island: Some(island.to_string()),
                bill_length_mm: measured.then_some(bill_length),
                bill_depth_mm: measured.then_some(bill_depth),
                flipper_length_mm: measured.then_some(flipper_length),
                body_mass_g: measured.then_some(body_mass),
                sex,
                year: Some(YEARS[offset * YEARS.len() / profile_len(profile)]),
            });
        }
    }
    rows
}

fn profile_len(profile: &SpeciesProfile) -> usize {
    profile.islands.iter().map(|&(_, n)| n).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_published_shape() {
        let ds = penguins();
        assert_eq!(ds.len(), 344);
        let counts = ds.species_counts();
        assert_eq!(counts.get("Adelie"), Some(&152));
        assert_eq!(counts.get("Gentoo"), Some(&124));
        assert_eq!(counts.get("Chinstrap"), Some(&68));
        assert_eq!(ds.species(), ["Adelie", "Gentoo", "Chinstrap"]);
    }

    #[test]
    fn missing_values_match_published_gaps() {
        let ds = penguins();
        let no_mass = ds.rows().iter().filter(|o| o.body_mass_g.is_none()).count();
        let no_sex = ds.rows().iter().filter(|o| o.sex.is_none()).count();
        assert_eq!(no_mass, 2);
        assert_eq!(no_sex, 11);
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(observations(42), observations(42));
        assert_ne!(observations(42), observations(7));
    }

    #[test]
    fn gentoo_are_heaviest_on_average() {
        let ds = penguins();
        let mean = |species: &str| {
            let masses: Vec<f64> = ds
                .rows()
                .iter()
                .filter(|o| o.species == species)
                .filter_map(|o| o.body_mass_g)
                .collect();
            masses.iter().sum::<f64>() / masses.len() as f64
        };
        assert!(mean("Gentoo") > mean("Adelie") + 800.0);
        assert!(mean("Gentoo") > mean("Chinstrap") + 800.0);
    }
}
