use crate::data::model::{DatasetView, NumericAttribute};

// ---------------------------------------------------------------------------
// Bins – shared equal-width edges
// ---------------------------------------------------------------------------

/// Equal-width bin edges. `edges.len() == count() + 1`, or empty when there
/// was nothing to bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    /// `bins` equal-width bins spanning the present values. A single distinct
    /// value gets one bin of width 1 centred on it.
    pub fn spanning(values: &[f64], bins: u32) -> Self {
        let Some((min, max)) = min_max(values) else {
            return Bins { edges: Vec::new() };
        };
        if max - min <= f64::EPSILON * max.abs().max(1.0) {
            return Bins {
                edges: vec![min - 0.5, min + 0.5],
            };
        }
        let bins = bins.max(1);
        // Interpolate so a range wider than f64::MAX still yields finite edges.
        let mut edges: Vec<f64> = (0..bins)
            .map(|i| {
                let t = f64::from(i) / f64::from(bins);
                min * (1.0 - t) + max * t
            })
            .collect();
        edges.push(max);
        Bins { edges }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0)
    }

    /// Bin holding `value`. The last bin is closed on the right.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        let (&first, &last) = (self.edges.first()?, self.edges.last()?);
        if self.count() == 0 || !(first..=last).contains(&value) {
            return None;
        }
        let raw = self.edges.partition_point(|&edge| edge <= value) - 1;
        Some(raw.min(self.count() - 1))
    }

    fn tally(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0; self.count()];
        for &v in values {
            if let Some(slot) = self.index_of(v).and_then(|i| counts.get_mut(i)) {
                *slot += 1;
            }
        }
        counts
    }
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Split measurements into present values and a missing count.
fn present_values(values: impl IntoIterator<Item = Option<f64>>) -> (Vec<f64>, usize) {
    let mut present = Vec::new();
    let mut missing = 0;
    for v in values {
        match v {
            Some(x) if x.is_finite() => present.push(x),
            _ => missing += 1,
        }
    }
    (present, missing)
}

// ---------------------------------------------------------------------------
// Histogram – single series (distribution card)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Bins,
    pub counts: Vec<usize>,
    /// Values excluded because they were absent or not finite.
    pub missing: usize,
}

impl Histogram {
    pub fn equal_width(values: impl IntoIterator<Item = Option<f64>>, bins: u32) -> Self {
        let (present, missing) = present_values(values);
        let bins = Bins::spanning(&present, bins);
        let counts = bins.tally(&present);
        Histogram {
            bins,
            counts,
            missing,
        }
    }

    /// Histogram of `attribute` over the rows of `view`.
    pub fn of(view: &DatasetView, attribute: NumericAttribute, bins: u32) -> Self {
        Self::equal_width(view.iter().map(|obs| attribute.value_of(obs)), bins)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// StackedHistogram – counts split by species (overview card)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCounts {
    pub species: String,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackedHistogram {
    pub bins: Bins,
    /// One layer per species, bottom to top, in order of first appearance.
    pub layers: Vec<SpeciesCounts>,
    pub missing: usize,
}

impl StackedHistogram {
    /// Shared edges over all present values, counts split per species.
    pub fn by_species(view: &DatasetView, attribute: NumericAttribute, bins: u32) -> Self {
        let (present, missing) = present_values(view.iter().map(|obs| attribute.value_of(obs)));
        let bins = Bins::spanning(&present, bins);

        let layers = view
            .species()
            .into_iter()
            .map(|species| {
                let (values, _) = present_values(
                    view.iter()
                        .filter(|obs| obs.species == species)
                        .map(|obs| attribute.value_of(obs)),
                );
                SpeciesCounts {
                    species: species.to_string(),
                    counts: bins.tally(&values),
                }
            })
            .collect();

        StackedHistogram {
            bins,
            layers,
            missing,
        }
    }

    pub fn total(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.counts.iter().sum::<usize>())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// ScatterSeries – one point cloud per species
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPoints {
    pub species: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub x: NumericAttribute,
    pub y: NumericAttribute,
    pub series: Vec<SpeciesPoints>,
    /// Rows dropped for lacking either coordinate or holding a non-finite one.
    pub skipped: usize,
}

impl ScatterSeries {
    pub fn by_species(view: &DatasetView, x: NumericAttribute, y: NumericAttribute) -> Self {
        let mut skipped = 0;
        let mut series: Vec<SpeciesPoints> = view
            .species()
            .into_iter()
            .map(|species| SpeciesPoints {
                species: species.to_string(),
                points: Vec::new(),
            })
            .collect();

        for obs in view.iter() {
            let point = x
                .value_of(obs)
                .zip(y.value_of(obs))
                .filter(|(px, py)| px.is_finite() && py.is_finite());
            let Some((px, py)) = point else {
                skipped += 1;
                continue;
            };
            if let Some(entry) = series.iter_mut().find(|s| s.species == obs.species) {
                entry.points.push([px, py]);
            }
        }

        ScatterSeries {
            x,
            y,
            series,
            skipped,
        }
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}
