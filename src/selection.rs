use std::collections::BTreeSet;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Selection errors
// ---------------------------------------------------------------------------

/// Invalid values for the user-controlled inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    BinCountOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error(
        "unknown attribute '{0}' (expected bill_length_mm, bill_depth_mm, flipper_length_mm or body_mass_g)"
    )]
    UnknownAttribute(String),
}

// ---------------------------------------------------------------------------
// Bin counts
// ---------------------------------------------------------------------------

/// Inclusive bounds for one of the bin count inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRange {
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
}

/// Overview histogram ("Plotly") bin count bounds.
pub const PLOTLY_BINS: BinRange = BinRange {
    name: "Bin Count (Plotly)",
    min: 1,
    max: 10,
};

/// Distribution histogram ("Seaborn") bin count bounds.
pub const SEABORN_BINS: BinRange = BinRange {
    name: "Bin Count (Seaborn)",
    min: 5,
    max: 50,
};

impl BinRange {
    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A bin count that is always inside its [`BinRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinCount {
    value: u32,
    range: BinRange,
}

impl BinCount {
    /// Validate `value` against `range`.
    pub fn new(value: u32, range: BinRange) -> Result<Self, SelectionError> {
        if range.contains(value) {
            Ok(Self { value, range })
        } else {
            Err(SelectionError::BinCountOutOfRange {
                name: range.name,
                value,
                min: range.min,
                max: range.max,
            })
        }
    }

    /// Pull `value` into `range`. Used for widget writes.
    pub fn clamped(value: u32, range: BinRange) -> Self {
        Self {
            value: value.clamp(range.min, range.max),
            range,
        }
    }

    pub fn get(self) -> u32 {
        self.value
    }

    pub fn range(self) -> BinRange {
        self.range
    }
}

// ---------------------------------------------------------------------------
// Species selection
// ---------------------------------------------------------------------------

/// Selected species labels. Empty means "no filter".
pub type SpeciesSelection = BTreeSet<String>;

/// Build a [`SpeciesSelection`] from string slices.
pub fn species_selection<I, S>(labels: I) -> SpeciesSelection
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_count_accepts_bounds() {
        assert_eq!(BinCount::new(1, PLOTLY_BINS).unwrap().get(), 1);
        assert_eq!(BinCount::new(10, PLOTLY_BINS).unwrap().get(), 10);
        assert_eq!(BinCount::new(5, SEABORN_BINS).unwrap().get(), 5);
        assert_eq!(BinCount::new(50, SEABORN_BINS).unwrap().get(), 50);
    }

    #[test]
    fn bin_count_rejects_out_of_range() {
        let err = BinCount::new(0, PLOTLY_BINS).unwrap_err();
        assert_eq!(
            err,
            SelectionError::BinCountOutOfRange {
                name: "Bin Count (Plotly)",
                value: 0,
                min: 1,
                max: 10,
            }
        );
        assert!(BinCount::new(51, SEABORN_BINS).is_err());
        assert!(err.to_string().contains("between 1 and 10"));
    }

    #[test]
    fn clamped_pulls_into_range() {
        assert_eq!(BinCount::clamped(0, PLOTLY_BINS).get(), 1);
        assert_eq!(BinCount::clamped(99, PLOTLY_BINS).get(), 10);
        assert_eq!(BinCount::clamped(3, SEABORN_BINS).get(), 5);
        assert_eq!(BinCount::clamped(25, SEABORN_BINS).get(), 25);
    }
}
