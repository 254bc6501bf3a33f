use crate::chart::{Histogram, ScatterSeries, StackedHistogram};
use crate::config::SelectionDefaults;
use crate::data::filter::filter_by_species;
use crate::data::model::{Dataset, DatasetView, NumericAttribute, KNOWN_SPECIES};
use crate::reactive::{Memo, Signal, Version};
use crate::selection::{
    species_selection, BinCount, SelectionError, SpeciesSelection, PLOTLY_BINS, SEABORN_BINS,
};

/// Scatterplot axes are fixed.
pub const SCATTER_X: NumericAttribute = NumericAttribute::BodyMass;
pub const SCATTER_Y: NumericAttribute = NumericAttribute::BillDepth;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One user's dashboard state: the shared dataset, the selection inputs and
/// every value derived from them.
///
/// Inputs are [`Signal`]s; derived values are [`Memo`]s keyed on the
/// versions they read, so the filtered view is computed once per species
/// change no matter how many charts consume it.
#[derive(Debug)]
pub struct Session {
    dataset: Dataset,

    selected_attribute: Signal<NumericAttribute>,
    plotly_bin_count: Signal<BinCount>,
    seaborn_bin_count: Signal<BinCount>,
    selected_species: Signal<SpeciesSelection>,

    filtered: Memo<Version, DatasetView>,
    overview: Memo<(Version, Version), StackedHistogram>,
    distribution: Memo<(Version, Version, Version), Histogram>,
    scatter: Memo<Version, ScatterSeries>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(dataset: Dataset, defaults: &SelectionDefaults) -> Result<Self, SelectionError> {
        let (plotly, seaborn) = defaults.validate()?;

        let unlisted: Vec<&str> = dataset
            .species()
            .iter()
            .map(String::as_str)
            .filter(|s| !KNOWN_SPECIES.contains(s))
            .collect();
        let status_message = (!unlisted.is_empty()).then(|| {
            log::warn!("dataset contains species without a checkbox: {unlisted:?}");
            format!(
                "Unlisted species (shown only when no species is selected): {}",
                unlisted.join(", ")
            )
        });

        Ok(Self {
            dataset,
            selected_attribute: Signal::new(defaults.attribute),
            plotly_bin_count: Signal::new(plotly),
            seaborn_bin_count: Signal::new(seaborn),
            selected_species: Signal::new(species_selection(defaults.species.iter().cloned())),
            filtered: Memo::new("filtered data"),
            overview: Memo::new("overview histogram"),
            distribution: Memo::new("distribution histogram"),
            scatter: Memo::new("scatterplot"),
            status_message,
        })
    }

    // -- Inputs --------------------------------------------------------------

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn attribute(&self) -> NumericAttribute {
        *self.selected_attribute.get()
    }

    pub fn plotly_bins(&self) -> BinCount {
        *self.plotly_bin_count.get()
    }

    pub fn seaborn_bins(&self) -> BinCount {
        *self.seaborn_bin_count.get()
    }

    pub fn species_selection(&self) -> &SpeciesSelection {
        self.selected_species.get()
    }

    pub fn is_species_selected(&self, species: &str) -> bool {
        self.selected_species.get().contains(species)
    }

    pub fn set_attribute(&mut self, attribute: NumericAttribute) {
        if self.selected_attribute.set(attribute) {
            log::debug!("attribute -> {attribute}");
        }
    }

    /// Widget write; out-of-range values are clamped.
    pub fn set_plotly_bins(&mut self, bins: u32) {
        if self.plotly_bin_count.set(BinCount::clamped(bins, PLOTLY_BINS)) {
            log::debug!("plotly bins -> {}", self.plotly_bins().get());
        }
    }

    /// Widget write; out-of-range values are clamped.
    pub fn set_seaborn_bins(&mut self, bins: u32) {
        if self.seaborn_bin_count.set(BinCount::clamped(bins, SEABORN_BINS)) {
            log::debug!("seaborn bins -> {}", self.seaborn_bins().get());
        }
    }

    pub fn set_species(&mut self, selection: SpeciesSelection) {
        if self.selected_species.set(selection) {
            log::debug!("species -> {:?}", self.selected_species.get());
        }
    }

    /// Check or uncheck one species in the checkbox group.
    pub fn set_species_checked(&mut self, species: &str, checked: bool) {
        let changed = self.selected_species.update(|selected| {
            if checked {
                selected.insert(species.to_string());
            } else {
                selected.remove(species);
            }
        });
        if changed {
            log::debug!("species -> {:?}", self.selected_species.get());
        }
    }

    pub fn select_all_species(&mut self) {
        self.set_species(species_selection(KNOWN_SPECIES));
    }

    pub fn select_no_species(&mut self) {
        self.set_species(SpeciesSelection::new());
    }

    // -- Derived values ------------------------------------------------------

    /// Rows matching the species selection; all rows when none is selected.
    pub fn filtered(&mut self) -> &DatasetView {
        let dataset = &self.dataset;
        let selected = self.selected_species.get();
        self.filtered
            .get_or_compute(self.selected_species.version(), || {
                filter_by_species(dataset, selected)
            })
    }

    /// Species-stacked histogram of the full dataset.
    pub fn overview_histogram(&mut self) -> &StackedHistogram {
        let key = (
            self.selected_attribute.version(),
            self.plotly_bin_count.version(),
        );
        let view = self.dataset.view_all();
        let attribute = self.attribute();
        let bins = self.plotly_bins().get();
        self.overview
            .get_or_compute(key, || StackedHistogram::by_species(&view, attribute, bins))
    }

    /// Histogram of the filtered rows.
    pub fn distribution_histogram(&mut self) -> &Histogram {
        let view = self.filtered().clone();
        let key = (
            self.filtered.version(),
            self.selected_attribute.version(),
            self.seaborn_bin_count.version(),
        );
        let attribute = self.attribute();
        let bins = self.seaborn_bins().get();
        self.distribution
            .get_or_compute(key, || Histogram::of(&view, attribute, bins))
    }

    /// Body mass against bill depth for the filtered rows.
    pub fn scatter(&mut self) -> &ScatterSeries {
        let view = self.filtered().clone();
        let key = self.filtered.version();
        self.scatter
            .get_or_compute(key, || ScatterSeries::by_species(&view, SCATTER_X, SCATTER_Y))
    }

    /// Times the species filter has run.
    pub fn filter_computations(&self) -> u64 {
        self.filtered.computations()
    }
}
