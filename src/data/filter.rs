use super::model::{Dataset, DatasetView};
use crate::selection::SpeciesSelection;

// ---------------------------------------------------------------------------
// Species filter
// ---------------------------------------------------------------------------

/// Rows of `dataset` whose species is in `selected`, in original order.
///
/// An empty selection means "no filter": every row is returned. Labels that
/// match no row contribute nothing.
pub fn filter_by_species(dataset: &Dataset, selected: &SpeciesSelection) -> DatasetView {
    refine(&dataset.view_all(), selected)
}

/// Apply the species filter to an existing view.
pub fn refine(view: &DatasetView, selected: &SpeciesSelection) -> DatasetView {
    if selected.is_empty() {
        return view.clone();
    }
    let rows = view.dataset().rows();
    let indices = view
        .indices()
        .iter()
        .copied()
        .filter(|&i| {
            rows.get(i)
                .is_some_and(|obs| selected.contains(&obs.species))
        })
        .collect();
    DatasetView::from_indices(view.dataset().clone(), indices)
}

impl DatasetView {
    pub fn filter_species(&self, selected: &SpeciesSelection) -> DatasetView {
        refine(self, selected)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::{Observation, KNOWN_SPECIES};
    use crate::data::sample;
    use crate::selection::species_selection;

    fn penguins() -> Dataset {
        sample::penguins()
    }

    #[test]
    fn gentoo_only() {
        let ds = penguins();
        let view = filter_by_species(&ds, &species_selection(["Gentoo"]));
        assert_eq!(view.len(), 124);
        assert!(view.iter().all(|o| o.species == "Gentoo"));
    }

    #[test]
    fn empty_selection_returns_everything() {
        let ds = penguins();
        let view = filter_by_species(&ds, &SpeciesSelection::new());
        assert_eq!(view.len(), 344);
        assert_eq!(view, ds.view_all());
    }

    #[test]
    fn full_selection_equals_unfiltered() {
        let ds = penguins();
        let view = filter_by_species(&ds, &species_selection(KNOWN_SPECIES));
        assert_eq!(view, ds.view_all());
    }

    #[test]
    fn unknown_labels_match_nothing() {
        let ds = penguins();
        let view = filter_by_species(&ds, &species_selection(["Emperor"]));
        assert!(view.is_empty());

        let view = filter_by_species(&ds, &species_selection(["Emperor", "Chinstrap"]));
        assert_eq!(view.len(), 68);
    }

    #[test]
    fn growing_the_selection_never_shrinks_the_result() {
        let ds = penguins();
        let adelie = filter_by_species(&ds, &species_selection(["Adelie"]));
        let both = filter_by_species(&ds, &species_selection(["Adelie", "Gentoo"]));
        assert_eq!(adelie.len(), 152);
        assert_eq!(both.len(), 276);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Observation>> {
        let species = prop::sample::select(vec!["Adelie", "Gentoo", "Chinstrap", "Emperor"]);
        prop::collection::vec(
            (species, prop::option::of(2500.0f64..6500.0)).prop_map(|(s, mass)| Observation {
                species: s.to_string(),
                body_mass_g: mass,
                ..Default::default()
            }),
            0..60,
        )
    }

    fn arb_selection() -> impl Strategy<Value = SpeciesSelection> {
        prop::sample::subsequence(KNOWN_SPECIES.to_vec(), 0..=KNOWN_SPECIES.len())
            .prop_map(|labels| species_selection(labels))
    }

    proptest! {
        #[test]
        fn filter_keeps_only_selected_species_in_order(
            rows in arb_rows(),
            selected in arb_selection(),
        ) {
            let ds = Dataset::from_rows(rows);
            let view = filter_by_species(&ds, &selected);

            if selected.is_empty() {
                prop_assert_eq!(view.len(), ds.len());
            } else {
                let expected: Vec<usize> = ds
                    .rows()
                    .iter()
                    .enumerate()
                    .filter(|(_, o)| selected.contains(&o.species))
                    .map(|(i, _)| i)
                    .collect();
                prop_assert_eq!(view.indices(), expected.as_slice());
            }
        }

        #[test]
        fn filter_is_idempotent(rows in arb_rows(), selected in arb_selection()) {
            let ds = Dataset::from_rows(rows);
            let once = filter_by_species(&ds, &selected);
            let twice = once.filter_species(&selected);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn superset_selection_is_monotone(
            rows in arb_rows(),
            small in arb_selection(),
            extra in arb_selection(),
        ) {
            prop_assume!(!small.is_empty());
            let ds = Dataset::from_rows(rows);
            let large: SpeciesSelection = small.union(&extra).cloned().collect();
            let a = filter_by_species(&ds, &small);
            let b = filter_by_species(&ds, &large);
            prop_assert!(a.len() <= b.len());
        }
    }
}
