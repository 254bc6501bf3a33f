use std::cmp::Ordering;

use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{Column, Dataset};
use crate::reactive::Memo;

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Grid sorting
// ---------------------------------------------------------------------------

/// Sort order of the data grid. `column: None` keeps source order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridSort {
    pub column: Option<Column>,
    pub descending: bool,
}

impl GridSort {
    /// Header click: ascending, then descending, then source order.
    pub fn cycle(self, clicked: Column) -> Self {
        match self.column {
            Some(c) if c == clicked && !self.descending => GridSort {
                column: Some(c),
                descending: true,
            },
            Some(c) if c == clicked => GridSort::default(),
            _ => GridSort {
                column: Some(clicked),
                descending: false,
            },
        }
    }

    fn indicator(self, column: Column) -> &'static str {
        match self.column {
            Some(c) if c == column && self.descending => " ⬇",
            Some(c) if c == column => " ⬆",
            _ => "",
        }
    }
}

/// Row order for `sort`. Missing cells always sort last; ties keep source
/// order.
pub fn sorted_order(dataset: &Dataset, sort: GridSort) -> Vec<usize> {
    let mut order: Vec<usize> = (0..dataset.len()).collect();
    let Some(column) = sort.column else {
        return order;
    };
    let rows = dataset.rows();
    order.sort_by(|&a, &b| {
        let (ca, cb) = (rows[a].cell(column), rows[b].cell(column));
        match (ca.is_missing(), cb.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if sort.descending => cb.cmp_present(&ca),
            (false, false) => ca.cmp_present(&cb),
        }
    });
    order
}

/// Data grid UI state: current sort and the memoized row order.
#[derive(Debug)]
pub struct GridState {
    sort: GridSort,
    order: Memo<GridSort, Vec<usize>>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            sort: GridSort::default(),
            order: Memo::new("grid order"),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn cell_text(dataset: &Dataset, row: usize, column: Column) -> String {
    dataset
        .get(row)
        .map(|obs| obs.cell(column).to_string())
        .unwrap_or_default()
}

fn cell_ui(ui: &mut Ui, column: Column, text: String) {
    if column.is_numeric() {
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            ui.label(text);
        });
    } else {
        ui.label(text);
    }
}

/// Every row and column of the dataset, striped, fixed layout.
pub fn data_table(ui: &mut Ui, dataset: &Dataset) {
    ui.push_id("data_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .max_scroll_height(TABLE_HEIGHT)
                .columns(TableColumn::auto(), Column::ALL.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for column in Column::ALL {
                        header.col(|ui: &mut Ui| {
                            ui.strong(column.name());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                        let index = row.index();
                        for column in Column::ALL {
                            row.col(|ui: &mut Ui| {
                                cell_ui(ui, column, cell_text(dataset, index, column));
                            });
                        }
                    });
                });
        });
    });
}

/// Sortable, resizable view of the dataset.
pub fn data_grid(ui: &mut Ui, dataset: &Dataset, state: &mut GridState) {
    let sort = state.sort;
    let order = state
        .order
        .get_or_compute(sort, || sorted_order(dataset, sort));
    let mut clicked: Option<Column> = None;

    ui.push_id("data_grid", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(TABLE_HEIGHT)
                .columns(TableColumn::initial(110.0).at_least(40.0), Column::ALL.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for column in Column::ALL {
                        header.col(|ui: &mut Ui| {
                            let label = format!("{}{}", column.name(), sort.indicator(column));
                            if ui
                                .button(RichText::new(label).strong())
                                .on_hover_text("Click to sort")
                                .clicked()
                            {
                                clicked = Some(column);
                            }
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, order.len(), |mut row| {
                        let source = order.get(row.index()).copied().unwrap_or_default();
                        for column in Column::ALL {
                            row.col(|ui: &mut Ui| {
                                cell_ui(ui, column, cell_text(dataset, source, column));
                            });
                        }
                    });
                });
        });
    });

    if let Some(column) = clicked {
        state.sort = sort.cycle(column);
        log::debug!("grid sort -> {:?}", state.sort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn ds() -> Dataset {
        let row = |species: &str, mass: Option<f64>| Observation {
            species: species.to_string(),
            body_mass_g: mass,
            ..Default::default()
        };
        Dataset::from_rows(vec![
            row("Gentoo", Some(5000.0)),
            row("Adelie", None),
            row("Chinstrap", Some(3500.0)),
            row("Adelie", Some(3700.0)),
        ])
    }

    #[test]
    fn header_clicks_cycle_through_orders() {
        let s = GridSort::default().cycle(Column::BodyMass);
        assert_eq!(s, GridSort { column: Some(Column::BodyMass), descending: false });
        let s = s.cycle(Column::BodyMass);
        assert!(s.descending);
        let s = s.cycle(Column::BodyMass);
        assert_eq!(s, GridSort::default());
        let s = s.cycle(Column::Species).cycle(Column::Year);
        assert_eq!(s.column, Some(Column::Year));
        assert!(!s.descending);
    }

    #[test]
    fn missing_sorts_last_both_ways() {
        let ds = ds();
        let asc = GridSort { column: Some(Column::BodyMass), descending: false };
        assert_eq!(sorted_order(&ds, asc), vec![2, 3, 0, 1]);
        let desc = GridSort { column: Some(Column::BodyMass), descending: true };
        assert_eq!(sorted_order(&ds, desc), vec![0, 3, 2, 1]);
    }

    #[test]
    fn text_sort_is_stable() {
        let ds = ds();
        let sort = GridSort { column: Some(Column::Species), descending: false };
        assert_eq!(sorted_order(&ds, sort), vec![1, 3, 2, 0]);
        assert_eq!(sorted_order(&ds, GridSort::default()), vec![0, 1, 2, 3]);
    }
}
