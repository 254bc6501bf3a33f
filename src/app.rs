use eframe::egui::{self, Ui};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::model::KNOWN_SPECIES;
use crate::session::Session;
use crate::ui::table::GridState;
use crate::ui::{self as widgets, panels, plot, table, CHART_HEIGHT};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinDashApp {
    pub session: Session,
    config: DashboardConfig,
    colors: ColorMap,
    grid: GridState,
    sidebar_open: bool,
    /// Scatterplot card expanded to fill the central panel.
    scatter_full_screen: bool,
}

impl PenguinDashApp {
    pub fn new(session: Session, config: DashboardConfig) -> Self {
        // Known species first so sidebar colours match the charts even when a
        // species is absent from the data.
        let colors = ColorMap::new(
            KNOWN_SPECIES
                .into_iter()
                .chain(session.dataset().species().iter().map(String::as_str)),
        );
        Self {
            session,
            sidebar_open: config.sidebar.open,
            config,
            colors,
            grid: GridState::default(),
            scatter_full_screen: false,
        }
    }

    fn dashboard(&mut self, ui: &mut Ui) {
        let session = &mut self.session;
        let colors = &self.colors;

        if self.scatter_full_screen {
            let height = (ui.available_height() - 60.0).max(CHART_HEIGHT);
            let full_screen = &mut self.scatter_full_screen;
            widgets::card(
                ui,
                "Plotly Scatterplot: Species",
                |ui: &mut Ui| {
                    if ui.small_button("Exit full screen").clicked() {
                        *full_screen = false;
                    }
                },
                |ui: &mut Ui| plot::scatterplot(ui, session.scatter(), colors, height),
            );
            return;
        }

        let attribute = session.attribute();
        let grid = &mut self.grid;
        let full_screen = &mut self.scatter_full_screen;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.columns(3, |cols: &mut [Ui]| {
                    if let [left, middle, right] = cols {
                        widgets::card(left, "Plotly Histogram", |_| {}, |ui: &mut Ui| {
                            plot::overview_histogram(
                                ui,
                                session.overview_histogram(),
                                attribute,
                                colors,
                            )
                        });
                        widgets::card(middle, "Data Table", |_| {}, |ui: &mut Ui| {
                            table::data_table(ui, session.dataset())
                        });
                        widgets::card(right, "Data Grid", |_| {}, |ui: &mut Ui| {
                            table::data_grid(ui, session.dataset(), grid)
                        });
                    }
                });

                ui.add_space(8.0);

                ui.columns(2, |cols: &mut [Ui]| {
                    if let [left, right] = cols {
                        widgets::card(
                            left,
                            "Plotly Scatterplot: Species",
                            |ui: &mut Ui| {
                                if ui.small_button("Full screen").clicked() {
                                    *full_screen = true;
                                }
                            },
                            |ui: &mut Ui| {
                                plot::scatterplot(ui, session.scatter(), colors, CHART_HEIGHT)
                            },
                        );
                        widgets::card(right, "Seaborn Histogram", |_| {}, |ui: &mut Ui| {
                            plot::distribution_histogram(
                                ui,
                                session.distribution_histogram(),
                                attribute,
                            )
                        });
                    }
                });
            });
    }
}

impl eframe::App for PenguinDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(
                ui,
                &self.config.title,
                &mut self.session,
                &mut self.sidebar_open,
            );
        });

        // ---- Right side panel: inputs ----
        if self.sidebar_open {
            egui::SidePanel::right("sidebar")
                .default_width(240.0)
                .resizable(true)
                .frame(egui::Frame::side_top_panel(&ctx.style()).fill(panels::SIDEBAR_FILL))
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.session, &self.config.sidebar, &self.colors);
                });
        }

        // ---- Central panel: cards ----
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard(ui);
        });
    }
}
