use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::config::SidebarConfig;
use crate::data::model::{NumericAttribute, KNOWN_SPECIES};
use crate::session::Session;

/// Sidebar background.
pub const SIDEBAR_FILL: Color32 = Color32::from_rgb(0xf8, 0xf8, 0xf8);

// ---------------------------------------------------------------------------
// Right side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the sidebar inputs. Every widget writes straight into the
/// session's signals; the session decides whether that is a change.
pub fn side_panel(ui: &mut Ui, session: &mut Session, config: &SidebarConfig, colors: &ColorMap) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sidebar");
            ui.add_space(6.0);

            // ---- Attribute selector ----
            ui.strong("Selected Attribute");
            let current = session.attribute();
            egui::ComboBox::from_id_salt("selected_attribute")
                .selected_text(current.column())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for attr in NumericAttribute::ALL {
                        if ui.selectable_label(current == attr, attr.column()).clicked() {
                            session.set_attribute(attr);
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Overview histogram bins (numeric input) ----
            ui.strong("Bin Count (Plotly)");
            let plotly = session.plotly_bins();
            let mut value = plotly.get();
            let range = plotly.range();
            if ui
                .add(egui::DragValue::new(&mut value).range(range.min..=range.max))
                .changed()
            {
                session.set_plotly_bins(value);
            }
            ui.add_space(8.0);

            // ---- Distribution histogram bins (slider) ----
            ui.strong("Bin Count (Seaborn)");
            let seaborn = session.seaborn_bins();
            let mut value = seaborn.get();
            let range = seaborn.range();
            if ui
                .add(egui::Slider::new(&mut value, range.min..=range.max))
                .changed()
            {
                session.set_seaborn_bins(value);
            }
            ui.add_space(8.0);

            // ---- Species checkbox group ----
            ui.strong("Select a Species");
            for species in KNOWN_SPECIES {
                let mut checked = session.is_species_selected(species);
                let text = RichText::new(species).color(colors.color_for(species));
                if ui.checkbox(&mut checked, text).changed() {
                    session.set_species_checked(species, checked);
                }
            }
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    session.select_all_species();
                }
                if ui.small_button("None").clicked() {
                    session.select_no_species();
                }
            });
            if session.species_selection().is_empty() {
                ui.label(RichText::new("No species selected: showing all").italics().weak());
            }

            ui.separator();

            // ---- Repository link ----
            ui.label(RichText::new("GitHub Repo").strong().size(13.0));
            ui.add(
                egui::Hyperlink::from_label_and_url(&config.repo_label, &config.repo_url)
                    .open_in_new_tab(true),
            );
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with row counts and the sidebar toggle.
pub fn top_bar(ui: &mut Ui, title: &str, session: &mut Session, sidebar_open: &mut bool) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.heading(title);

        ui.separator();

        let total = session.dataset().len();
        let visible = session.filtered().len();
        ui.label(format!("{total} penguins loaded, {visible} visible"));

        if let Some(msg) = &session.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.selectable_label(*sidebar_open, "Sidebar").clicked() {
                *sidebar_open = !*sidebar_open;
            }
        });
    });
}
