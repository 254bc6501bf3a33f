use eframe::egui::{self, RichText, Ui};

pub mod panels;
pub mod plot;
pub mod table;

/// Height of every chart card's plot area.
pub const CHART_HEIGHT: f32 = 320.0;

/// A bordered card with a header row. `header_extra` is drawn right-aligned
/// in the header (e.g. an expand button).
pub fn card<R>(
    ui: &mut Ui,
    title: &str,
    header_extra: impl FnOnce(&mut Ui),
    body: impl FnOnce(&mut Ui) -> R,
) -> R {
    egui::Frame::group(ui.style())
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui: &mut Ui| {
                ui.label(RichText::new(title).strong().size(15.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), header_extra);
            });
            ui.separator();
            body(ui)
        })
        .inner
}
