use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::chart::{Bins, Histogram, ScatterSeries, StackedHistogram};
use crate::color::{ColorMap, DISTRIBUTION_COLOR};
use crate::data::model::NumericAttribute;

use super::CHART_HEIGHT;

fn bars(bins: &Bins, counts: &[usize]) -> Vec<Bar> {
    let width = bins.width();
    bins.centers()
        .zip(counts)
        .map(|(x, &count)| Bar::new(x, count as f64).width(width))
        .collect()
}

fn empty_note(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new("No values to plot").weak());
    });
}

// ---------------------------------------------------------------------------
// Overview histogram – full dataset, stacked by species
// ---------------------------------------------------------------------------

pub fn overview_histogram(
    ui: &mut Ui,
    hist: &StackedHistogram,
    attribute: NumericAttribute,
    colors: &ColorMap,
) {
    if hist.bins.count() == 0 {
        empty_note(ui);
        return;
    }

    Plot::new("overview_histogram")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(attribute.column())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::with_capacity(hist.layers.len());
            for layer in &hist.layers {
                let below: Vec<&BarChart> = charts.iter().collect();
                let chart = BarChart::new(bars(&hist.bins, &layer.counts))
                    .name(&layer.species)
                    .color(colors.color_for(&layer.species))
                    .stack_on(&below);
                charts.push(chart);
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Scatterplot – filtered rows, one series per species
// ---------------------------------------------------------------------------

pub fn scatterplot(ui: &mut Ui, scatter: &ScatterSeries, colors: &ColorMap, height: f32) {
    if scatter.point_count() == 0 {
        empty_note(ui);
        return;
    }

    Plot::new("species_scatterplot")
        .legend(Legend::default())
        .height(height)
        .x_axis_label(scatter.x.label())
        .y_axis_label(scatter.y.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &scatter.series {
                let points = Points::new(PlotPoints::from(series.points.clone()))
                    .name(&series.species)
                    .color(colors.color_for(&series.species))
                    .radius(3.0);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Distribution histogram – filtered rows, single series
// ---------------------------------------------------------------------------

pub fn distribution_histogram(ui: &mut Ui, hist: &Histogram, attribute: NumericAttribute) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Palmer Penguins").strong());
    });
    if hist.bins.count() == 0 {
        empty_note(ui);
        return;
    }

    Plot::new("distribution_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label(attribute.column())
        .y_axis_label("Number")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let chart = BarChart::new(bars(&hist.bins, &hist.counts))
                .name(attribute.column())
                .color(DISTRIBUTION_COLOR);
            plot_ui.bar_chart(chart);
        });
}
