use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{family_color, VALUE_BAR_COLOR};
use crate::data::family::FamilyCount;

// ---------------------------------------------------------------------------
// Family comparison chart
// ---------------------------------------------------------------------------

/// One bar per family, largest first. Each family is its own series so the
/// legend carries the family colour.
pub fn family_bar_chart(ui: &mut Ui, counts: &[FamilyCount]) {
    if counts.is_empty() {
        ui.label("No languages visible.");
        return;
    }

    Plot::new("family_bar_chart")
        .legend(Legend::default())
        .height(220.0)
        .y_axis_label("Languages")
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, fc) in counts.iter().enumerate() {
                let color = family_color(&fc.family);
                let bar = Bar::new(i as f64, fc.count as f64)
                    .width(0.7)
                    .name(&fc.family)
                    .fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(&fc.family));
            }
        });
}

// ---------------------------------------------------------------------------
// Feature value distribution
// ---------------------------------------------------------------------------

/// Horizontal bars of `(value, count)` pairs, first pair at the top.
pub fn feature_value_chart(ui: &mut Ui, id: &str, distribution: &[(String, usize)]) {
    if distribution.is_empty() {
        ui.label("No values recorded.");
        return;
    }

    let n = distribution.len();
    let bars: Vec<Bar> = distribution
        .iter()
        .enumerate()
        .map(|(i, (value, count))| {
            let label = if value.is_empty() { "(empty)" } else { value.as_str() };
            Bar::new((n - i) as f64, *count as f64)
                .width(0.6)
                .name(label)
                .fill(VALUE_BAR_COLOR)
        })
        .collect();

    Plot::new(("feature_value_chart", id))
        .height((n as f32 * 26.0).clamp(120.0, 320.0))
        .x_axis_label("Languages")
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().color(VALUE_BAR_COLOR));
        });
}
