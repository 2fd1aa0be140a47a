use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Chart area (central panel)
// ---------------------------------------------------------------------------

/// Volume per unit (bar), volume distribution (pie) and daily trend (line).
pub fn charts(ui: &mut Ui, state: &AppState) {
    if state.summary.total_transactions == 0 {
        return;
    }

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Volume per unit");
        unit_bar_chart(&mut cols[0], state);
        cols[1].strong("Volume distribution");
        unit_share_pie(&mut cols[1], state);
    });

    // A trend needs at least two days.
    if state.summary.volume_by_date.len() > 1 {
        ui.add_space(12.0);
        ui.strong("Daily volume trend");
        daily_line(ui, state);
    }
}

fn unit_bar_chart(ui: &mut Ui, state: &AppState) {
    Plot::new("volume_by_unit")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Litres")
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            // One chart per unit so each gets its own legend entry.
            for (i, uv) in state.summary.volume_by_unit.iter().enumerate() {
                let color = state.unit_colors.color_for(&uv.name);
                let bar = Bar::new(i as f64, uv.volume)
                    .name(format!("{} · {:.2} L", uv.name, uv.volume))
                    .fill(color)
                    .width(0.7);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&uv.name).color(color));
            }
        });
}

fn unit_share_pie(ui: &mut Ui, state: &AppState) {
    let total: f64 = state.summary.volume_by_unit.iter().map(|u| u.volume).sum();
    if total <= 0.0 {
        ui.label(RichText::new("No volume recorded").weak());
        return;
    }

    Plot::new("unit_share")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for uv in &state.summary.volume_by_unit {
                let share = uv.volume / total;
                if share <= 0.0 {
                    continue;
                }
                let sweep = share * TAU;
                let slice = Polygon::new(PlotPoints::new(pie_slice(start, sweep)))
                    .name(format!("{} ({:.0}%)", uv.name, share * 100.0))
                    .fill_color(state.unit_colors.color_for(&uv.name));
                plot_ui.polygon(slice);
                start += sweep;
            }
        });
}

/// Unit-circle wedge starting at 12 o'clock, clockwise.
fn pie_slice(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / 0.05).ceil() as usize).max(2);
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for k in 0..=steps {
        let angle = start + sweep * k as f64 / steps as f64;
        points.push([angle.sin(), angle.cos()]);
    }
    points
}

fn daily_line(ui: &mut Ui, state: &AppState) {
    let series = &state.summary.volume_by_date;
    let accent = if ui.visuals().dark_mode {
        Color32::from_rgb(0xa7, 0x8b, 0xfa)
    } else {
        Color32::from_rgb(0x7c, 0x3a, 0xed)
    };

    let coords: Vec<[f64; 2]> = series
        .iter()
        .enumerate()
        .map(|(i, d)| [i as f64, d.volume])
        .collect();

    Plot::new("volume_by_date")
        .height(CHART_HEIGHT)
        .y_axis_label("Litres")
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .label_formatter(|_name, value| {
            let idx = value.x.round();
            if idx < 0.0 {
                return String::new();
            }
            match series.get(idx as usize) {
                Some(d) => format!("{}\n{:.2} L", d.date, d.volume),
                None => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::new(coords.clone()))
                    .name("Volume")
                    .color(accent)
                    .width(2.5),
            );
            plot_ui.points(Points::new(PlotPoints::new(coords)).radius(4.0).color(accent));
        });

    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        ui.label(RichText::new(format!("{} → {}", first.date, last.date)).small().weak());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_slice_starts_at_center_and_follows_arc() {
        let points = pie_slice(0.0, TAU / 4.0);
        assert_eq!(points[0], [0.0, 0.0]);
        assert_eq!(points[1], [0.0, 1.0]);
        let last = points[points.len() - 1];
        assert!((last[0] - 1.0).abs() < 1e-9);
        assert!(last[1].abs() < 1e-9);
    }

    #[test]
    fn tiny_slices_still_have_area() {
        assert!(pie_slice(1.0, 0.001).len() >= 4);
    }
}
