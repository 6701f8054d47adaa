use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::charts::{ChartSet, GroupedBarChart, PieChart, RegressionChart, ScatterChart};
use crate::color::{ColorMap, generate_palette};
use crate::state::{Notice, Session};

const PLOT_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the four charts for the current filtered table.
pub fn chart_grid(ui: &mut Ui, session: &Session) {
    match session.notice() {
        Some(Notice::NoFileProvided) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to explore it  (File → Open…)");
            });
            return;
        }
        Some(Notice::EmptyFilterResult) => {
            ui.label(
                RichText::new("No rows match the current filters.").color(Color32::YELLOW),
            );
            return;
        }
        None => {}
    }

    let (Some(charts), Some(loaded)) = (&session.charts, &session.loaded) else {
        return;
    };
    let ChartSet {
        scatter,
        nutrients,
        pie,
        regression,
    } = charts;

    ui.columns(2, |cols: &mut [Ui]| {
        scatter_plot(&mut cols[0], scatter, &loaded.scatter_colors);
        nutrient_bars(&mut cols[1], nutrients);
    });
    ui.add_space(12.0);
    ui.columns(2, |cols: &mut [Ui]| {
        pie_plot(&mut cols[0], pie, &loaded.pie_colors);
        regression_plot(&mut cols[1], regression);
    });
}

fn scatter_plot(ui: &mut Ui, chart: &ScatterChart, colors: &ColorMap) {
    ui.strong(format!("{} vs {} by {}", chart.y, chart.x, chart.color_by));
    Plot::new("scatter_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x.as_str())
        .y_axis_label(chart.y.as_str())
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(series.value.to_string())
                        .color(colors.color_for(&series.value))
                        .radius(3.0),
                );
            }
        });
}

fn nutrient_bars(ui: &mut Ui, chart: &GroupedBarChart) {
    ui.strong(format!("Mean {} by {}", chart.measures.join(" / "), chart.group_by));

    let labels: Vec<String> = chart.groups.iter().map(|g| g.value.to_string()).collect();
    let palette = generate_palette(chart.measures.len());
    let n = chart.measures.len().max(1) as f64;
    let width = 0.8 / n;

    Plot::new("nutrient_bars")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .y_axis_label("mean")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (m, (measure, color)) in chart.measures.iter().zip(&palette).enumerate() {
                let offset = (m as f64 - (n - 1.0) / 2.0) * width;
                let bars: Vec<Bar> = chart
                    .groups
                    .iter()
                    .enumerate()
                    .map(|(g, group)| {
                        Bar::new(g as f64 + offset, group.means[m])
                            .width(width)
                            .name(format!("{} – {measure}", group.value))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(measure).color(*color));
            }
        });
}

fn pie_plot(ui: &mut Ui, chart: &PieChart, colors: &ColorMap) {
    ui.strong(format!("Share of {}", chart.column));
    Plot::new("pie_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_x(-1.3)
        .include_x(1.3)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            // slices run clockwise from twelve o'clock
            let mut start = FRAC_PI_2;
            for slice in &chart.slices {
                let sweep = slice.fraction * TAU;
                let steps = ((slice.fraction * 96.0).ceil() as usize).max(2);
                let outline: PlotPoints = std::iter::once([0.0, 0.0])
                    .chain((0..=steps).map(|k| {
                        let a = start - sweep * k as f64 / steps as f64;
                        [a.cos(), a.sin()]
                    }))
                    .collect();
                plot_ui.polygon(
                    Polygon::new(outline)
                        .name(slice.value.to_string())
                        .fill_color(colors.color_for(&slice.value))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );

                let mid = start - sweep / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    format!("{:.1}%", slice.fraction * 100.0),
                ));
                start -= sweep;
            }
        });
}

fn regression_plot(ui: &mut Ui, chart: &RegressionChart) {
    ui.strong(format!("{} vs {}", chart.y, chart.x));
    Plot::new("regression_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label(chart.x.as_str())
        .y_axis_label(chart.y.as_str())
        .show(ui, |plot_ui| {
            let points: PlotPoints = chart.points.iter().copied().collect();
            plot_ui.points(
                Points::new(points)
                    .name("observations")
                    .color(Color32::LIGHT_BLUE)
                    .radius(3.0),
            );

            if let Some(trend) = chart.trend {
                let (lo, hi) = chart
                    .points
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                        (lo.min(p[0]), hi.max(p[0]))
                    });
                let line: PlotPoints = [[lo, trend.at(lo)], [hi, trend.at(hi)]].into_iter().collect();
                plot_ui.line(
                    Line::new(line)
                        .name(format!(
                            "y = {:.3}x + {:.3}  (R² = {:.3})",
                            trend.slope, trend.intercept, trend.r_squared
                        ))
                        .color(Color32::RED)
                        .width(2.0),
                );
            }
        });
}
