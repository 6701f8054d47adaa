use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::data::stats::{NumericSummary, TableOverview};

/// Counts, column types, first rows and numeric summaries of the upload.
pub fn overview_section(ui: &mut Ui, overview: &TableOverview) {
    ui.label(format!(
        "{} rows × {} columns",
        overview.n_rows, overview.n_columns
    ));

    egui::CollapsingHeader::new("First rows")
        .default_open(true)
        .show(ui, |ui: &mut Ui| preview_table(ui, overview));

    egui::CollapsingHeader::new("Column types")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("column_types").striped(true).show(ui, |ui: &mut Ui| {
                for (name, kind) in &overview.column_types {
                    ui.label(name.as_str());
                    ui.label(kind.to_string());
                    ui.end_row();
                }
            });
        });

    egui::CollapsingHeader::new("Summary statistics")
        .default_open(true)
        .show(ui, |ui: &mut Ui| summary_grid(ui, &overview.summaries));
}

fn preview_table(ui: &mut Ui, overview: &TableOverview) {
    let names: Vec<&String> = overview.column_types.iter().map(|(n, _)| n).collect();

    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .id_salt("preview")
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0), names.len())
                .header(20.0, |mut header| {
                    for name in &names {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for row in &overview.head {
                        body.row(18.0, |mut cells| {
                            for name in &names {
                                cells.col(|ui: &mut Ui| {
                                    ui.label(Table::cell(row, name).to_string());
                                });
                            }
                        });
                    }
                });
        });
}

fn summary_grid(ui: &mut Ui, summaries: &[NumericSummary]) {
    if summaries.is_empty() {
        ui.label("No numeric columns.");
        return;
    }

    let fmt = |v: f64| format!("{v:.2}");
    egui::Grid::new("summary_stats").striped(true).show(ui, |ui: &mut Ui| {
        for title in ["column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
            ui.strong(title);
        }
        ui.end_row();

        for s in summaries {
            ui.label(s.column.as_str());
            ui.label(s.count.to_string());
            ui.label(fmt(s.mean));
            ui.label(s.std.map_or_else(|| "–".to_string(), fmt));
            for v in [s.min, s.q25, s.median, s.q75, s.max] {
                ui.label(fmt(v));
            }
            ui.end_row();
        }
    });
}
