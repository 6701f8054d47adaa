use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{Event, Session};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, session: &mut Session) {
    ui.heading("Filters");
    ui.separator();

    if session.loaded.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let mut events = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Per-column filter widgets (collapsible) ----
            for col in &session.config.filter_columns {
                let Some(all_values) = session.domain(col) else {
                    continue;
                };
                let selected = session.selections.get(col);

                // Show count of selected / total in the header
                let n_selected = selected.map_or(0, |s| s.len());
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                events.push(Event::SelectAll(col.clone()));
                            }
                            if ui.small_button("None").clicked() {
                                events.push(Event::SelectNone(col.clone()));
                            }
                        });

                        for val in all_values {
                            let mut checked = selected.is_some_and(|s| s.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                events.push(Event::ToggleValue {
                                    column: col.clone(),
                                    value: val.clone(),
                                });
                            }
                        }
                    });
            }
        });

    super::dispatch(session, events);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut Session) {
    let mut events = Vec::new();

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                events.extend(open_file_dialog(session));
                ui.close_menu();
            }
            if ui
                .add_enabled(session.charts.is_some(), egui::Button::new("Export charts…"))
                .clicked()
            {
                export_charts_dialog(session);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(loaded), Some(filtered)) = (&session.loaded, &session.filtered) {
            ui.label(format!(
                "{}: {} rows loaded, {} visible",
                loaded.source_name,
                loaded.table.len(),
                filtered.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(session.trend_line, "Trend line")
            .clicked()
        {
            events.push(Event::SetTrendLine(!session.trend_line));
        }

        if let Some(msg) = &session.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    super::dispatch(session, events);
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

/// Ask for a file and read it into an upload event.
pub fn open_file_dialog(session: &mut Session) -> Option<Event> {
    let path = rfd::FileDialog::new()
        .set_title("Open agricultural dataset")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()?;

    match std::fs::read(&path) {
        Ok(bytes) => Some(Event::Upload {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            bytes,
        }),
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            session.status_message = Some(format!("Error: reading {}: {e}", path.display()));
            None
        }
    }
}

pub fn export_charts_dialog(session: &mut Session) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export chart data")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file()
    else {
        return;
    };

    let result = session
        .charts_json()
        .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
    match result {
        Ok(()) => log::info!("Exported charts to {}", path.display()),
        Err(e) => {
            log::error!("Failed to export charts: {e:#}");
            session.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
