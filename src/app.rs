use eframe::egui::{self, ScrollArea, Ui};

use crate::state::Session;
use crate::ui::{overview, panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AgriDashApp {
    pub session: Session,
}

impl AgriDashApp {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

impl eframe::App for AgriDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Central panel: overview + charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Agricultural dataset explorer");
                    if let Some(loaded) = &self.session.loaded {
                        overview::overview_section(ui, &loaded.overview);
                        ui.separator();
                    }
                    plot::chart_grid(ui, &self.session);
                });
        });
    }
}
