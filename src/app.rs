use crate::components::process_selector::ProcessSelector;
use crate::components::settings::{show_settings_window, Settings};
use crate::components::usage_view;
use crate::model::UsageModel;
use crate::notify::Property;
use log::debug;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct UsageApp {
    #[serde(skip)]
    model: UsageModel,
    #[serde(skip)]
    changes: Option<Receiver<Property>>,
    #[serde(skip)]
    process_selector: ProcessSelector,
    settings: Settings,
    last_target: Option<String>,
}

impl Default for UsageApp {
    fn default() -> Self {
        Self {
            model: UsageModel::default(),
            changes: None,
            process_selector: ProcessSelector::default(),
            settings: Settings::default(),
            last_target: None,
        }
    }
}

impl UsageApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous app state (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.model.apply_settings(&app.settings);
        if let Some(target) = app.last_target.clone() {
            app.model.select(&target);
        }
        app.changes = Some(app.model.subscribe());
        app
    }

    /// Drains change events; true when anything on screen changed.
    fn take_changes(&mut self) -> bool {
        let Some(rx) = &self.changes else {
            return false;
        };
        let mut changed = false;
        for property in rx.try_iter() {
            debug!("{:?} changed", property);
            if property == Property::Target {
                self.last_target = self.model.target().map(str::to_owned);
            }
            changed = true;
        }
        changed
    }
}

impl eframe::App for UsageApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.settings.apply(ctx);
        self.model.apply_settings(&self.settings);
        self.model.poll(Instant::now());

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.add_space(16.0);
                egui::widgets::global_theme_preference_buttons(ui);

                ui.add_space(16.0);
                if ui.button("⚙").clicked() {
                    self.settings.show();
                }
            });
        });

        show_settings_window(ctx, &mut self.settings);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.model.show_selector() {
                self.process_selector.show(ui, &mut self.model);
                ui.separator();
            }

            usage_view::show_usage(ui, &self.model);

            if self.model.is_tracking() && ui.button("Stop").clicked() {
                self.model.stop();
            }
        });

        if self.take_changes() {
            ctx.request_repaint();
        }
        if let Some(wait) = self.model.time_until_next_sample(Instant::now()) {
            ctx.request_repaint_after(wait.max(Duration::from_millis(16)));
        }
    }
}
