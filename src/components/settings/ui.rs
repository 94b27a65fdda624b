use super::state::{Settings, MAX_UPDATE_INTERVAL_MS, MIN_UPDATE_INTERVAL_MS};
use crate::metrics::CpuMode;

pub fn show_settings_window(ctx: &egui::Context, settings: &mut Settings) {
    if !settings.is_visible() {
        return;
    }

    egui::Window::new("⚙ Settings")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("UI Scale:");
                ui.add(egui::Slider::new(&mut settings.scale, 0.5..=2.0).step_by(0.1));
            });

            ui.horizontal(|ui| {
                ui.label("Font Size:");
                ui.add(egui::Slider::new(&mut settings.font_size, 8.0..=32.0).step_by(1.0));
            });

            ui.horizontal(|ui| {
                ui.label("Update every:");
                ui.add(
                    egui::Slider::new(
                        &mut settings.update_interval_ms,
                        MIN_UPDATE_INTERVAL_MS..=MAX_UPDATE_INTERVAL_MS,
                    )
                    .step_by(250.0)
                    .suffix(" ms"),
                );
            });

            ui.horizontal(|ui| {
                ui.label("CPU:");
                ui.radio_value(&mut settings.cpu_mode, CpuMode::Interval, "Since last sample");
                ui.radio_value(&mut settings.cpu_mode, CpuMode::Lifetime, "Since process start");
            });

            ui.separator();

            if ui.button("Close").clicked() {
                settings.hide();
            }
        });
}
