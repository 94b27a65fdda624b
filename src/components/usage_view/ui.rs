use crate::metrics::Tier;
use crate::model::UsageModel;

pub fn tier_color(tier: Tier) -> egui::Color32 {
    match tier {
        Tier::Normal => egui::Color32::GREEN,
        Tier::High => egui::Color32::RED,
    }
}

/// CPU and memory labels for the current target.
pub fn show_usage(ui: &mut egui::Ui, model: &UsageModel) {
    let Some(sample) = model.sample() else {
        return;
    };

    if let Some(name) = model.target() {
        ui.heading(name);
    }

    if !sample.found {
        ui.label(model.cpu_text());
        ui.label(model.memory_text());
        return;
    }

    ui.horizontal(|ui| {
        ui.label("CPU:");
        ui.colored_label(tier_color(sample.cpu_tier), model.cpu_text());
    });
    ui.horizontal(|ui| {
        ui.label("Memory:");
        ui.colored_label(tier_color(sample.memory_tier), model.memory_text());
    });
    ui.add_space(8.0);
}
