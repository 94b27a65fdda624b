use super::state::ProcessSelector;
use crate::model::UsageModel;
use std::time::Instant;

impl ProcessSelector {
    /// Search box, process combo box and the start button.
    pub fn show(&mut self, ui: &mut egui::Ui, model: &mut UsageModel) {
        ui.horizontal(|ui| {
            ui.label("Search:");
            if ui.text_edit_singleline(&mut self.search).changed() {
                model.set_filter(&self.search);
            }
            if ui
                .small_button("⟳")
                .on_hover_text("Reload running processes")
                .clicked()
            {
                model.reload_processes();
            }
        });

        let selected = model.target().unwrap_or("Select a process").to_owned();
        let mut picked = None;
        egui::ComboBox::from_id_salt("process_combo")
            .selected_text(selected.as_str())
            .width(ui.available_width())
            .height(300.0)
            .show_ui(ui, |ui| {
                for name in model.filtered_names() {
                    if ui.selectable_label(selected == *name, name.as_str()).clicked() {
                        picked = Some(name.clone());
                    }
                }
            });
        if let Some(name) = picked {
            model.select(&name);
        }

        ui.add_enabled_ui(model.target().is_some(), |ui| {
            if ui.button("Get usage").clicked() {
                model.start(Instant::now());
            }
        });
    }
}
