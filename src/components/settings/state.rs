use crate::metrics::CpuMode;
use std::time::Duration;

pub const MIN_UPDATE_INTERVAL_MS: u64 = 250;
pub const MAX_UPDATE_INTERVAL_MS: u64 = 10_000;

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub scale: f32,
    pub font_size: f32,
    pub update_interval_ms: u64,
    pub cpu_mode: CpuMode,
    #[serde(skip)]
    show_window: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 1.2,
            font_size: 15.0,
            update_interval_ms: 1000,
            cpu_mode: CpuMode::default(),
            show_window: false,
        }
    }
}

impl Settings {
    /// Sampling cadence, clamped to a sane range.
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(
            self.update_interval_ms
                .clamp(MIN_UPDATE_INTERVAL_MS, MAX_UPDATE_INTERVAL_MS),
        )
    }

    pub fn show(&mut self) {
        self.show_window = true;
    }

    pub fn is_visible(&self) -> bool {
        self.show_window
    }

    pub fn hide(&mut self) {
        self.show_window = false;
    }

    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_pixels_per_point(self.scale);

        let mut style = (*ctx.style()).clone();
        style.text_styles = [
            (
                egui::TextStyle::Heading,
                egui::FontId::new(self.font_size + 4.0, egui::FontFamily::Proportional),
            ),
            (
                egui::TextStyle::Body,
                egui::FontId::new(self.font_size, egui::FontFamily::Proportional),
            ),
            (
                egui::TextStyle::Monospace,
                egui::FontId::new(self.font_size, egui::FontFamily::Monospace),
            ),
            (
                egui::TextStyle::Button,
                egui::FontId::new(self.font_size, egui::FontFamily::Proportional),
            ),
            (
                egui::TextStyle::Small,
                egui::FontId::new(self.font_size - 2.0, egui::FontFamily::Proportional),
            ),
        ]
        .into();
        ctx.set_style(style);
    }
}
