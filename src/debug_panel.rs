// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use eframe::egui;
use fetch_inspector::snapshot::PLACEHOLDER;
use fetch_inspector::PanelSummary;

/// Action requested from the debug panel this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    None,
    OpenLogs,
}

/// Always-visible debug overlay showing the inspector summary
#[derive(Debug, Default)]
pub struct DebugPanel {
    pub collapsed: bool,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self { collapsed: false }
    }

    /// Render the panel as a floating window anchored bottom-right
    pub fn render(&mut self, ctx: &egui::Context, summary: &PanelSummary) -> PanelAction {
        let mut action = PanelAction::None;

        egui::Window::new("Debug")
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-10.0, -10.0))
            .fixed_size(egui::vec2(220.0, if self.collapsed { 30.0 } else { 170.0 }))
            .resizable(false)
            .collapsible(false)
            .title_bar(false)
            .frame(egui::Frame::window(&ctx.style())
                .fill(egui::Color32::from_rgba_unmultiplied(25, 30, 35, 230))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(6.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("◈ DEBUG")
                        .color(egui::Color32::from_rgb(100, 180, 220))
                        .size(12.0)
                        .strong());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let collapse_icon = if self.collapsed { "▲" } else { "▼" };
                        if ui.button(egui::RichText::new(collapse_icon).size(10.0))
                            .on_hover_text(if self.collapsed { "Expand" } else { "Collapse" })
                            .clicked() {
                            self.collapsed = !self.collapsed;
                        }

                        if ui.button(egui::RichText::new("📋 Logs")
                            .color(egui::Color32::from_rgb(150, 200, 220))
                            .size(11.0))
                            .on_hover_text("Show captured requests")
                            .clicked() {
                            action = PanelAction::OpenLogs;
                        }
                    });
                });

                if self.collapsed {
                    return;
                }

                ui.separator();

                for (label, value) in summary.rows() {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(format!("{label}:"))
                            .color(egui::Color32::from_rgb(130, 130, 130))
                            .size(9.0));

                        let color = value_color(&value);
                        ui.label(egui::RichText::new(value)
                            .color(color)
                            .size(9.0)
                            .monospace());
                    });
                }
            });

        action
    }
}

fn value_color(value: &str) -> egui::Color32 {
    match value {
        PLACEHOLDER => egui::Color32::from_rgb(100, 100, 100),
        "true" => egui::Color32::from_rgb(100, 255, 100),
        "false" => egui::Color32::from_rgb(255, 200, 100),
        _ => egui::Color32::from_rgb(200, 200, 200),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_panel_starts_expanded() {
        assert!(!DebugPanel::default().collapsed);
        assert!(!DebugPanel::new().collapsed);
    }

    #[test]
    fn test_value_color_dims_placeholder() {
        assert_eq!(value_color(PLACEHOLDER), egui::Color32::from_rgb(100, 100, 100));
        assert_eq!(value_color("true"), egui::Color32::from_rgb(100, 255, 100));
    }
}
