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

//! Full-screen modal listing the captured requests.

use eframe::egui;
use fetch_inspector::{EntryStyle, LogViewer, RequestLog, ViewerContent};
use log::warn;

/// Modal window wrapping the [`LogViewer`] model
#[derive(Debug, Default)]
pub struct LogViewerWindow {
    viewer: LogViewer,
}

impl LogViewerWindow {
    pub fn new() -> Self {
        Self {
            viewer: LogViewer::new(),
        }
    }

    pub fn open(&mut self, log: &RequestLog) {
        self.viewer.open(log);
    }

    pub fn render(&mut self, ctx: &egui::Context) {
        if !self.viewer.is_open() {
            return;
        }

        let screen = ctx.screen_rect().shrink(24.0);
        let mut close = false;
        let mut toggled = None;

        let response = egui::Modal::new(egui::Id::new("request_log_modal")).show(ctx, |ui| {
            ui.set_min_size(screen.size());
            ui.set_max_size(screen.size());

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("REQUEST LOG ({})", self.viewer.len()))
                    .color(egui::Color32::from_rgb(100, 180, 220))
                    .size(14.0)
                    .strong());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(egui::RichText::new("✕ Close")
                        .color(egui::Color32::from_rgb(200, 100, 100)))
                        .clicked() {
                        close = true;
                    }

                    if ui.button("Copy JSON").clicked() {
                        match self.viewer.export_json() {
                            Ok(json) => ui.ctx().copy_text(json),
                            Err(e) => warn!("Failed to export request log: {}", e),
                        }
                    }
                });
            });

            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.viewer.content() {
                    ViewerContent::Closed => {}
                    ViewerContent::Empty(message) => {
                        ui.label(egui::RichText::new(message)
                            .color(egui::Color32::from_rgb(120, 120, 120))
                            .italics());
                    }
                    ViewerContent::Entries(blocks) => {
                        for block in blocks {
                            let accent = match block.style {
                                EntryStyle::Success => egui::Color32::from_rgb(100, 255, 100),
                                EntryStyle::Error => egui::Color32::from_rgb(255, 100, 100),
                            };

                            egui::Frame::group(ui.style())
                                .stroke(egui::Stroke::new(1.0, accent.gamma_multiply(0.6)))
                                .show(ui, |ui| {
                                    ui.set_width(ui.available_width());
                                    ui.horizontal(|ui| {
                                        ui.label(egui::RichText::new(block.method).strong().monospace());
                                        ui.label(egui::RichText::new(block.url).monospace());
                                        ui.label(egui::RichText::new(block.status.to_string())
                                            .color(accent)
                                            .monospace());
                                        ui.label(egui::RichText::new(format!("{}ms", block.elapsed_ms))
                                            .color(egui::Color32::from_rgb(180, 180, 180))
                                            .monospace());

                                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                            let label = if block.payload.is_some() { "▼ Hide JSON" } else { "▶ Show JSON" };
                                            if ui.small_button(label).clicked() {
                                                toggled = Some(block.index);
                                            }
                                        });
                                    });

                                    if let Some(payload) = &block.payload {
                                        ui.label(egui::RichText::new(payload)
                                            .monospace()
                                            .size(10.0)
                                            .color(egui::Color32::from_rgb(200, 200, 200)));
                                    }
                                });
                        }
                    }
                });
        });

        if let Some(index) = toggled {
            self.viewer.toggle(index);
        }
        if close || response.should_close() {
            self.viewer.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_closed() {
        let mut window = LogViewerWindow::default();
        assert!(!window.viewer.is_open());

        window.open(&RequestLog::new());
        assert!(window.viewer.is_open());
        assert!(window.viewer.is_empty());
    }
}
