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

mod api_client;
mod config;
mod debug_panel;
mod log_viewer_window;

use std::sync::Arc;
use std::time::{Duration, Instant};

use api_client::ApiClient;
use clap::Parser;
use config::AppConfig;
use debug_panel::{DebugPanel, PanelAction};
use eframe::egui;
use fetch_inspector::{
    DebugFetch, EnablementFlag, InspectorContext, NavigationTiming, ProcMemoryProbe,
    ReqwestFetcher, SharedAppState,
};
use log::{info, warn};
use log_viewer_window::LogViewerWindow;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Matchday desktop client
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Page URL used for the inspector gate (overrides config)
    #[arg(long)]
    page_url: Option<String>,

    /// API base URL (overrides config)
    #[arg(long)]
    api_base: Option<String>,

    /// Force the network inspector on by adding the debug marker to the page URL
    #[arg(long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Standings,
    Match,
    Video,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Standings, Tab::Match, Tab::Video];

    fn label(self) -> &'static str {
        match self {
            Tab::Standings => "Standings",
            Tab::Match => "Match",
            Tab::Video => "Video",
        }
    }

    fn endpoint(self, match_id: &str) -> String {
        match self {
            Tab::Standings => "/api/standings".to_string(),
            Tab::Match => format!("/api/matches/{match_id}"),
            Tab::Video => format!("/api/matches/{match_id}/video"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let navigation_start = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting Matchday Desktop...");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });
    config.apply_overrides(args.page_url, args.api_base, args.debug);

    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let inspector = Arc::new(InspectorContext::new(
        EnablementFlag::from_url_str(&config.page_url),
        config.inspector.to_inspector_config(),
    ));
    let state = SharedAppState::new();
    let api = ApiClient::new(
        inspector.wrap(ReqwestFetcher::default()),
        config.api_base_url.clone(),
        state.clone(),
    );

    inspector.start_perf(Some(Arc::new(ProcMemoryProbe)));
    if config.show_debug_panel {
        inspector.activate(Arc::new(state.clone()));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("Matchday"),
        ..Default::default()
    };

    eframe::run_native(
        "Matchday",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(MatchdayApp::new(inspector, api, state, navigation_start)))
        }),
    )?;

    Ok(())
}

struct MatchdayApp {
    inspector: Arc<InspectorContext>,
    api: ApiClient<DebugFetch<ReqwestFetcher>>,
    state: SharedAppState,
    active_tab: Tab,
    match_id: String,
    debug_panel: DebugPanel,
    log_window: LogViewerWindow,
    navigation_start: Instant,
    loaded: bool,
}

impl MatchdayApp {
    fn new(
        inspector: Arc<InspectorContext>,
        api: ApiClient<DebugFetch<ReqwestFetcher>>,
        state: SharedAppState,
        navigation_start: Instant,
    ) -> Self {
        state.update(|s| s.active_tab = Some(Tab::Standings.label().to_string()));

        Self {
            inspector,
            api,
            state,
            active_tab: Tab::Standings,
            match_id: String::new(),
            debug_panel: DebugPanel::new(),
            log_window: LogViewerWindow::new(),
            navigation_start,
            loaded: false,
        }
    }

    fn select_tab(&mut self, tab: Tab, ctx: &egui::Context) {
        self.active_tab = tab;
        self.state.update(|s| s.active_tab = Some(tab.label().to_string()));
        self.api.spawn_get(tab.endpoint(self.match_id.trim()), ctx.clone());
    }
}

impl eframe::App for MatchdayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.loaded {
            self.loaded = true;
            self.inspector.log_load_time(&NavigationTiming {
                navigation_start: self.navigation_start,
                load_end: Instant::now(),
            });
            self.api.spawn_get(Tab::Standings.endpoint(""), ctx.clone());
        }

        // Panel summary is refreshed in the background
        if self.inspector.status_panel().is_some() {
            ctx.request_repaint_after(Duration::from_secs(1));
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    if ui.selectable_label(self.active_tab == tab, tab.label()).clicked() {
                        self.select_tab(tab, ctx);
                    }
                }

                ui.separator();
                ui.label("Match ID:");
                ui.text_edit_singleline(&mut self.match_id);
                if ui.button("Load").clicked() {
                    self.select_tab(Tab::Match, ctx);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.active_tab.label());
            match self.api.last_result() {
                Some(result) => ui.label(result),
                None => ui.label("Loading..."),
            };
        });

        if let Some(panel) = self.inspector.status_panel() {
            if self.debug_panel.render(ctx, &panel.summary()) == PanelAction::OpenLogs {
                self.log_window.open(self.inspector.request_log());
            }
        }

        self.log_window.render(ctx);
    }
}
