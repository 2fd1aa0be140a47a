use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use eframe::egui;

use crate::config::{Config, SourceConfig};
use crate::data::source::{DataSource, SheetsSource, SnapshotSource, UnconfiguredSource};
use crate::prefs::{PreferenceStore, ThemeChoice};
use crate::refresh::{FetchWorker, RefreshScheduler};
use crate::state::{AppState, LoadPhase};
use crate::ui::{panels, plot, table};

/// Something a panel asks the app to do beyond mutating [`AppState`].
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Refresh,
    SetTheme(ThemeChoice),
    OpenSnapshot(PathBuf),
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BbmDashboardApp {
    pub state: AppState,
    scheduler: RefreshScheduler,
    worker: FetchWorker,
    prefs: PreferenceStore,
}

impl BbmDashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, prefs: PreferenceStore) -> Self {
        let theme = prefs.theme();
        cc.egui_ctx.set_theme(theme_preference(theme));

        let source = build_source(&config.source);
        let mut state = AppState::new(
            Local::now().date_naive(),
            theme,
            &config.mapping.secondary_label,
        );
        state.source_label = source.describe();
        state.set_period(config.initial_period);
        log::info!(
            "Polling {} every {}s",
            state.source_label,
            config.refresh_interval.as_secs()
        );

        Self {
            state,
            scheduler: RefreshScheduler::new(config.refresh_interval),
            worker: FetchWorker::new(source, config.mapping),
            prefs,
        }
    }

    fn start_fetch(&mut self, ctx: &egui::Context) {
        self.state.begin_fetch();
        let repaint = ctx.clone();
        self.worker.spawn(move || repaint.request_repaint());
        // a spawn failure is queued synchronously; show it on the next frame
        ctx.request_repaint();
    }

    fn handle(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::Refresh => self.start_fetch(ctx),
            UiAction::SetTheme(theme) => {
                self.state.theme = theme;
                ctx.set_theme(theme_preference(theme));
                log::info!("Theme set to {}", theme.as_str());
                if let Err(e) = self.prefs.set_theme(theme) {
                    log::warn!("Failed to save theme preference: {e:#}");
                }
            }
            UiAction::OpenSnapshot(path) => {
                log::info!("Switching to snapshot {}", path.display());
                let source: Arc<dyn DataSource> = Arc::new(SnapshotSource { path });
                self.state.source_label = source.describe();
                self.worker.set_source(source);
                self.start_fetch(ctx);
            }
        }
    }
}

impl eframe::App for BbmDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for outcome in self.worker.drain() {
            if self.worker.is_current(&outcome) {
                self.state.finish_fetch(outcome);
            } else {
                log::info!("Dropping result from a previous data source");
                self.state.discard_fetch();
            }
        }
        self.state.set_today(Local::now().date_naive());

        let now = Instant::now();
        if self.scheduler.poll(now) {
            self.start_fetch(ctx);
        }

        let mut actions = Vec::new();

        // ---- Top panel: header ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            actions.extend(panels::top_bar(ui, &self.state));
        });

        if let Some(msg) = &self.state.error {
            egui::TopBottomPanel::top("error_banner").show(ctx, |ui| {
                panels::error_banner(ui, msg);
            });
        }

        if self.state.phase() == LoadPhase::InitialLoading {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::loading_screen(ui);
            });
        } else {
            // ---- Left side panel: filters + statistics ----
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });

            // ---- Central panel: charts + table ----
            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        plot::charts(ui, &self.state);
                        ui.add_space(12.0);
                        table::transactions_table(ui, &self.state);
                    });
            });
        }

        for action in actions {
            self.handle(ctx, action);
        }

        if let Some(wait) = self.scheduler.time_until_next(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl Drop for BbmDashboardApp {
    fn drop(&mut self) {
        self.scheduler.dispose();
        log::info!("Refresh timer stopped");
    }
}

fn build_source(config: &SourceConfig) -> Arc<dyn DataSource> {
    match config {
        SourceConfig::Sheets {
            spreadsheet_id,
            range,
            api_key,
        } => match SheetsSource::new(spreadsheet_id, range, api_key) {
            Ok(src) => Arc::new(src),
            Err(e) => {
                log::error!("Failed to set up HTTP client: {e:#}");
                Arc::new(UnconfiguredSource)
            }
        },
        SourceConfig::Snapshot(path) => Arc::new(SnapshotSource { path: path.clone() }),
        SourceConfig::Unconfigured => Arc::new(UnconfiguredSource),
    }
}

pub fn theme_preference(theme: ThemeChoice) -> egui::ThemePreference {
    match theme {
        ThemeChoice::Light => egui::ThemePreference::Light,
        ThemeChoice::Dark => egui::ThemePreference::Dark,
        ThemeChoice::System => egui::ThemePreference::System,
    }
}
