//! Headless application driver: configuration in, [`RunReport`] out.

use anyhow::{Context, Result};
use stardisk_core::analysis;
use stardisk_core::automaton::StarFormation;
use stardisk_core::cluster;
use stardisk_core::config::SimConfig;
use stardisk_core::grid::Grid;
use stardisk_core::scheduler::{PauseHandle, Scheduler};
use stardisk_data::RunReport;
use std::path::Path;

pub struct App {
    pub config: SimConfig,
    scheduler: Scheduler,
}

impl App {
    /// Reads `path`, falling back to defaults when it cannot be parsed.
    ///
    /// A missing file is created with the default configuration.
    pub fn load_config(path: impl AsRef<Path>) -> SimConfig {
        let path = path.as_ref();
        if let Ok(content) = std::fs::read_to_string(path) {
            match SimConfig::from_toml(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }
        let default = SimConfig::default();
        if !path.exists() {
            if let Ok(toml_str) = toml::to_string(&default) {
                if let Err(e) = std::fs::write(path, toml_str) {
                    tracing::warn!("Failed to write {}: {}", path.display(), e);
                }
            }
        }
        default
    }

    /// Builds the grid and engine and ignites the initial stars.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        for warning in config.warnings() {
            tracing::warn!("{}", warning);
        }

        let grid = Grid::from_config(&config.disk)?;
        let engine = StarFormation::from_config(&config)?;
        let mut scheduler = Scheduler::new(grid, engine);
        scheduler.seed_initial_stars(config.run.initial_stars)?;

        tracing::info!(
            rings = config.disk.ring_count,
            cells = scheduler.grid().total_cells(),
            initial_stars = config.run.initial_stars,
            fingerprint = %config.fingerprint(),
            "Disk initialised"
        );
        Ok(Self { config, scheduler })
    }

    pub fn pause_handle(&self) -> PauseHandle {
        self.scheduler.pause_handle()
    }

    /// Runs the configured time range and analyses the result.
    pub fn run(&mut self) -> Result<RunReport> {
        let summary = self
            .scheduler
            .run(self.config.run.dt, self.config.run.t_end)?;

        let regen_time = self.config.star_formation.regen_time;
        let history = self.scheduler.history();
        let star_formation_rate = analysis::star_formation_rate(history, regen_time);
        let mean_star_formation_rate = analysis::mean_rate(&star_formation_rate);

        let grid = self.scheduler.grid();
        let clusters = cluster::analyze(grid, self.config.analysis.min_age).summary();

        Ok(RunReport {
            fingerprint: self.config.fingerprint(),
            seed: self.config.run.seed,
            ticks: summary.ticks,
            paused: summary.paused,
            total_cells: grid.total_cells(),
            history_len: history.len(),
            star_formation_rate,
            mean_star_formation_rate,
            final_active_cells: grid.count_at_least(1),
            clusters,
        })
    }
}
