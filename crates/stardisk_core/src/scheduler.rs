//! Discrete time stepping and history capture.

use crate::automaton::{StarFormation, TickOutcome};
use crate::error::{Result, SimError};
use crate::grid::Grid;
use crate::metrics::Metrics;
use stardisk_data::CellRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cloneable switch that stops a run at the next tick boundary.
#[derive(Debug, Clone)]
pub struct PauseHandle {
    running: Arc<AtomicBool>,
}

impl Default for PauseHandle {
    fn default() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl PauseHandle {
    /// Requests the run loop to stop once the in-flight tick completes.
    pub fn pause(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }

    fn resume(&self) {
        self.running.store(true, Ordering::SeqCst);
    }
}

/// What happened during one completed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStats {
    /// Zero-based tick number within the run.
    pub tick: usize,
    pub t: f64,
    pub outcome: TickOutcome,
    /// Cells at full age after the tick.
    pub stars_formed: usize,
    pub active_cells: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: usize,
    /// Whether the run stopped early on a pause request.
    pub paused: bool,
}

/// Drives the engine over the grid and records one snapshot per tick.
pub struct Scheduler {
    grid: Grid,
    engine: StarFormation,
    history: Vec<CellRecord>,
    timestamp: f64,
    pause: PauseHandle,
    metrics: Metrics,
}

impl Scheduler {
    pub fn new(grid: Grid, engine: StarFormation) -> Self {
        Self {
            grid,
            engine,
            history: Vec::new(),
            timestamp: 0.0,
            pause: PauseHandle::default(),
            metrics: Metrics::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn engine(&self) -> &StarFormation {
        &self.engine
    }

    pub fn history(&self) -> &[CellRecord] {
        &self.history
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Timestamp of the last completed tick.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Ignites `count` dormant cells using the engine's random stream.
    pub fn seed_initial_stars(&mut self, count: usize) -> Result<()> {
        self.engine.seed_initial_stars(&mut self.grid, count)
    }

    pub fn pause(&self) {
        self.pause.pause();
    }

    pub fn pause_handle(&self) -> PauseHandle {
        self.pause.clone()
    }

    /// Runs one tick per timestamp `0, dt, 2 dt, ...` below `t_end`.
    pub fn run(&mut self, dt: f64, t_end: f64) -> Result<RunSummary> {
        self.run_observed(dt, t_end, |_| {})
    }

    /// Like [`Self::run`], calling `observer` after every completed tick.
    pub fn run_observed<F>(&mut self, dt: f64, t_end: f64, mut observer: F) -> Result<RunSummary>
    where
        F: FnMut(&TickStats),
    {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::configuration(format!(
                "Timestep must be positive, got {dt}"
            )));
        }
        if !t_end.is_finite() {
            return Err(SimError::configuration("End time must be finite"));
        }

        self.pause.resume();
        tracing::info!(dt, t_end, cells = self.grid.total_cells(), "Starting simulation");

        let mut tick = 0;
        let mut paused = false;
        loop {
            let t = tick as f64 * dt;
            if t >= t_end {
                break;
            }
            let stats = self.step(tick, t);
            observer(&stats);
            tick += 1;

            if self.pause.is_paused() {
                tracing::info!(tick, t, "Simulation paused");
                paused = true;
                break;
            }
        }

        tracing::info!(
            ticks = tick,
            records = self.history.len(),
            elapsed_ms = self.metrics.elapsed().as_millis() as u64,
            "Simulation finished"
        );
        Ok(RunSummary {
            ticks: tick,
            paused,
        })
    }

    fn step(&mut self, tick: usize, t: f64) -> TickStats {
        let started = Instant::now();
        self.timestamp = t;
        let outcome = self.engine.tick(&mut self.grid);

        let snapshot = self.snapshot();
        let regen_time = self.engine.params().regen_time;
        let stars_formed = snapshot.iter().filter(|r| r.age == regen_time).count();
        let active_cells = snapshot.iter().filter(|r| r.age > 0).count();
        self.history.extend(snapshot);

        tracing::debug!(
            tick,
            t,
            propagated = outcome.propagated,
            random = outcome.random,
            active_cells,
            "Tick complete"
        );
        self.metrics
            .record_tick(started.elapsed(), active_cells, stars_formed);
        TickStats {
            tick,
            t,
            outcome,
            stars_formed,
            active_cells,
        }
    }

    /// One record per cell, ring by ring, with the current rotated bounds.
    pub fn snapshot(&self) -> Vec<CellRecord> {
        let mut records = Vec::with_capacity(self.grid.total_cells());
        for ring in &self.grid.rings {
            for cell in &ring.cells {
                records.push(CellRecord {
                    t: self.timestamp,
                    id: cell.index,
                    age: cell.current_age,
                    parent_ring: ring.index,
                    theta1: ring.get_theta1(cell),
                    theta2: ring.get_theta2(cell),
                });
            }
        }
        records
    }
}
