//! Timer-driven layout loop
//!
//! Each run is a tokio task that owns its [`Simulation`] and the tick
//! callback. Ticks are fixed-delay: the next one is scheduled a full period
//! after the previous one finished, so slow callbacks lower the effective
//! rate instead of causing bursts.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::LayoutError;
use super::simulation::Simulation;
use super::types::LayoutConfig;
use crate::geometry::Point;
use crate::graph::Graph;

/// Lifecycle of a [`LayoutSimulator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    /// Never started
    Idle,
    /// A run is ticking
    Running,
    /// The last run was stopped; a new one may be started
    Stopped,
}

/// Starts and tracks layout runs, one at a time
#[derive(Debug)]
pub struct LayoutSimulator {
    config: LayoutConfig,
    current: Option<CancellationToken>,
}

impl LayoutSimulator {
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            current: None,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn state(&self) -> LayoutState {
        match &self.current {
            None => LayoutState::Idle,
            Some(token) if token.is_cancelled() => LayoutState::Stopped,
            Some(_) => LayoutState::Running,
        }
    }

    /// Snapshot `graph` and start ticking on the current tokio runtime.
    ///
    /// `on_tick` receives the positions of every vertex, in slot order, after
    /// each tick. The graph itself is never modified.
    pub fn start<F>(&mut self, graph: &Graph, on_tick: F) -> Result<StopHandle, LayoutError>
    where
        F: FnMut(&[Point]) + Send + 'static,
    {
        if self.state() == LayoutState::Running {
            return Err(LayoutError::AlreadyRunning);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| LayoutError::NoRuntime)?;
        let period = self.config.tick_period()?;
        let simulation = Simulation::from_graph(graph, self.config.clone())?;

        info!(
            particles = simulation.particles().len(),
            springs = simulation.springs().len(),
            steps_per_second = self.config.steps_per_second,
            "starting layout"
        );

        let token = CancellationToken::new();
        let task = runtime.spawn(run_ticks(simulation, period, token.clone(), on_tick));
        self.current = Some(token.clone());
        Ok(StopHandle { token, task })
    }

    /// Request the current run (if any) to stop at its next tick boundary
    pub fn stop(&self) {
        if let Some(token) = &self.current {
            token.cancel();
        }
    }
}

/// Controls a running layout
#[derive(Debug)]
#[must_use = "dropping the handle leaves the layout running"]
pub struct StopHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl StopHandle {
    /// Request a stop. A tick already in progress still completes and reports;
    /// no tick after it will.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop and wait until the tick loop has exited and released its state
    pub async fn stop_and_wait(self) -> Result<(), LayoutError> {
        self.stop();
        self.task
            .await
            .map_err(|e| LayoutError::TaskFailed(e.to_string()))
    }
}

async fn run_ticks<F>(
    mut simulation: Simulation,
    period: Duration,
    token: CancellationToken,
    mut on_tick: F,
) where
    F: FnMut(&[Point]) + Send + 'static,
{
    // marks the run stopped however the task ends, including a panicking callback
    let _stopped = token.clone().drop_guard();
    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            () = tokio::time::sleep(period) => {}
        }
        let positions = simulation.step();
        on_tick(&positions);
    }
    debug!(ticks = simulation.ticks(), "layout loop exited");
    info!("layout stopped");
}
