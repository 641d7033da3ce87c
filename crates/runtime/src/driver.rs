//! Async driver: gravity, render polling and command intake.
//!
//! The engine is synchronous; the driver owns the cadence. Three tasks share
//! one engine behind a mutex:
//!
//! - gravity: `advance_tick` every `gravity_ms`, accumulating the score
//! - render: a text frame every `1 / render_fps` seconds
//! - commands: applies [`Command`]s from a bounded queue as they arrive
//!
//! The gravity task is the only one that reports [`DriverEvent::GameOver`],
//! so the event is sent once even when a hard drop ends the game.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::config::RuntimeConfig;
use crate::engine::Engine;
use crate::types::Command;

/// Engine handle shared between the driver tasks
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Something the driver wants the caller to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// Rendered board plus the running score
    Frame { text: String, score: u64 },
    /// A tick returned a non-zero delta
    Scored { delta: u32, score: u64 },
    /// The game ended; sent exactly once
    GameOver { score: u64 },
}

/// Running game
pub struct Driver {
    engine: SharedEngine,
    score: Arc<AtomicU64>,
    cmd_tx: mpsc::Sender<Command>,
    event_rx: mpsc::UnboundedReceiver<DriverEvent>,
    stop_tx: Arc<watch::Sender<bool>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Driver {
    /// Start a fresh game seeded from `config`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config: RuntimeConfig) -> Self {
        let engine = Engine::with_seed(config.seed);
        Self::spawn_with_engine(config, engine)
    }

    /// Start driving an existing engine
    pub fn spawn_with_engine(config: RuntimeConfig, engine: Engine) -> Self {
        let engine: SharedEngine = Arc::new(Mutex::new(engine));
        let score = Arc::new(AtomicU64::new(0));
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(config.max_pending_commands.max(1));
        let (event_tx, event_rx) = mpsc::unbounded_channel::<DriverEvent>();
        // Every receiver exists before any task runs, so an early stop is seen
        let (stop_tx, _) = watch::channel(false);
        let stop_tx = Arc::new(stop_tx);

        info!(
            "driver starting: gravity={}ms render={}fps seed={}",
            config.gravity_ms, config.render_fps, config.seed
        );

        let tasks = vec![
            tokio::spawn(gravity_loop(
                engine.clone(),
                score.clone(),
                event_tx.clone(),
                config.gravity_interval(),
                stop_tx.subscribe(),
                stop_tx.clone(),
            )),
            tokio::spawn(render_loop(
                engine.clone(),
                score.clone(),
                event_tx,
                config.render_interval(),
                stop_tx.subscribe(),
            )),
            tokio::spawn(command_loop(engine.clone(), cmd_rx, stop_tx.subscribe())),
        ];

        Self {
            engine,
            score,
            cmd_tx,
            event_rx,
            stop_tx,
            tasks,
        }
    }

    /// A sender for feeding commands from another task
    pub fn commands(&self) -> mpsc::Sender<Command> {
        self.cmd_tx.clone()
    }

    /// Queue a command, waiting if the queue is full
    pub async fn send(&self, command: Command) -> Result<()> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| anyhow!("driver stopped; dropped {}", command.as_str()))
    }

    /// Next event, or `None` once every task has finished
    pub async fn next_event(&mut self) -> Option<DriverEvent> {
        self.event_rx.recv().await
    }

    /// Score accumulated from every tick so far
    pub fn score(&self) -> u64 {
        self.score.load(Ordering::Acquire)
    }

    pub fn engine(&self) -> SharedEngine {
        self.engine.clone()
    }

    /// Stop all tasks and return the final score
    pub async fn shutdown(self) -> Result<u64> {
        let _ = self.stop_tx.send(true);
        for task in self.tasks {
            task.await.context("driver task panicked")?;
        }
        let score = self.score.load(Ordering::Acquire);
        info!("driver stopped: score={score}");
        Ok(score)
    }
}

async fn gravity_loop(
    engine: SharedEngine,
    score: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<DriverEvent>,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
    stop_tx: Arc<watch::Sender<bool>>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; gravity starts one period in.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop_rx.changed() => break,
        }

        let (delta, game_over) = {
            let mut engine = engine.lock().await;
            let delta = engine.advance_tick();
            (delta, engine.is_game_over())
        };

        if delta > 0 {
            let total = score.fetch_add(u64::from(delta), Ordering::AcqRel) + u64::from(delta);
            debug!("scored {delta}, total {total}");
            let _ = events.send(DriverEvent::Scored {
                delta,
                score: total,
            });
        }

        if game_over {
            let total = score.load(Ordering::Acquire);
            info!("game over: score={total}");
            let _ = events.send(DriverEvent::GameOver { score: total });
            let _ = stop_tx.send(true);
            break;
        }
    }
}

async fn render_loop(
    engine: SharedEngine,
    score: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<DriverEvent>,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = stop_rx.changed() => break,
        }

        let (text, game_over) = {
            let engine = engine.lock().await;
            (engine.render_text(), engine.is_game_over())
        };
        let frame = DriverEvent::Frame {
            text,
            score: score.load(Ordering::Acquire),
        };
        if events.send(frame).is_err() || game_over {
            break;
        }
    }
}

async fn command_loop(
    engine: SharedEngine,
    mut commands: mpsc::Receiver<Command>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        let command = tokio::select! {
            cmd = commands.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
            _ = stop_rx.changed() => break,
        };

        let applied = engine.lock().await.input(command);
        debug!(
            "command {} {}",
            command.as_str(),
            if applied { "applied" } else { "ignored" }
        );
    }
}
