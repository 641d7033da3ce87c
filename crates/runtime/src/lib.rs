//! Async runtime for the tetris engine
//!
//! Drives an [`engine::Engine`] on Tokio timers: gravity at a fixed interval,
//! render polling at a fixed frame rate and a bounded command queue. The
//! engine itself stays synchronous; this crate only schedules calls into it.
//!
//! ```no_run
//! use tetris_engine_runtime::{Driver, DriverEvent, RuntimeConfig};
//! use tetris_engine_runtime::types::Command;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let mut driver = Driver::spawn(RuntimeConfig::from_env());
//! driver.send(Command::MoveTop).await?;
//!
//! while let Some(event) = driver.next_event().await {
//!     if let DriverEvent::GameOver { score } = event {
//!         println!("final score {score}");
//!     }
//! }
//! driver.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;

pub use tetris_engine_core as engine;
pub use tetris_engine_types as types;

pub use config::RuntimeConfig;
pub use driver::{Driver, DriverEvent, SharedEngine};
