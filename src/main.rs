//! Line-oriented runner (default binary).
//!
//! Reads whitespace-separated command words from stdin (`left`, `right`,
//! `drop`, `down`, `ccw`, `cw` or the camelCase names), lets gravity run on
//! its own timer and prints each frame that differs from the last one.
//! `quit` or end of input stops the game.
//!
//! Configuration comes from the environment (see `RuntimeConfig::from_env`);
//! logging is controlled with `RUST_LOG`.

use std::io::BufRead;
use std::thread;

use anyhow::{Context, Result};
use env_logger::{Builder, Env};
use log::{info, warn};
use tokio::sync::mpsc;

use tetris_engine::runtime::{Driver, DriverEvent, RuntimeConfig};
use tetris_engine::types::Command;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries frames only
    let _ = Builder::from_env(Env::default().default_filter_or("warn")).try_init();

    let config = RuntimeConfig::from_env();
    info!("starting with {config:?}");

    let mut driver = Driver::spawn(config);
    let (quit_tx, mut quit_rx) = mpsc::channel::<()>(1);
    // Plain thread: a blocked stdin read must not hold the runtime open at exit
    let commands = driver.commands();
    thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || read_commands(std::io::stdin().lock(), commands, quit_tx))
        .context("failed to spawn stdin reader")?;

    let mut last_frame = String::new();
    loop {
        tokio::select! {
            event = driver.next_event() => match event {
                Some(DriverEvent::Frame { text, score }) => {
                    if text != last_frame {
                        println!("{text}\nscore: {score}\n");
                        last_frame = text;
                    }
                }
                Some(DriverEvent::Scored { delta, score }) => {
                    println!("+{delta} (score: {score})");
                }
                Some(DriverEvent::GameOver { score }) => {
                    println!("game over, final score: {score}");
                    break;
                }
                None => break,
            },
            _ = quit_rx.recv() => {
                info!("input closed, stopping");
                break;
            }
        }
    }

    let score = driver.shutdown().await?;
    info!("final score {score}");
    Ok(())
}

/// Forward command words from `input` until `quit`, end of input or the driver stops
fn read_commands(input: impl BufRead, commands: mpsc::Sender<Command>, quit: mpsc::Sender<()>) {
    'input: for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("stdin read failed: {err}");
                break;
            }
        };

        for word in line.split_whitespace() {
            if word.eq_ignore_ascii_case("quit") || word.eq_ignore_ascii_case("q") {
                break 'input;
            }
            match Command::from_str(word) {
                Some(command) => {
                    if commands.blocking_send(command).is_err() {
                        return;
                    }
                }
                None => warn!("unknown command {word:?}"),
            }
        }
    }

    let _ = quit.blocking_send(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn drain(rx: &mut mpsc::Receiver<Command>) -> Vec<Command> {
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            out.push(command);
        }
        out
    }

    #[test]
    fn test_reader_forwards_words_and_stops_at_quit() {
        let (tx, mut rx) = mpsc::channel(16);
        let (quit_tx, mut quit_rx) = mpsc::channel(1);

        let input = Cursor::new("left cw\nbogus DROP quit right\n");
        read_commands(input, tx, quit_tx);

        assert_eq!(
            drain(&mut rx),
            vec![Command::MoveLeft, Command::RotateRight, Command::MoveTop]
        );
        assert!(quit_rx.try_recv().is_ok());
    }

    #[test]
    fn test_reader_signals_quit_at_end_of_input() {
        let (tx, mut rx) = mpsc::channel(16);
        let (quit_tx, mut quit_rx) = mpsc::channel(1);

        read_commands(Cursor::new("down\n"), tx, quit_tx);

        assert_eq!(drain(&mut rx), vec![Command::MoveBottom]);
        assert!(quit_rx.try_recv().is_ok());
    }

    #[test]
    fn test_reader_returns_when_driver_is_gone() {
        let (tx, rx) = mpsc::channel(16);
        let (quit_tx, mut quit_rx) = mpsc::channel(1);
        drop(rx);

        read_commands(Cursor::new("left right\n"), tx, quit_tx);
        assert!(quit_rx.try_recv().is_err());
    }
}
