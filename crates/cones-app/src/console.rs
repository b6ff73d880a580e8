//! Line-based control console on stdin.
//!
//! Each line is `<name> <value>`, e.g. `belt_speed 3.5` or `frame_skip 4`.
//! `quit` stops the loop.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread::JoinHandle;

use log::{info, warn};
use thiserror::Error;

use cones_core::commands::SimCommand;

use crate::state::LoopCommand;

#[derive(Debug, Error, PartialEq)]
pub enum CommandParseError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` needs a value")]
    MissingValue(&'static str),
    #[error("`{name}`: cannot parse `{value}` as a number")]
    BadValue { name: &'static str, value: String },
    #[error("`{name}` must be {rule}, got {value}")]
    OutOfRange {
        name: &'static str,
        rule: &'static str,
        value: f64,
    },
    #[error("unexpected trailing input `{0}`")]
    Trailing(String),
}

/// Parse one console line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<LoopCommand>, CommandParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(CommandParseError::Trailing(extra.to_string()));
    }

    let command = match name {
        "quit" | "exit" => {
            if let Some(arg) = arg {
                return Err(CommandParseError::Trailing(arg.to_string()));
            }
            LoopCommand::Shutdown
        }
        "frame_skip" => {
            let value = arg.ok_or(CommandParseError::MissingValue("frame_skip"))?;
            let n = value
                .parse::<u32>()
                .map_err(|_| CommandParseError::BadValue {
                    name: "frame_skip",
                    value: value.to_string(),
                })?;
            LoopCommand::SetFrameSkip(n.max(1))
        }
        "belt_speed" => {
            LoopCommand::Sim(SimCommand::SetBeltSpeed { value: positive("belt_speed", arg)? })
        }
        "belt_width" => {
            LoopCommand::Sim(SimCommand::SetBeltWidth { value: positive("belt_width", arg)? })
        }
        "cone_rate" => {
            LoopCommand::Sim(SimCommand::SetConeRate { value: positive("cone_rate", arg)? })
        }
        "cone_variance" => LoopCommand::Sim(SimCommand::SetConeVariance {
            value: non_negative("cone_variance", arg)?,
        }),
        "hose_range" => LoopCommand::Sim(SimCommand::SetHoseRange {
            value: non_negative("hose_range", arg)?,
        }),
        "hose_speed" => LoopCommand::Sim(SimCommand::SetHoseSpeed {
            value: non_negative("hose_speed", arg)?,
        }),
        "fill_rate" => {
            LoopCommand::Sim(SimCommand::SetFillRate { value: positive("fill_rate", arg)? })
        }
        "urgent_time" => LoopCommand::Sim(SimCommand::SetUrgentTime {
            value: non_negative("urgent_time", arg)?,
        }),
        other => return Err(CommandParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn number(name: &'static str, arg: Option<&str>) -> Result<f64, CommandParseError> {
    let value = arg.ok_or(CommandParseError::MissingValue(name))?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CommandParseError::BadValue {
            name,
            value: value.to_string(),
        }),
    }
}

fn positive(name: &'static str, arg: Option<&str>) -> Result<f64, CommandParseError> {
    let value = number(name, arg)?;
    if value <= 0.0 {
        return Err(CommandParseError::OutOfRange {
            name,
            rule: "positive",
            value,
        });
    }
    Ok(value)
}

fn non_negative(name: &'static str, arg: Option<&str>) -> Result<f64, CommandParseError> {
    let value = number(name, arg)?;
    if value < 0.0 {
        return Err(CommandParseError::OutOfRange {
            name,
            rule: "non-negative",
            value,
        });
    }
    Ok(value)
}

/// Forward commands read from `input` until it ends, `quit` is read, or the
/// loop goes away. Bad lines are logged and skipped.
pub fn forward_lines(
    input: impl BufRead,
    tx: &mpsc::Sender<LoopCommand>,
    shutdown_on_eof: bool,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(Some(command)) => {
                let quit = command == LoopCommand::Shutdown;
                if tx.send(command).is_err() || quit {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{e}"),
        }
    }
    if shutdown_on_eof {
        info!("input closed, stopping");
        let _ = tx.send(LoopCommand::Shutdown);
    }
    Ok(())
}

/// Read stdin on a background thread.
pub fn spawn_reader(
    tx: mpsc::Sender<LoopCommand>,
    shutdown_on_eof: bool,
) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("cones-console".into())
        .spawn(move || {
            let stdin = io::stdin();
            if let Err(e) = forward_lines(stdin.lock(), &tx, shutdown_on_eof) {
                warn!("console read failed: {e}");
            }
        })
}
