use crate::messages::{Command, InputEvent, KeyPress};
use crate::sample::PointerPosition;
use anyhow::{Context, Result, anyhow, bail};
use std::io::BufRead;
use tokio::sync::mpsc;

const KEY_Q: u32 = 81;
const KEY_S: u32 = 83;
const KEY_W: u32 = 87;

/// Map a key press onto a recorder command.
///
/// Only Shift+Q, Shift+W and Shift+S are bound; everything else is ignored.
pub fn command_for_key(key: KeyPress) -> Option<Command> {
    if !key.shift_key {
        return None;
    }

    match key.key_code {
        KEY_Q => Some(Command::StartRecording),
        KEY_W => Some(Command::StopRecording),
        KEY_S => Some(Command::Export),
        _ => None,
    }
}

/// Parse one line of the host event stream.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let event = match verb {
        "key" => InputEvent::Key(parse_key(rest)?),
        "move" => InputEvent::PointerText(rest.to_string()),
        "pos" => InputEvent::PointerPosition(parse_position(rest)?),
        "name" => InputEvent::FileName(rest.to_string()),
        "quit" => InputEvent::Quit,
        other => bail!("unknown event {:?}", other),
    };

    Ok(Some(event))
}

fn parse_key(args: &str) -> Result<KeyPress> {
    let mut parts = args.split_whitespace();
    let key_code = parts
        .next()
        .context("key event needs a key code")?
        .parse::<u32>()
        .context("key code must be a number")?;

    let shift_key = match parts.next() {
        None => false,
        Some("shift") => true,
        Some(other) => bail!("unknown key modifier {:?}", other),
    };

    Ok(KeyPress {
        key_code,
        shift_key,
    })
}

fn parse_position(args: &str) -> Result<PointerPosition> {
    let mut parts = args.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(lon)), Some(Ok(lat)), None) => Ok(PointerPosition { lon, lat }),
        _ => Err(anyhow!("pos event needs <lon> <lat>, got {:?}", args)),
    }
}

/// Read events line by line and forward them on `tx`.
///
/// Blocks the calling thread, so run it on a thread of its own: a read
/// parked on stdin must never hold up runtime shutdown. Stops at end of
/// input or when the receiver goes away. Lines that do not parse are
/// logged and skipped.
pub fn monitor_input<R: BufRead>(reader: R, tx: mpsc::Sender<InputEvent>) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("Failed to read input event")?;
        match parse_line(&line) {
            Ok(Some(event)) => {
                tracing::trace!("Input event: {:?}", event);
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring input line {:?}: {}", line, e),
        }
    }

    tracing::debug!("Input monitor finished");
    Ok(())
}
