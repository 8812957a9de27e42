//! Command-line REPL standing in for a desktop keyboard and mouse
//!
//! Lines typed at the prompt become [`ReplCommand`]s; [`DesktopInput`]
//! folds them into per-frame [`RawInput`]. Commands:
//!
//! ```text
//! down <key> / up <key>   hold or release a key
//! tap <key>               press for one frame
//! drag <dx> <dy>          mouse drag in pixels
//! wheel <lines>           mouse wheel (positive scrolls down the list)
//! hover <n> | hover none  flat-menu pointer hover
//! click                   primary button for one frame
//! mode desktop|xr         switch navigation mode
//! load <gallery>          load a gallery directly
//! status                  print the current state
//! quit | exit
//! ```

use anyhow::Result;
use glam::Vec2;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::input::{Key, KeyboardEvent, KeyboardState, MouseFrame, RawInput, XrFrame};
use crate::navigation::NavigationMode;

/// One parsed REPL line
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Key(KeyboardEvent),
    Tap(String),
    Drag(Vec2),
    Wheel(f32),
    Hover(Option<usize>),
    Click,
    Mode(NavigationMode),
    Load(String),
    Status,
    Help,
    Quit,
}

pub fn parse_mode(value: &str) -> Result<NavigationMode, String> {
    match value.trim().to_lowercase().as_str() {
        "desktop" => Ok(NavigationMode::Desktop),
        "xr" | "vr" => Ok(NavigationMode::Xr),
        other => Err(format!("unknown mode '{}' (expected desktop or xr)", other)),
    }
}

fn parse_f32(value: Option<&str>, name: &str) -> Result<f32, String> {
    let value = value.ok_or_else(|| format!("missing {}", name))?;
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid {} '{}'", name, value))
}

/// Parse one REPL line
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().ok_or_else(|| "empty command".to_string())?;
    let rest: Vec<&str> = parts.collect();
    let arg = rest.first().copied();

    let command = command.to_lowercase();
    match command.as_str() {
        "down" | "up" | "tap" => {
            let key = arg.ok_or_else(|| format!("usage: {} <key>", command))?;
            Ok(match command.as_str() {
                "down" => ReplCommand::Key(KeyboardEvent::down(key)),
                "up" => ReplCommand::Key(KeyboardEvent::up(key)),
                _ => ReplCommand::Tap(key.to_string()),
            })
        }
        "drag" => Ok(ReplCommand::Drag(Vec2::new(
            parse_f32(arg, "dx")?,
            parse_f32(rest.get(1).copied(), "dy")?,
        ))),
        "wheel" => Ok(ReplCommand::Wheel(parse_f32(arg, "lines")?)),
        "hover" => match arg {
            None | Some("none") => Ok(ReplCommand::Hover(None)),
            Some(index) => index
                .parse::<usize>()
                .map(|i| ReplCommand::Hover(Some(i)))
                .map_err(|_| format!("invalid item index '{}'", index)),
        },
        "click" => Ok(ReplCommand::Click),
        "mode" => parse_mode(arg.unwrap_or_default()).map(ReplCommand::Mode),
        "load" if !rest.is_empty() => Ok(ReplCommand::Load(rest.join(" "))),
        "load" => Err("usage: load <gallery>".to_string()),
        "status" => Ok(ReplCommand::Status),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Accumulates REPL commands into per-frame desktop input
#[derive(Debug, Default)]
pub struct DesktopInput {
    keyboard: KeyboardState,
    /// Keys tapped this frame, released after it
    taps: Vec<Key>,
    mouse: MouseFrame,
}

impl DesktopInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an input command in; returns false for commands this type ignores
    pub fn apply(&mut self, command: &ReplCommand) -> bool {
        match command {
            ReplCommand::Key(event) => {
                // An explicit down or up supersedes a pending tap of the same key
                let key = Key::from_identifier(&event.key);
                self.taps.retain(|tapped| Some(*tapped) != key);
                self.keyboard.apply(event);
            }
            ReplCommand::Tap(name) => {
                // Tapping a key already held down leaves it held
                if let Some(key) = Key::from_identifier(name) {
                    if !self.keyboard.held().contains(&key) && self.keyboard.apply(&KeyboardEvent::down(name.as_str())) {
                        self.taps.push(key);
                    }
                }
            }
            ReplCommand::Drag(delta) => self.mouse.drag_delta += *delta,
            ReplCommand::Wheel(lines) => self.mouse.wheel += *lines,
            ReplCommand::Hover(index) => self.mouse.hover = *index,
            ReplCommand::Click => self.mouse.primary_down = true,
            _ => return false,
        }
        true
    }

    /// Input for the next frame; one-frame inputs are consumed
    pub fn take_frame(&mut self, xr: Option<XrFrame>) -> RawInput {
        let raw = RawInput {
            keys: self.keyboard.held().clone(),
            mouse: self.mouse,
            xr,
        };

        for key in self.taps.drain(..) {
            self.keyboard.release(key);
        }
        self.mouse.drag_delta = Vec2::ZERO;
        self.mouse.wheel = 0.0;
        self.mouse.primary_down = false;
        raw
    }
}

pub const HELP: &str = "commands: down/up/tap <key>, drag <dx> <dy>, wheel <lines>, hover <n>|none, click, \
mode desktop|xr, load <gallery>, status, quit";

/// Run the line editor on its own thread, forwarding parsed commands
///
/// The thread ends on `quit`, EOF or when the receiver is dropped.
pub fn spawn_repl(tx: mpsc::UnboundedSender<ReplCommand>) -> Result<std::thread::JoinHandle<()>> {
    let handle = std::thread::Builder::new()
        .name("repl".to_string())
        .spawn(move || {
            let mut rl = match DefaultEditor::new() {
                Ok(rl) => rl,
                Err(e) => {
                    warn!("REPL unavailable: {}", e);
                    return;
                }
            };
            debug!("REPL started");

            loop {
                match rl.readline("gallery> ") {
                    Ok(line) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let _ = rl.add_history_entry(line.as_str());
                        match parse_command(&line) {
                            Ok(command) => {
                                let quit = command == ReplCommand::Quit;
                                if tx.send(command).is_err() || quit {
                                    break;
                                }
                            }
                            Err(e) => println!("{}\n{}", e, HELP),
                        }
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                        let _ = tx.send(ReplCommand::Quit);
                        break;
                    }
                    Err(e) => {
                        warn!("REPL error: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("down W"), Ok(ReplCommand::Key(KeyboardEvent::down("W"))));
        assert_eq!(parse_command("tap m"), Ok(ReplCommand::Tap("m".to_string())));
        assert_eq!(parse_command("drag 10 -4.5"), Ok(ReplCommand::Drag(Vec2::new(10.0, -4.5))));
        assert_eq!(parse_command("hover 3"), Ok(ReplCommand::Hover(Some(3))));
        assert_eq!(parse_command("hover none"), Ok(ReplCommand::Hover(None)));
        assert_eq!(parse_command("mode XR"), Ok(ReplCommand::Mode(NavigationMode::Xr)));
        assert_eq!(parse_command("load Gallery 2"), Ok(ReplCommand::Load("Gallery 2".to_string())));
        assert_eq!(parse_command("exit"), Ok(ReplCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("").is_err());
        assert!(parse_command("down").is_err());
        assert!(parse_command("drag 1").is_err());
        assert!(parse_command("wheel lots").is_err());
        assert!(parse_command("mode fly").is_err());
        assert!(parse_command("load").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_tap_lasts_one_frame() {
        let mut input = DesktopInput::new();
        input.apply(&ReplCommand::Tap("m".into()));
        assert!(input.take_frame(None).keys.contains(&Key::M));
        assert!(!input.take_frame(None).keys.contains(&Key::M));
    }

    #[test]
    fn test_tap_on_held_key_keeps_it_held() {
        let mut input = DesktopInput::new();
        input.apply(&ReplCommand::Key(KeyboardEvent::down("w")));
        input.apply(&ReplCommand::Tap("w".into()));
        assert!(input.take_frame(None).keys.contains(&Key::W));
        assert!(input.take_frame(None).keys.contains(&Key::W));
    }

    #[test]
    fn test_down_after_tap_keeps_key_held() {
        let mut input = DesktopInput::new();
        input.apply(&ReplCommand::Tap("w".into()));
        input.apply(&ReplCommand::Key(KeyboardEvent::down("w")));
        input.take_frame(None);
        assert!(input.take_frame(None).keys.contains(&Key::W));
    }

    #[test]
    fn test_held_key_persists() {
        let mut input = DesktopInput::new();
        input.apply(&ReplCommand::Key(KeyboardEvent::down("w")));
        assert!(input.take_frame(None).keys.contains(&Key::W));
        assert!(input.take_frame(None).keys.contains(&Key::W));
        input.apply(&ReplCommand::Key(KeyboardEvent::up("w")));
        assert!(input.take_frame(None).keys.is_empty());
    }

    #[test]
    fn test_mouse_deltas_are_consumed() {
        let mut input = DesktopInput::new();
        input.apply(&ReplCommand::Drag(Vec2::new(5.0, 0.0)));
        input.apply(&ReplCommand::Drag(Vec2::new(5.0, 2.0)));
        input.apply(&ReplCommand::Click);
        input.apply(&ReplCommand::Hover(Some(1)));

        let first = input.take_frame(None);
        assert_eq!(first.mouse.drag_delta, Vec2::new(10.0, 2.0));
        assert!(first.mouse.primary_down);

        let second = input.take_frame(None);
        assert_eq!(second.mouse.drag_delta, Vec2::ZERO);
        assert!(!second.mouse.primary_down);
        // Hover is a position, not a delta
        assert_eq!(second.mouse.hover, Some(1));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut input = DesktopInput::new();
        assert!(input.apply(&ReplCommand::Tap("f13".into())));
        assert!(input.take_frame(None).keys.is_empty());
        assert!(!input.apply(&ReplCommand::Status));
    }
}
