//! Line-oriented command interpreter driving a single pathing engine.

use std::{error::Error, fmt};

use grid_defence_core::{EffectKind, GridError, NextHop, TileCoord};
use grid_defence_world::PathEngine;

/// Interactive session wrapping one engine instance.
#[derive(Debug)]
pub(crate) struct Session {
    engine: PathEngine,
}

/// Outcome of interpreting a single input line.
#[derive(Debug, PartialEq)]
pub(crate) enum Reply {
    /// Text to print for the user.
    Text(String),
    /// The user asked to end the session.
    Quit,
}

impl Session {
    pub(crate) fn new(engine: PathEngine) -> Self {
        Self { engine }
    }

    /// Interprets one input line against the engine.
    pub(crate) fn run_line(&mut self, line: &str) -> Result<Reply, SessionError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Reply::Text(String::new()));
        };

        match verb {
            "build" => {
                let tile = parse_tile_args(&mut words)?;
                let built = self.engine.try_build(tile)?;
                Ok(Reply::Text(if built {
                    format!("built tower at {tile}")
                } else {
                    format!("rejected tower at {tile}")
                }))
            }
            "remove" => {
                let tile = parse_tile_args(&mut words)?;
                let removed = self.engine.remove_obstruction(tile)?;
                Ok(Reply::Text(if removed {
                    format!("removed tower at {tile}")
                } else {
                    format!("no tower at {tile}")
                }))
            }
            "step" => {
                let tile = parse_tile_args(&mut words)?;
                Ok(Reply::Text(match self.engine.next_step(tile)? {
                    NextHop::Step(next) => format!("step to {next}"),
                    NextHop::Terminal => "at goal".to_owned(),
                }))
            }
            "path" => {
                let tile = parse_tile_args(&mut words)?;
                let path = self.engine.path_to_goal(tile)?;
                let rendered: Vec<String> = path.iter().map(ToString::to_string).collect();
                Ok(Reply::Text(rendered.join(" -> ")))
            }
            "cost" => {
                let tile = parse_tile_args(&mut words)?;
                let cost = self.engine.cost_to_goal(tile)?;
                Ok(Reply::Text(format!("cost {cost:.3}")))
            }
            "effect" => {
                let tile = parse_tile_args(&mut words)?;
                let kind = match words.next() {
                    Some("fire") => EffectKind::Fire,
                    Some("stun") => EffectKind::Stun,
                    other => {
                        return Err(SessionError::UnknownEffect {
                            word: other.unwrap_or("").to_owned(),
                        })
                    }
                };
                self.engine.add_effect(tile, kind)?;
                Ok(Reply::Text(format!("effect added at {tile}")))
            }
            "effects" => {
                let active = self.engine.active_effects();
                if active.is_empty() {
                    return Ok(Reply::Text("no active effects".to_owned()));
                }
                let rendered: Vec<String> = active
                    .iter()
                    .map(|(tile, kind)| format!("{tile} {kind:?}"))
                    .collect();
                Ok(Reply::Text(rendered.join("\n")))
            }
            "tick" => {
                self.engine.tick_effects();
                Ok(Reply::Text("effects aged".to_owned()))
            }
            "show" => Ok(Reply::Text(self.render_grid())),
            "quit" | "exit" => Ok(Reply::Quit),
            other => Err(SessionError::UnknownCommand {
                word: other.to_owned(),
            }),
        }
    }

    /// ASCII map of the grid: spawn `S`, goal `G`, towers `#`, open `.`.
    fn render_grid(&self) -> String {
        let mut out = String::new();
        for y in 0..self.engine.height() {
            for x in 0..self.engine.width() {
                let tile = TileCoord::new(x, y);
                let glyph = if tile == self.engine.spawn() {
                    'S'
                } else if tile == self.engine.goal() {
                    'G'
                } else if self.engine.is_blocked(tile).unwrap_or(false) {
                    '#'
                } else {
                    '.'
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

fn parse_tile_args<'a, I>(words: &mut I) -> Result<TileCoord, SessionError>
where
    I: Iterator<Item = &'a str>,
{
    let x = parse_coordinate_word(words.next())?;
    let y = parse_coordinate_word(words.next())?;
    Ok(TileCoord::new(x, y))
}

fn parse_coordinate_word(word: Option<&str>) -> Result<u32, SessionError> {
    let word = word.ok_or(SessionError::MissingCoordinate)?;
    word.parse()
        .map_err(|_| SessionError::MalformedCoordinate {
            word: word.to_owned(),
        })
}

/// Failures produced while interpreting a command line.
#[derive(Debug, PartialEq)]
pub(crate) enum SessionError {
    /// Input verb is not part of the command vocabulary.
    UnknownCommand {
        /// Verb that was read.
        word: String,
    },
    /// Effect name is neither `fire` nor `stun`.
    UnknownEffect {
        /// Word that was read in effect position.
        word: String,
    },
    /// A command expected a coordinate pair but the line ended early.
    MissingCoordinate,
    /// A coordinate component was not an unsigned integer.
    MalformedCoordinate {
        /// Word that failed to parse.
        word: String,
    },
    /// The engine rejected the operation.
    Engine(GridError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand { word } => write!(f, "unknown command `{word}`"),
            Self::UnknownEffect { word } => {
                write!(f, "unknown effect `{word}`, expected `fire` or `stun`")
            }
            Self::MissingCoordinate => write!(f, "expected `<x> <y>` coordinates"),
            Self::MalformedCoordinate { word } => {
                write!(f, "`{word}` is not a valid coordinate component")
            }
            Self::Engine(error) => write!(f, "{error}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(error) => Some(error),
            _ => None,
        }
    }
}

impl From<GridError> for SessionError {
    fn from(error: GridError) -> Self {
        Self::Engine(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_3x3() -> Session {
        let engine = PathEngine::new(3, 3, TileCoord::new(0, 0), TileCoord::new(2, 2))
            .expect("valid geometry");
        Session::new(engine)
    }

    #[test]
    fn build_show_and_remove_round_trip() {
        let mut session = session_3x3();

        assert_eq!(
            session.run_line("build 1 1"),
            Ok(Reply::Text("built tower at (1, 1)".to_owned()))
        );
        assert_eq!(
            session.run_line("show"),
            Ok(Reply::Text("S..\n.#.\n..G\n".to_owned()))
        );
        assert_eq!(
            session.run_line("remove 1 1"),
            Ok(Reply::Text("removed tower at (1, 1)".to_owned()))
        );
        assert_eq!(
            session.run_line("remove 1 1"),
            Ok(Reply::Text("no tower at (1, 1)".to_owned()))
        );
    }

    #[test]
    fn spawn_placements_read_as_rejections() {
        let mut session = session_3x3();
        assert_eq!(
            session.run_line("build 0 0"),
            Ok(Reply::Text("rejected tower at (0, 0)".to_owned()))
        );
    }

    #[test]
    fn path_renders_the_tile_sequence() {
        let mut session = session_3x3();
        assert_eq!(
            session.run_line("path 0 0"),
            Ok(Reply::Text("(0, 0) -> (1, 1) -> (2, 2)".to_owned()))
        );
    }

    #[test]
    fn malformed_input_is_reported_without_panicking() {
        let mut session = session_3x3();

        assert_eq!(
            session.run_line("build one 1"),
            Err(SessionError::MalformedCoordinate {
                word: "one".to_owned()
            })
        );
        assert_eq!(session.run_line("build 1"), Err(SessionError::MissingCoordinate));
        assert_eq!(
            session.run_line("launch 1 1"),
            Err(SessionError::UnknownCommand {
                word: "launch".to_owned()
            })
        );
        assert_eq!(
            session.run_line("effect 1 1 lava"),
            Err(SessionError::UnknownEffect {
                word: "lava".to_owned()
            })
        );
    }

    #[test]
    fn engine_errors_pass_through() {
        let mut session = session_3x3();
        assert!(matches!(
            session.run_line("build 9 9"),
            Err(SessionError::Engine(GridError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn quit_ends_the_session() {
        let mut session = session_3x3();
        assert_eq!(session.run_line("quit"), Ok(Reply::Quit));
        assert_eq!(session.run_line("   "), Ok(Reply::Text(String::new())));
    }
}
