//! Interactive line-oriented play over any reader/writer pair.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use twenty48_core::{Direction, Engine, EngineError, GameState, Score};

const HELP: &str = "\
moves: up/down/left/right, w/a/s/d or k/j/h/l
other: r = restart, ? = help, q = quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Restart,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r" | "restart" | "new" => Ok(Command::Restart),
            "?" | "help" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => other.parse().map(Command::Move),
        }
    }
}

/// What the front end should tell the player after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Moved { gained: Score },
    Unchanged,
    /// A move was attempted on a finished game.
    NoLegalMove { score: Score },
    /// This move ended the game.
    GameOver { score: Score },
    Restarted,
}

/// Owns the current game and threads it through the engine.
pub struct Session {
    engine: Engine,
    rng: StdRng,
    state: GameState,
}

impl Session {
    pub fn new(engine: Engine, mut rng: StdRng) -> Self {
        let state = engine.new_game(&mut rng);
        Self { engine, rng, state }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn apply(&mut self, direction: Direction) -> Event {
        if self.state.game_over {
            return Event::NoLegalMove {
                score: self.state.score,
            };
        }
        let result = self.engine.apply_move(
            self.state.board,
            self.state.score,
            direction,
            &mut self.rng,
        );
        if !result.changed {
            if result.game_over {
                self.state.game_over = true;
                return Event::NoLegalMove {
                    score: result.score,
                };
            }
            return Event::Unchanged;
        }
        let gained = result.score - self.state.score;
        self.state = GameState {
            board: result.board,
            score: result.score,
            game_over: result.game_over,
        };
        if result.game_over {
            Event::GameOver {
                score: result.score,
            }
        } else {
            Event::Moved { gained }
        }
    }

    pub fn restart(&mut self) -> Event {
        self.state = self.engine.restart(&mut self.rng);
        Event::Restarted
    }
}

/// Read commands line by line until `quit` or end of input. Returns the final state.
pub fn run<I: BufRead, O: Write>(
    session: &mut Session,
    input: I,
    mut out: O,
) -> Result<GameState> {
    render(session, &mut out)?;
    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(c) => c,
            Err(err) => {
                writeln!(out, "{err} (? for help)")?;
                continue;
            }
        };
        debug!("command {command:?}");
        let event = match command {
            Command::Quit => break,
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Restart => session.restart(),
            Command::Move(d) => session.apply(d),
        };
        match event {
            Event::Unchanged => writeln!(out, "nothing moved")?,
            Event::NoLegalMove { score } => {
                writeln!(out, "No legal move left, you got {score} points. r to restart.")?;
                continue;
            }
            Event::GameOver { score } => {
                info!("game over with score {score}");
                render(session, &mut out)?;
                writeln!(out, "Game over! Your score: {score}")?;
                continue;
            }
            Event::Moved { gained } => {
                if gained > 0 {
                    debug!("merged for {gained}");
                }
                render(session, &mut out)?
            }
            Event::Restarted => render(session, &mut out)?,
        }
    }
    out.flush()?;
    Ok(session.state())
}

fn render<O: Write>(session: &Session, out: &mut O) -> Result<()> {
    let state = session.state();
    writeln!(out, "\nscore: {}\n{}", state.score, state.board)?;
    Ok(())
}
