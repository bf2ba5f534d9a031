//! Headless breach driver.
//!
//! Reads one command per line on stdin and prints every notification the
//! game emits as a JSON line on stdout. Logs go to stderr.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use breach_engine::{Choice, Direction, Game, GameConfig, Input, Notification};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Play breach protocol from a script or a pipe.
#[derive(Parser, Debug)]
#[command(name = "breach")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Game config file; the built-in campaign is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for matrix and sequence generation
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_command(line: &str) -> Result<Input> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        bail!("empty command");
    };
    let input = match command {
        "left" => Input::Move(Direction::Left),
        "right" => Input::Move(Direction::Right),
        "up" => Input::Move(Direction::Up),
        "down" => Input::Move(Direction::Down),
        "commit" => Input::Commit,
        "quit" => Input::Quit,
        "continue" => Input::Choose(Choice::Continue),
        "restart" => Input::Choose(Choice::Restart),
        "timeout" => Input::DeadlineExceeded,
        "tick" => {
            let secs: f64 = words
                .next()
                .context("tick needs a number of seconds")?
                .parse()
                .context("tick seconds must be a number")?;
            let delta = Duration::try_from_secs_f64(secs).context("tick seconds out of range")?;
            Input::Tick(delta)
        }
        other => bail!("unknown command {other:?}"),
    };
    Ok(input)
}

fn emit(out: &mut impl Write, notifications: &[Notification]) -> Result<()> {
    for notification in notifications {
        serde_json::to_writer(&mut *out, notification)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::builtin()?,
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(stages = config.stages.len(), seed = ?cli.seed, "starting game");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let (mut game, opening) = Game::new(config, rng);
    emit(&mut out, &opening)?;

    for line in io::stdin().lock().lines() {
        if game.is_terminated() {
            break;
        }
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_command(line) {
            Ok(input) => {
                debug!(?input, "input");
                emit(&mut out, &game.handle(input))?;
            }
            Err(err) => warn!(%err, line, "ignoring command"),
        }
    }

    if !game.is_terminated() {
        emit(&mut out, &game.handle(Input::Quit))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("left", Input::Move(Direction::Left))]
    #[case("commit", Input::Commit)]
    #[case("restart", Input::Choose(Choice::Restart))]
    #[case("tick 1.5", Input::Tick(Duration::from_millis(1500)))]
    #[case("  timeout  ", Input::DeadlineExceeded)]
    fn parses_commands(#[case] line: &str, #[case] expect: Input) {
        assert_eq!(parse_command(line).unwrap(), expect);
    }

    #[rstest]
    #[case("")]
    #[case("jump")]
    #[case("tick")]
    #[case("tick soon")]
    #[case("tick -1")]
    fn rejects_bad_commands(#[case] line: &str) {
        assert!(parse_command(line).is_err());
    }
}
