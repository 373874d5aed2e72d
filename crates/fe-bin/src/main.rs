//! Ferrite modal-layer harness entrypoint.
//!
//! Drives the modal command parser from live terminal input: one crossterm
//! key event per `feed()`, mode / pending state / last command rendered on a
//! single status line. The real editor embeds `core-modal` behind its view
//! layer; this binary exists to exercise the grammar end to end.

use anyhow::Result;
use clap::Parser;
use core_modal::{Cmd, ModalParser, Mode, PendingState, default_table};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Print;
use crossterm::{cursor, execute, terminal};
use std::io::{Write, stdout};
use tracing::info;

mod config;
mod key_input;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ferrite", version, about = "Ferrite modal command layer harness")]
struct Args {
    /// Optional configuration file path (overrides discovery of `ferrite.toml`).
    #[arg(long = "config")]
    pub config: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = config::load_from(args.config)?;

    // File logging to ferrite.log (fresh per run, non-blocking writer).
    let log_dir = std::path::Path::new(".");
    let log_path = log_dir.join("ferrite.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, "ferrite.log");
    let (nb_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.file.log.filter)),
        )
        .with_writer(nb_writer)
        .init();

    info!(target: "runtime", "startup");

    // Log unexpected panics before the raw-mode guard restores the terminal.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(target: "runtime.panic", ?info, "panic");
        default_panic(info);
    }));

    let table = default_table()?;
    let mut parser = ModalParser::new(&table);
    info!(target: "runtime", rules = parser.rule_count(), "parser_ready");

    terminal::enable_raw_mode()?;
    let _raw = RawModeGuard;
    run_loop(&mut parser, &cfg)?;

    info!(target: "runtime", "shutdown");
    Ok(())
}

/// Restores the terminal on every exit path, panics included.
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        let _ = execute!(out, Print("\r\n"));
    }
}

fn run_loop(parser: &mut ModalParser, cfg: &config::Config) -> Result<()> {
    let mut out = stdout();
    let mut last: Option<Cmd> = None;
    render_status(&mut out, parser, cfg, last.as_ref())?;
    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        // Some terminals report Release/Repeat; only presses drive the parser.
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        let Some(key) = key_input::map_key_event(&key_event) else {
            continue;
        };
        // Harness-only escape hatch: bare `q` in Normal mode with nothing
        // pending quits. `q` is not part of the grammar, so nothing is lost.
        if key == core_keys::Key::Char('q')
            && parser.mode() == Mode::Normal
            && parser.pending_state() == PendingState::Idle
        {
            break;
        }
        if let Some(cmd) = parser.feed(key) {
            tracing::debug!(target: "runtime", cmd = ?cmd, "command");
            last = Some(cmd);
        }
        render_status(&mut out, parser, cfg, last.as_ref())?;
    }
    Ok(())
}

fn render_status(
    out: &mut impl Write,
    parser: &ModalParser,
    cfg: &config::Config,
    last: Option<&Cmd>,
) -> Result<()> {
    let mut line = format!("-- {} --", parser.mode());
    if cfg.file.ui.show_pending
        && let PendingState::AwaitingMore { live_rules } = parser.pending_state()
    {
        line.push_str(&format!("  [pending: {live_rules} rules]"));
    }
    if let Some(cmd) = last {
        line.push_str(&format!("  last: {:?} x{}", cmd.kind, cmd.repeat));
    }
    line.push_str("  (q quits)");
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        Print(line)
    )?;
    out.flush()?;
    Ok(())
}
