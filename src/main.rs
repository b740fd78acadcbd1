//! espalier: force-directed graph navigation for markdown outlines.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use espalier::{app_state, config, ui};
use ratatui::crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "espalier")]
#[command(about = "Force-directed graph navigation for markdown outlines", long_about = None)]
struct Args {
    /// Markdown file to open
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print the graph as JSON instead of starting the TUI
    #[arg(long)]
    dump_graph: bool,

    /// Simulation steps to run before dumping
    #[arg(long, default_value_t = 200, value_name = "N")]
    ticks: usize,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let cfg = config::Config::load();

    let buffer = std::fs::read_to_string(&args.path)?;
    let mut state = app_state::AppState::new(args.path, buffer, &cfg);

    if args.dump_graph {
        for _ in 0..args.ticks {
            if state.sim.is_settled() {
                break;
            }
            state.sim.tick();
        }
        let json =
            serde_json::to_string_pretty(&state.sim.snapshot()).map_err(io::Error::other)?;
        println!("{json}");
        return Ok(());
    }

    run_tui(state, &cfg)
}

fn run_tui(mut app: app_state::AppState, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, cfg);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut app_state::AppState,
    cfg: &config::Config,
) -> io::Result<()> {
    let tick_budget = Duration::from_millis(u64::try_from(cfg.tick_ms).unwrap_or(50));

    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app, cfg))?;

        if !event::poll(tick_budget)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if app.handle_key(key)? {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}
