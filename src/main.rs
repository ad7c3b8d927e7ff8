//! freqstrip — per-core CPU clock-scaling frequency strip for the terminal.
//!
//! Features:
//!   - One label per online logical CPU, read live from cpufreq each tick
//!   - User-editable label template ($L, $N, $F, $M, $m, $G, $g)
//!   - Centered labels, marquee scrolling when a label does not fit
//!   - Settings persisted in an rc file
//!
//! Keybindings: Press F1 or '?' for help.

mod app;
mod config;
mod format;
mod input;
mod system;
mod ui;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use sysinfo::System;

use app::App;
use config::{default_config_path, FreqConfig, DEFAULT_SYSFS_ROOT};
use system::measure::TerminalMeasure;
use system::sampler::Sampler;

/// Width assumed for placement when printing labels without a terminal.
const ONCE_WIDTH: usize = 80;

/// Show the current scaling frequency of every online CPU as a
/// periodically refreshed strip of labels.
#[derive(Debug, Parser)]
#[command(version)]
struct Opts {
    /// Config file to load and save. Defaults to
    /// $XDG_CONFIG_HOME/freqstrip/freqstriprc.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// Label template, overriding the config file. See --help-format.
    #[clap(short = 'f', long)]
    format: Option<String>,

    /// Timer tick interval in milliseconds.
    #[clap(short = 'i', long)]
    interval_ms: Option<u64>,

    /// Act only on every Nth tick.
    #[clap(short = 'd', long)]
    decimate: Option<u64>,

    /// CPU topology root holding `online` and `cpuN/cpufreq/`.
    #[clap(long, default_value = DEFAULT_SYSFS_ROOT)]
    sysfs_root: PathBuf,

    /// Sample once, print one label per line and exit.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    once: bool,

    /// Print the label template directives and exit.
    #[clap(long, action = clap::ArgAction::SetTrue)]
    help_format: bool,

    /// Write log output to this file. The interactive strip logs nowhere
    /// otherwise.
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(opts: &Opts) -> Result<()> {
    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);

    if let Some(path) = &opts.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        simplelog::WriteLogger::init(llv, lcfg.build(), file)?;
    } else if opts.once {
        simplelog::TermLogger::init(
            llv,
            lcfg.build(),
            simplelog::TerminalMode::Stderr,
            simplelog::ColorChoice::Auto,
        )?;
    }
    Ok(())
}

/// File config with command-line overrides applied.
fn load_config(opts: &Opts, path: Option<&PathBuf>) -> FreqConfig {
    let mut cfg = match path {
        Some(p) => FreqConfig::load(p),
        None => FreqConfig::default(),
    };
    if let Some(format) = &opts.format {
        cfg.set_template(format.as_str());
    }
    if let Some(ms) = opts.interval_ms {
        cfg.set_update_interval_ms(ms);
    }
    if let Some(n) = opts.decimate {
        cfg.set_tick_decimation(n);
    }
    cfg
}

fn cpu_brand() -> String {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.cpus().first().map(|c| c.brand().to_string()).unwrap_or_default()
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(&opts)?;

    if opts.help_format {
        println!("Label template directives:");
        println!("{}", format::directive_help());
        return Ok(());
    }

    let config_path = opts.config.clone().or_else(default_config_path);
    let config = load_config(&opts, config_path.as_ref());
    debug!("config: {:?}", config);

    if opts.once {
        return print_once(&config, &opts.sysfs_root);
    }

    let mut app = App::new(config, config_path, opts.sysfs_root.clone());
    app.cpu_brand = cpu_brand();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("exiting after {} ticks", app.tick);
    Ok(())
}

/// Headless mode: one tick, labels to stdout.
fn print_once(config: &FreqConfig, root: &Path) -> Result<()> {
    let mut sampler = Sampler::new(root);
    sampler.activate(config, &TerminalMeasure);
    if let Some(labels) = sampler.tick(config, &TerminalMeasure, ONCE_WIDTH) {
        for label in labels {
            println!("{}", label.text);
        }
    }
    Ok(())
}

/// Main application loop
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    app.reconfigure();
    app.strip_width = ui::strip_inner_width(app, terminal.size()?.width);
    app.on_tick();

    let mut last_tick = Instant::now();

    loop {
        app.strip_width = ui::strip_inner_width(app, terminal.size()?.width);

        // Draw
        terminal.draw(|f| ui::draw(f, app)).context("Failed to draw frame")?;

        if app.should_quit {
            return Ok(());
        }

        // Handle events with short timeout for responsiveness
        let tick_rate = Duration::from_millis(app.config.update_interval_ms);
        let timeout = tick_rate
            .saturating_sub(last_tick.elapsed())
            .min(Duration::from_millis(50));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        input::handle_input(app, key);
                        if app.should_quit {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(_, _) => {
                    // Picked up on next draw
                }
                _ => {}
            }
        }

        // Timer tick
        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.on_tick();
        }
    }
}
