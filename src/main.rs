use std::{
    io::{self, Write},
    panic,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::DisableMouseCapture,
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use tasktrack::{
    app::{App, Message},
    logging::{init_logging, print_log_location},
    realm::{RootId, apply_message, has_active_fade, init_application, should_quit},
    theme::ThemeMode,
};

#[derive(Parser, Debug)]
#[command(
    name = "tasktrack",
    about = "Single-screen terminal to-do list with light and dark themes",
    version = env!("TASKTRACK_BUILD_VERSION"),
    author
)]
struct Cli {
    /// Initial theme: light, dark, or system.
    #[arg(long, value_name = "MODE")]
    theme: Option<String>,
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

fn main() -> Result<()> {
    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    if let Some(path) = log_path.as_ref() {
        install_panic_hook_with_log(path.clone());
    }

    let outcome = run_app();
    if outcome.is_err()
        && let Some(path) = log_path.as_ref()
    {
        print_log_location(path);
    }
    outcome
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();

    let mode_override = cli
        .theme
        .as_deref()
        .and_then(|value| ThemeMode::from_str(value).ok());
    if cli.theme.is_some() && mode_override.is_none() {
        tracing::warn!(
            "unrecognized --theme value '{}'; using configured theme",
            cli.theme.as_deref().unwrap_or_default()
        );
    }

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(mode_override)));
    let mut realm = init_application(Arc::clone(&app))?;

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| realm.view(&RootId::Root, frame, frame.area()))
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        for message in messages {
            let is_tick = message == Message::Tick;
            apply_message(&app, message)?;
            // Ticks only repaint while a row fade is in flight; everything
            // else is a state change and repaints unconditionally.
            if !is_tick || has_active_fade(&app)? {
                redraw = true;
            }
        }
    }

    let _ = terminal.disable_mouse_capture();
    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(())
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;
    terminal
        .enable_mouse_capture()
        .context("failed to enable mouse capture")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: std::path::PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("Log file: {}", log_path.display());
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(
        stderr,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show,
        ResetColor
    );
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
