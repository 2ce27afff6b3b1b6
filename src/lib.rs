pub mod error;
pub mod logging;
pub mod menu;
pub mod session;

use screen_overlay_core::{AppConfig, ColorFifo};
use screen_overlay_window::{INITIAL_TINT, TintWindow};

pub use error::AppError;

const OVERLAY_TITLE: &str = "Screen overlay";

/// Run the overlay until the user quits the menu
pub fn run(config: &AppConfig) -> Result<(), AppError> {
    let fifo = ColorFifo::create(&config.fifo_path)?;
    tracing::info!(fifo = ?fifo.path(), "Color channel ready");

    let result = run_overlay(config, &fifo);

    if let Err(e) = fifo.remove() {
        tracing::warn!(error = %e, "Failed to remove color channel");
    }
    result
}

fn run_overlay(config: &AppConfig, fifo: &ColorFifo) -> Result<(), AppError> {
    let mut tint = TintWindow::open(OVERLAY_TITLE, INITIAL_TINT)?;
    let screen = tint.screen();
    tracing::info!(width = screen.width, height = screen.height, "Overlay mapped");

    if config.show_startup_picker {
        session::run_picker_session(&mut tint, config, fifo)?;
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    menu::run_menu(stdin.lock(), &mut stdout, || {
        session::run_picker_session(&mut tint, config, fifo).map(|_| ())
    })?;

    tracing::info!(color = %tint.color(), "Overlay closed");
    Ok(())
}
