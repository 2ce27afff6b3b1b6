use std::path::PathBuf;

use clap::Parser;

use screen_overlay::logging;
use screen_overlay_core::AppConfig;

#[derive(Parser)]
#[command(version, about = "Tint the screen with a translucent color")]
struct Cli {
    /// Path of the color FIFO shared by the picker and the overlay
    #[arg(long)]
    fifo: Option<PathBuf>,

    /// Where the picker saves its cursor positions
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Start at the menu instead of opening the picker
    #[arg(long)]
    no_picker: bool,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(fifo) = self.fifo {
            config.fifo_path = fifo;
        }
        if let Some(state_file) = self.state_file {
            config.state_file = state_file;
        }
        if self.no_picker {
            config.show_startup_picker = false;
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Keep the guard alive for the process lifetime to flush logs
    let log_guard = logging::init();

    let mut config = AppConfig::load_or_default();
    cli.apply(&mut config);

    if let Err(e) = screen_overlay::run(&config) {
        tracing::error!(error = %e.report(), "Screen overlay failed");
        eprintln!("Error: {}", e.report());
        drop(log_guard);
        std::process::exit(1);
    }
}
