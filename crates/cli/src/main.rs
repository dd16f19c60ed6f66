//! ciwright CLI Application

// The panic hook writes to stderr before tracing is known to work.
#![allow(clippy::print_stderr)]

use ciwright::cli::{self, EXIT_OK, exit_code_for, render_error};
use ciwright::commands;
use ciwright::tracing::{TracingConfig, init_tracing};

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    if let Err(e) = init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.log_level.into(),
    }) {
        eprintln!("{e:?}");
    }

    let stdout = std::io::stdout();
    let exit_code = match commands::run(&cli, &mut stdout.lock()) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            tracing::debug!(error = %err, "Command failed");
            render_error(&err);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}
