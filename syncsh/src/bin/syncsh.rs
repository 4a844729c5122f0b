// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use clap::Parser;
use syncsh::{AppExit, CLIArg, is_interactive_terminal, run_app, ui_str};
use termline::TracingConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Exit code for a process ended by Ctrl+C (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    if enable_logging {
        TracingConfig::new_file(
            Some(cli_arg.global_options.log_file.clone()),
            cli_arg.global_options.log_level.into(),
        )
        .install_global()?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    }

    if !is_interactive_terminal() {
        return Err(miette::miette!("{}", ui_str::NOT_INTERACTIVE_MSG));
    }

    let app_exit = run_app(cli_arg).await?;

    if enable_logging {
        tracing::debug!(message = "Stop logging...", app_exit = ?app_exit);
    }

    if app_exit == AppExit::Interrupted {
        // Raw mode is already off, so `\n` returns the carriage too.
        println!();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }

    Ok(())
}
