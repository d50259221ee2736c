// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! toposcope CLI entrypoint.
//!
//! Runs the interactive terminal UI on the topology graph page by default;
//! `--page process` starts on the process map instead.

use std::error::Error;

use toposcope::pages::Route;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--page <graph|process>]\n\nStarts the interactive diagram UI.\n--page selects the starting page (default: graph)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    page: Option<Route>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--page" => {
                if options.page.is_some() {
                    return Err(());
                }
                let value = args.next().ok_or(())?;
                options.page = Some(match value.as_str() {
                    "graph" => Route::MainGraph,
                    "process" => Route::ProcessMap,
                    _ => return Err(()),
                });
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "toposcope".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        toposcope::tui::run(options.page.unwrap_or(Route::MainGraph))
    })();

    if let Err(err) = result {
        eprintln!("toposcope: {err}");
        std::process::exit(1);
    }
}
