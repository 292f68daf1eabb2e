//! Command line front-end for the Synacor VM.
//!
//! The running program owns stdin and stdout, so every log line goes to
//! stderr. Exit status is 0 when the program stops on its own (`halt` or an
//! empty stack) and 1 on any load error or fault.

#![forbid(unsafe_code)]

use std::io::IsTerminal;
use std::process::exit;

use clap::{ArgAction, ArgGroup, Parser};
use tracing::error;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

use crate::commands::Subcommand;

#[derive(Parser)]
#[clap(version, author, about, group = ArgGroup::new("format"))]
struct Opt {
    /// Show more logs on stderr. Repeat for the per-instruction logs of the VM.
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Force colored logs, even when stderr is not a terminal
    #[clap(short = 'c', long, global = true, group = "format")]
    color: bool,

    /// Never color the logs
    #[clap(short = 'C', long, global = true, group = "format")]
    no_color: bool,

    /// Write logs to stderr as JSON lines
    #[clap(short, long, global = true, group = "format")]
    json: bool,

    #[clap(subcommand)]
    command: Subcommand,
}

impl Opt {
    /// Quiet by default: only the program's own output should show up
    const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "synacor_emulator=info,synacor=info,warn",
            // `debug` logs every executed instruction
            2 => "synacor_emulator=debug,synacor=debug,info",
            3 => "synacor_emulator=trace,synacor=trace,debug",
            4..=u8::MAX => "trace",
        }
    }

    fn should_use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            std::io::stderr().is_terminal()
        }
    }

    fn filter_layer(&self) -> EnvFilter {
        // RUST_LOG wins over -v
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_filter()))
    }
}

fn main() {
    let opt = Opt::parse();

    let registry = tracing_subscriber::Registry::default().with(opt.filter_layer());
    if opt.json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .without_time()
            .with_ansi(opt.should_use_colors())
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }

    if let Err(e) = opt.command.exec() {
        // The whole chain, e.g. "program crashed ...: division by zero"
        error!("{:#}", e);
        exit(1);
    }
}
