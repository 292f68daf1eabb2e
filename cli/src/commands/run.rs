use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, ValueHint};
use synacor_emulator::runtime::{LineConsole, TextTrace};
use synacor_emulator::{Computer, LoadOptions};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
pub struct RunOpt {
    /// Program image
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,

    /// Write a trace of every executed instruction to this file
    #[clap(short, long, value_parser, value_hint = ValueHint::FilePath)]
    trace: Option<Utf8PathBuf>,

    /// Extend the memory to the whole 15-bit address space
    #[clap(long, action = ArgAction::SetTrue)]
    pad_memory: bool,
}

impl RunOpt {
    pub fn exec(self) -> anyhow::Result<()> {
        info!(path = %self.input, "Reading program");
        let image = File::open(&self.input)
            .with_context(|| format!("could not open program image {}", self.input))?;
        let options = LoadOptions {
            pad_to_address_space: self.pad_memory,
        };
        let mut computer = Computer::load(image, options)
            .with_context(|| format!("could not load program image {}", self.input))?;

        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        let mut console = LineConsole::new(stdin, stdout);

        info!("Running program");
        let result = if let Some(path) = &self.trace {
            debug!(%path, "Tracing execution");
            let file = File::create(path)
                .with_context(|| format!("could not create trace file {path}"))?;
            let mut trace = TextTrace::new(BufWriter::new(file));
            let result = computer.run(&mut console, &mut trace);
            if let Err(e) = trace.into_inner().flush() {
                warn!(%path, error = %e, "Could not write trace file");
            }
            result
        } else {
            computer.run(&mut console, &mut ())
        };

        let termination = result.with_context(|| {
            format!(
                "program crashed on the instruction at address {} after {} instructions",
                computer.pc, computer.cycles
            )
        })?;

        info!(
            %termination,
            cycles = computer.cycles,
            registers = %computer.registers,
            "End of program"
        );

        Ok(())
    }
}
