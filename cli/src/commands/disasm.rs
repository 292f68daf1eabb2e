use std::fs::File;
use std::io::Write;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, ValueHint};
use synacor_emulator::{disassemble, load, LoadOptions};
use tracing::info;

#[derive(Parser, Debug)]
pub struct DisasmOpt {
    /// Program image
    #[clap(value_parser, value_hint = ValueHint::FilePath)]
    input: Utf8PathBuf,

    /// Address to start from
    #[clap(short, long, default_value_t = 0)]
    start: u16,

    /// Maximum number of entries to print
    #[clap(short = 'n', long)]
    count: Option<usize>,
}

impl DisasmOpt {
    pub fn exec(&self) -> anyhow::Result<()> {
        info!(path = %self.input, "Reading program");
        let image = File::open(&self.input)
            .with_context(|| format!("could not open program image {}", self.input))?;
        let memory = load(image, LoadOptions::default())
            .with_context(|| format!("could not load program image {}", self.input))?;

        let mut stdout = std::io::stdout().lock();
        let listing = disassemble(&memory, self.start).take(self.count.unwrap_or(usize::MAX));
        for entry in listing {
            writeln!(stdout, "{entry}")?;
        }

        Ok(())
    }
}
