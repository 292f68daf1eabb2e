use clap::Parser;

mod completion;
mod disasm;
mod run;

#[derive(Parser, Debug)]
pub enum Subcommand {
    /// Load and run a program image
    Run(self::run::RunOpt),

    /// Print the instructions of a program image
    Disasm(self::disasm::DisasmOpt),

    /// Generate shell completions
    Completion(self::completion::CompletionOpt),
}

impl Subcommand {
    /// Run a subcommand
    pub fn exec(self) -> anyhow::Result<()> {
        match self {
            Self::Run(opt) => opt.exec(),
            Self::Disasm(opt) => opt.exec(),
            Self::Completion(opt) => opt.exec(),
        }
    }
}
