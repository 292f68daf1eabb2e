use std::io::Write;

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, Shell};

use crate::Opt;

#[derive(Parser, Debug)]
pub struct CompletionOpt {
    /// Shell to generate the completion script for
    #[clap(value_enum)]
    shell: ShellKind,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShellKind {
    Bash,
    Elvish,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Zsh,
}

impl From<ShellKind> for Shell {
    fn from(kind: ShellKind) -> Self {
        match kind {
            ShellKind::Bash => Shell::Bash,
            ShellKind::Elvish => Shell::Elvish,
            ShellKind::Fish => Shell::Fish,
            ShellKind::PowerShell => Shell::PowerShell,
            ShellKind::Zsh => Shell::Zsh,
        }
    }
}

impl CompletionOpt {
    /// Print the script on stdout, e.g. `synacor completion zsh > _synacor`
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut command = Opt::command();
        let name = command.get_name().to_string();
        let mut stdout = std::io::stdout().lock();
        generate(Shell::from(self.shell), &mut command, name, &mut stdout);
        stdout.flush()?;

        Ok(())
    }
}
