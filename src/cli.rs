use clap::Parser;

/// Quickly set up a new GovReady-Q instance from a freshly-cloned repository.
#[derive(Debug, Clone, Parser)]
#[command(name = "govready-install")]
pub struct InstallArgs {
    /// Run without terminal interaction
    #[arg(short = 'n', long)]
    pub non_interactive: bool,

    /// Do pip install with --user flag
    #[arg(short = 'u', long)]
    pub user: bool,

    /// Output more information
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl InstallArgs {
    /// Verbose level 1 and up streams subprocess output to the console.
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }
}
