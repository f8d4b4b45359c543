//! The install sequence: step metadata, narration framing, and the driver.

mod outcome;
mod steps;

pub use outcome::InstallOutcome;

use std::future::Future;

use crate::admin::AdminDetails;
use crate::cli::InstallArgs;
use crate::command::CommandEnv;
use crate::environment;
use crate::error::{InstallError, Result};
use crate::lock::InstallLock;

/// Section spacer printed between steps.
const SPACER: &str = "\n====\n";

/// One ordered unit of the install sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Report the host platform.
    PlatformReport,
    /// Probe the python3 version and gate on the minimum supported one.
    PythonVersionGate,
    /// Check for a virtual Python environment and gate on it.
    VirtualenvGate,
    /// Verify python3 and pip3 resolve on the search path.
    RequiredCommands,
    /// Announce interactive or non-interactive mode.
    ModeBanner,
    /// pip-install the application's declared dependencies.
    InstallRequirements,
    /// Fetch static vendor resources from the Internet.
    FetchVendorResources,
    /// Collect static assets into the serving directory.
    CollectStatic,
    /// Ensure the local environment record exists.
    EnvironmentRecord,
    /// Apply schema migrations and load extension modules.
    MigrateDatabase,
    /// First-run bootstrap: provision the administrator account.
    FirstRun,
    /// Load the bundled sample project.
    LoadSampleProject,
}

impl Step {
    /// The fixed execution order.
    pub fn sequence() -> &'static [Self] {
        &[
            Self::PlatformReport,
            Self::PythonVersionGate,
            Self::VirtualenvGate,
            Self::RequiredCommands,
            Self::ModeBanner,
            Self::InstallRequirements,
            Self::FetchVendorResources,
            Self::CollectStatic,
            Self::EnvironmentRecord,
            Self::MigrateDatabase,
            Self::FirstRun,
            Self::LoadSampleProject,
        ]
    }

    /// Short name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlatformReport => "platform-report",
            Self::PythonVersionGate => "python-version-gate",
            Self::VirtualenvGate => "virtualenv-gate",
            Self::RequiredCommands => "required-commands",
            Self::ModeBanner => "mode-banner",
            Self::InstallRequirements => "install-requirements",
            Self::FetchVendorResources => "fetch-vendor-resources",
            Self::CollectStatic => "collect-static",
            Self::EnvironmentRecord => "environment-record",
            Self::MigrateDatabase => "migrate-database",
            Self::FirstRun => "first-run",
            Self::LoadSampleProject => "load-sample-project",
        }
    }

    /// Narration phrase for the start/"... done" framing. `None` for steps
    /// that narrate themselves.
    pub fn phrase(self) -> Option<&'static str> {
        match self {
            Self::PlatformReport
            | Self::PythonVersionGate
            | Self::VirtualenvGate
            | Self::ModeBanner => None,
            Self::RequiredCommands => Some("Confirming python3 and pip3 commands are available"),
            Self::InstallRequirements => Some("Installing Python libraries via pip"),
            Self::FetchVendorResources => Some("Fetching static resource files from Internet"),
            Self::CollectStatic => Some("Collecting files into static directory"),
            Self::EnvironmentRecord => Some("Creating local/environment.json file"),
            Self::MigrateDatabase => Some("Initializing/migrating database"),
            Self::FirstRun => {
                Some("Setting up system and creating Administrator user if none exists")
            }
            Self::LoadSampleProject => Some("Setting up GovReady-Q sample project if none exists"),
        }
    }

    /// Whether this step may pause for an advisory confirmation.
    pub fn is_advisory_gate(self) -> bool {
        matches!(self, Self::PythonVersionGate | Self::VirtualenvGate)
    }
}

/// Run the whole sequence against the current directory.
pub async fn run(args: &InstallArgs) -> InstallOutcome {
    let root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            return InstallOutcome::FailedFatally(format!(
                "Failed to determine the installation directory: {}",
                e
            ));
        }
    };
    let env = CommandEnv::new(root, args.is_verbose());
    Installer::new(args, env).run_to_outcome().await
}

/// Drives the fixed step sequence against one installation directory.
pub(crate) struct Installer {
    env: CommandEnv,
    non_interactive: bool,
    user_install: bool,
    admin: AdminDetails,
}

impl Installer {
    pub(crate) fn new(args: &InstallArgs, env: CommandEnv) -> Self {
        Self {
            env,
            non_interactive: args.non_interactive,
            user_install: args.user,
            admin: AdminDetails::NotReported,
        }
    }

    /// Run the sequence, racing it against an interrupt request. An
    /// interrupt is an orderly halt: the in-flight command is killed and
    /// the install lock is released.
    pub(crate) async fn run_to_outcome(self) -> InstallOutcome {
        self.run_with_interrupt(tokio::signal::ctrl_c()).await
    }

    async fn run_with_interrupt<F>(mut self, interrupt: F) -> InstallOutcome
    where
        F: Future<Output = std::io::Result<()>> + Send,
    {
        println!(">>>>>>>>>> Welcome to the GovReady-Q Installer <<<<<<<<<\n");
        let result = tokio::select! {
            result = self.run_sequence() => result,
            signal = interrupt => match signal {
                Ok(()) => Err(InstallError::halted("interrupted by user")),
                Err(e) => Err(InstallError::io(format!(
                    "Failed to listen for interrupts: {}",
                    e
                ))),
            },
        };
        InstallOutcome::from_result(result)
    }

    /// Execute every step in order, stopping at the first failure.
    async fn run_sequence(&mut self) -> Result<()> {
        let _lock = InstallLock::acquire(&self.env.root)?;
        println!("Testing environment...\n");
        for &step in Step::sequence() {
            self.execute(step).await?;
            println!("{}", SPACER);
        }
        self.report_success();
        Ok(())
    }

    async fn execute(&mut self, step: Step) -> Result<()> {
        tracing::debug!(
            advisory = step.is_advisory_gate(),
            "Running install step '{}'",
            step.name()
        );
        if let Some(phrase) = step.phrase() {
            println!("{}...", phrase);
        }
        self.dispatch(step).await?;
        if let Some(phrase) = step.phrase() {
            println!("... done {}.", decapitalize(phrase));
        }
        Ok(())
    }

    async fn dispatch(&mut self, step: Step) -> Result<()> {
        match step {
            Step::PlatformReport => steps::report_platform(),
            Step::PythonVersionGate => {
                steps::python_version_gate(&self.env, self.non_interactive).await?;
            }
            Step::VirtualenvGate => {
                steps::virtualenv_gate(&self.env, self.non_interactive).await?;
            }
            Step::RequiredCommands => steps::required_commands(&self.env).await?,
            Step::ModeBanner => steps::mode_banner(self.non_interactive, self.env.verbose).await,
            Step::InstallRequirements => {
                steps::install_requirements(&self.env, self.user_install).await?;
            }
            Step::FetchVendorResources => steps::fetch_vendor_resources(&self.env).await?,
            Step::CollectStatic => steps::collect_static(&self.env).await?,
            Step::EnvironmentRecord => steps::environment_record(&self.env)?,
            Step::MigrateDatabase => steps::migrate_database(&self.env).await?,
            Step::FirstRun => self.admin = steps::first_run(&self.env).await?,
            Step::LoadSampleProject => steps::load_sample_project(&self.env).await?,
        }
        Ok(())
    }

    fn report_success(&self) {
        println!(
            "\n***********************************\n\
             * GovReady-Q Server configured... *\n\
             ***********************************\n\n\
             To start GovReady-Q, run:\n    ./manage.py runserver\n"
        );
        if let Some(summary) = self.admin.summary() {
            if self.admin.is_newly_created() {
                println!("Log in with these administrator credentials.\n\nWRITE THIS DOWN:\n");
            }
            println!("{}\n", summary);
        }
        println!(
            "When GovReady-Q is running, visit {}/ with your web browser.\n",
            environment::DEFAULT_GOVREADY_URL
        );
    }
}

/// Lower-case the leading character for the "... done {phrase}." line.
fn decapitalize(phrase: &str) -> String {
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
