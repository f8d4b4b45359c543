//! The step implementations, in execution order.
//!
//! Steps narrate to stdout; start/done framing for the framed steps is
//! printed by the driver in `mod.rs`, from each step's narration phrase.

use std::time::Duration;

use crate::admin::AdminDetails;
use crate::command::{is_available, CommandEnv, RunResult, StepCommand};
use crate::environment::{self, RecordStatus};
use crate::error::{InstallError, Result};
use crate::paths;
use crate::platform;
use crate::prompt;
use crate::python;

/// Commands that must resolve on the search path before install work starts.
const REQUIRED_COMMANDS: [&str; 2] = ["python3", "pip3"];

/// Pause after the mode banner in verbose mode, so it can be read before
/// subprocess output starts streaming.
const MODE_BANNER_PAUSE: Duration = Duration::from_secs(3);

pub(super) fn report_platform() {
    println!("{}", platform::platform_report());
}

/// Report the python3 version and gate on the minimum supported one.
///
/// An interpreter that cannot be probed is reported and waved through; the
/// required-commands step owns the fatal "not available" case.
pub(super) async fn python_version_gate(env: &CommandEnv, non_interactive: bool) -> Result<()> {
    let Some(version) = python::probe_version(env).await else {
        println!("! Unable to determine Python version.");
        return Ok(());
    };
    println!(
        "Python version is {}.{}.{}.",
        version.major, version.minor, version.patch
    );
    if version >= python::min_supported_version() {
        println!("+ Python version is >= 3.8.");
        return Ok(());
    }
    println!("! Python version is < 3.8.");
    println!("GovReady-Q is best run with Python 3.8 or higher.");
    println!("It is STRONGLY encouraged to run GovReady-Q with Python 3.8 or higher.");
    let question = format!(
        "Continue install with Python {}.{}.{}?",
        version.major, version.minor, version.patch
    );
    if prompt::confirm(&question, non_interactive).await? {
        Ok(())
    } else {
        Err(InstallError::halted("Python version is < 3.8"))
    }
}

/// Check for a virtual Python environment and gate on running inside one.
pub(super) async fn virtualenv_gate(env: &CommandEnv, non_interactive: bool) -> Result<()> {
    println!("Check for virtual Python environment.");
    match python::probe_virtualenv(env).await {
        Some(true) => {
            println!("+ Installer is running inside a virtual Python environment.");
        }
        Some(false) => {
            println!("! Installer is not running inside a virtual Python environment.");
            println!(
                "It is STRONGLY encouraged to run GovReady-Q inside a Python virtual environment."
            );
            let confirmed = prompt::confirm(
                "Continue install outside of virtual environment?",
                non_interactive,
            )
            .await?;
            if !confirmed {
                return Err(InstallError::halted(
                    "Installer is not running inside a virtual Python environment",
                ));
            }
        }
        None => println!("! Unable to check for a virtual Python environment."),
    }
    Ok(())
}

pub(super) async fn required_commands(env: &CommandEnv) -> Result<()> {
    for command in REQUIRED_COMMANDS {
        if !is_available(command, env).await {
            return Err(InstallError::missing_command(command));
        }
    }
    Ok(())
}

pub(super) async fn mode_banner(non_interactive: bool, verbose: bool) {
    let mode = if non_interactive {
        "non-interactive"
    } else {
        "interactive"
    };
    println!("Installing/updating GovReady-Q in {} mode.", mode);
    if verbose {
        tokio::time::sleep(MODE_BANNER_PAUSE).await;
    }
}

pub(super) async fn install_requirements(env: &CommandEnv, user_install: bool) -> Result<()> {
    let mut args = vec!["install"];
    if user_install {
        args.push("--user");
    }
    args.extend(["-r", "requirements.txt"]);
    run_fatal(StepCommand::new("pip3 install", "pip3", &args), env).await?;
    Ok(())
}

pub(super) async fn fetch_vendor_resources(env: &CommandEnv) -> Result<()> {
    run_fatal(
        StepCommand::new(
            "./fetch-vendor-resources.sh",
            "./fetch-vendor-resources.sh",
            &[],
        ),
        env,
    )
    .await?;
    Ok(())
}

pub(super) async fn collect_static(env: &CommandEnv) -> Result<()> {
    run_fatal(
        StepCommand::new(
            "./manage.py collectstatic --no-input",
            "./manage.py",
            &["collectstatic", "--no-input"],
        ),
        env,
    )
    .await?;
    Ok(())
}

/// Ensure `local/environment.json` exists, generating it when absent.
///
/// The precondition is explicit: a well-formed record satisfies the step
/// with no side effect, a malformed one is fatal after its content is shown.
pub(super) fn environment_record(env: &CommandEnv) -> Result<()> {
    let path = paths::environment_file(&env.root);
    match environment::inspect_record(&path)? {
        RecordStatus::Present => {
            println!("environment.json file already exists, proceeding");
        }
        RecordStatus::Absent => environment::create_record(&env.root)?,
        RecordStatus::Malformed { content } => {
            println!("'{}' is not in JSON format:", paths::ENVIRONMENT_FILE);
            println!(">>>>>>>>>>");
            println!("{}", content);
            println!("<<<<<<<<<<");
            return Err(InstallError::config(format!(
                "'{}' is not in JSON format.",
                paths::ENVIRONMENT_FILE
            )));
        }
    }
    Ok(())
}

pub(super) async fn migrate_database(env: &CommandEnv) -> Result<()> {
    run_fatal(
        StepCommand::new("./manage.py migrate", "./manage.py", &["migrate"]),
        env,
    )
    .await?;
    run_fatal(
        StepCommand::new("./manage.py load_modules", "./manage.py", &["load_modules"]),
        env,
    )
    .await?;
    Ok(())
}

/// Run the first-run bootstrap and parse the administrator-account details
/// from its output.
pub(super) async fn first_run(env: &CommandEnv) -> Result<AdminDetails> {
    let command = StepCommand::new(
        "./manage.py first_run --non-interactive",
        "./manage.py",
        &["first_run", "--non-interactive"],
    );
    // Always captured, never streamed: the details are parsed from stdout.
    let result = command.run_captured(env).await?;
    if !result.success() {
        return Err(InstallError::command(command.label(), result.code));
    }
    if env.verbose {
        if !result.stdout.is_empty() {
            println!("{}", result.stdout);
        }
        if !result.stderr.is_empty() {
            println!("{}", result.stderr);
        }
    }
    Ok(AdminDetails::parse(&result.stdout))
}

pub(super) async fn load_sample_project(env: &CommandEnv) -> Result<()> {
    run_fatal(
        StepCommand::new(
            "./manage.py load_govready_ssp",
            "./manage.py",
            &["load_govready_ssp"],
        ),
        env,
    )
    .await?;
    Ok(())
}

/// Run a step command, failing with the step's fatal message when it exits
/// non-zero.
async fn run_fatal(command: StepCommand, env: &CommandEnv) -> Result<RunResult> {
    let result = command.run(env).await?;
    if !result.success() {
        return Err(InstallError::command(command.label(), result.code));
    }
    Ok(result)
}
