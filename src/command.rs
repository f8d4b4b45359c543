//! Spawning and supervising the external commands the install steps run.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::{InstallError, Result};

/// Upper bound on the runtime of any single step command.
pub const STEP_TIME_BUDGET: Duration = Duration::from_secs(30 * 60);

/// Where and how step commands run.
#[derive(Debug, Clone)]
pub struct CommandEnv {
    /// Installation root every command runs in.
    pub root: PathBuf,
    /// Stream subprocess output to the console instead of capturing it.
    pub verbose: bool,
    /// Extra environment variables for spawned commands.
    pub envs: Vec<(String, String)>,
}

impl CommandEnv {
    pub fn new(root: PathBuf, verbose: bool) -> Self {
        Self {
            root,
            verbose,
            envs: Vec::new(),
        }
    }
}

/// Outcome of one executed command.
#[derive(Debug)]
pub struct RunResult {
    /// Exit code, `-1` if the process was terminated by a signal.
    pub code: i32,
    /// Captured stdout; empty when output streamed to the console.
    pub stdout: String,
    /// Captured stderr; empty when output streamed to the console.
    pub stderr: String,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// One external command of the install sequence.
///
/// The label is how narration and error messages name the command; it is
/// usually shorter than the full argument list.
#[derive(Debug)]
pub struct StepCommand {
    label: String,
    program: String,
    args: Vec<String>,
}

impl StepCommand {
    pub fn new(label: &str, program: &str, args: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the command, streaming output in verbose mode and capturing it
    /// otherwise. Exceeding the time budget kills the command and fails.
    pub async fn run(&self, env: &CommandEnv) -> Result<RunResult> {
        if env.verbose {
            self.run_streamed(env).await
        } else {
            self.run_captured(env).await
        }
    }

    /// Run the command with output captured regardless of verbosity.
    pub async fn run_captured(&self, env: &CommandEnv) -> Result<RunResult> {
        let mut cmd = self.build(env);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let child = cmd.spawn().map_err(|e| self.spawn_error(&e))?;
        let output = timeout(STEP_TIME_BUDGET, child.wait_with_output())
            .await
            .map_err(|_| InstallError::timeout(&self.label, STEP_TIME_BUDGET.as_secs()))?
            .map_err(|e| self.wait_error(&e))?;
        Ok(RunResult {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_streamed(&self, env: &CommandEnv) -> Result<RunResult> {
        let mut cmd = self.build(env);
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        let mut child = cmd.spawn().map_err(|e| self.spawn_error(&e))?;
        let status = timeout(STEP_TIME_BUDGET, child.wait())
            .await
            .map_err(|_| InstallError::timeout(&self.label, STEP_TIME_BUDGET.as_secs()))?
            .map_err(|e| self.wait_error(&e))?;
        Ok(RunResult {
            code: status.code().unwrap_or(-1),
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    fn build(&self, env: &CommandEnv) -> Command {
        tracing::debug!("Spawning '{}' in {}", self.label, env.root.display());
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&env.root)
            .kill_on_drop(true);
        for (key, value) in &env.envs {
            cmd.env(key, value);
        }
        cmd
    }

    fn spawn_error(&self, err: &std::io::Error) -> InstallError {
        InstallError::io(format!("Failed to run '{}': {}", self.label, err))
    }

    fn wait_error(&self, err: &std::io::Error) -> InstallError {
        InstallError::io(format!("Failed to wait for '{}': {}", self.label, err))
    }
}

/// Whether `program` resolves and runs on the search path.
///
/// Any exit code counts as available; a command that fails to spawn at all,
/// or does not finish within the step time budget, is missing.
pub async fn is_available(program: &str, env: &CommandEnv) -> bool {
    available_within(program, env, STEP_TIME_BUDGET).await
}

async fn available_within(program: &str, env: &CommandEnv, budget: Duration) -> bool {
    let mut cmd = Command::new(program);
    cmd.arg("--version")
        .current_dir(&env.root)
        .kill_on_drop(true);
    for (key, value) in &env.envs {
        cmd.env(key, value);
    }
    matches!(timeout(budget, cmd.output()).await, Ok(Ok(_)))
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt as _;
    use std::time::Duration;

    use tempfile::tempdir;

    use super::{available_within, is_available, CommandEnv, StepCommand};
    use crate::error::ErrorKind;

    fn env_for(dir: &std::path::Path) -> CommandEnv {
        CommandEnv::new(dir.to_path_buf(), false)
    }

    /// A stub that spins on shell builtins until it is killed.
    fn write_hang_stub(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("hang");
        fs::write(&path, "#!/bin/sh\nwhile :; do :; done\n").expect("write stub");
        let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("make stub executable");
        path
    }

    #[tokio::test]
    async fn captured_run_collects_output_and_exit_code() {
        let dir = tempdir().expect("scratch dir");
        let cmd = StepCommand::new("echo test", "sh", &["-c", "echo hello; exit 3"]);
        let result = cmd
            .run(&env_for(dir.path()))
            .await
            .expect("command should spawn");
        assert_eq!(result.code, 3);
        assert!(!result.success());
        assert_eq!(result.stdout, "hello\n");
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let dir = tempdir().expect("scratch dir");
        let cmd = StepCommand::new("./not-here", "./not-here", &[]);
        let err = cmd
            .run(&env_for(dir.path()))
            .await
            .expect_err("spawn should fail");
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("Failed to run './not-here'"));
    }

    #[tokio::test]
    async fn availability_probe_ignores_exit_codes() {
        let dir = tempdir().expect("scratch dir");
        let env = env_for(dir.path());
        assert!(is_available("sh", &env).await);
        assert!(!is_available("definitely-not-a-real-command-9z", &env).await);
    }

    #[tokio::test]
    async fn a_hung_command_is_unavailable() {
        let dir = tempdir().expect("scratch dir");
        let stub = write_hang_stub(dir.path());
        let program = stub.to_str().expect("utf-8 stub path");
        let env = env_for(dir.path());
        assert!(!available_within(program, &env, Duration::from_millis(50)).await);
    }
}
