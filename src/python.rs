//! Probing the host `python3` interpreter.
//!
//! Both probes are advisory: when a probe cannot produce an answer the
//! caller reports the fact and moves on rather than failing the install.

use std::time::Duration;

use semver::Version;
use tokio::process::Command;
use tokio::time::timeout;

use crate::command::{CommandEnv, STEP_TIME_BUDGET};

/// Expression evaluated to detect a virtual Python environment.
const VIRTUALENV_PROBE: &str = "import sys; print(int(sys.prefix != sys.base_prefix))";

/// Minimum Python version GovReady-Q is supported on.
pub fn min_supported_version() -> Version {
    Version::new(3, 8, 0)
}

/// Version reported by `python3 --version`, if it can be determined.
pub async fn probe_version(env: &CommandEnv) -> Option<Version> {
    let output = run_probe(env, &["--version"], STEP_TIME_BUDGET).await?;
    parse_version_output(&output)
}

/// Whether python3 runs inside a virtual environment, if it can be
/// determined.
pub async fn probe_virtualenv(env: &CommandEnv) -> Option<bool> {
    let output = run_probe(env, &["-c", VIRTUALENV_PROBE], STEP_TIME_BUDGET).await?;
    match output.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// Run python3 with `args` and return its stdout, or `None` if the
/// interpreter is missing, fails to run, exits non-zero, or does not
/// finish within `budget`.
async fn run_probe(env: &CommandEnv, args: &[&str], budget: Duration) -> Option<String> {
    let mut cmd = Command::new("python3");
    cmd.args(args).current_dir(&env.root).kill_on_drop(true);
    for (key, value) in &env.envs {
        cmd.env(key, value);
    }
    let output = timeout(budget, cmd.output()).await.ok()?.ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse `python3 --version` output such as "Python 3.10.12".
fn parse_version_output(output: &str) -> Option<Version> {
    let token = output.split_whitespace().nth(1)?;
    Version::parse(token).ok()
}

#[cfg(test)]
mod tests {
    use super::{min_supported_version, parse_version_output};

    #[test]
    fn parses_the_second_whitespace_token_as_a_version() {
        let version = parse_version_output("Python 3.10.12\n").expect("version should parse");
        assert_eq!((version.major, version.minor, version.patch), (3, 10, 12));
    }

    #[test]
    fn old_interpreters_still_parse() {
        let version = parse_version_output("Python 3.6.9").expect("version should parse");
        assert!(version < min_supported_version());
    }

    #[test]
    fn missing_or_malformed_output_is_undetermined() {
        assert!(parse_version_output("").is_none());
        assert!(parse_version_output("Python").is_none());
        assert!(parse_version_output("Python three.eight").is_none());
    }

    #[cfg(unix)]
    mod unix {
        use std::fs;
        use std::os::unix::fs::PermissionsExt as _;
        use std::time::Duration;

        use tempfile::tempdir;

        use crate::command::CommandEnv;
        use crate::python::run_probe;

        #[tokio::test]
        async fn a_hung_interpreter_is_undetermined() {
            let dir = tempdir().expect("scratch dir");
            let stub = dir.path().join("python3");
            fs::write(&stub, "#!/bin/sh\nwhile :; do :; done\n").expect("write stub");
            let mut perms = fs::metadata(&stub).expect("stub metadata").permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&stub, perms).expect("make stub executable");

            let mut env = CommandEnv::new(dir.path().to_path_buf(), false);
            env.envs
                .push(("PATH".to_string(), dir.path().display().to_string()));
            let output = run_probe(&env, &["--version"], Duration::from_millis(50)).await;
            assert!(output.is_none());
        }
    }
}
