use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::common::{AiBackend, RunnerError};
use crate::constants::{CLAUDE_EXECUTABLE, PROMPT_FLAG};

/// Runs the `claude` command-line tool once per prompt and returns its stdout.
///
/// The prompt is handed over as its own argv element, so nothing in it is
/// ever interpreted by a shell.
pub struct ClaudeCliBackend {
    program: OsString,
}

impl ClaudeCliBackend {
    pub fn new() -> Self {
        Self::with_program(CLAUDE_EXECUTABLE)
    }

    /// Uses `program` in place of the `claude` executable. Intended for
    /// pointing the backend at a stub in tests.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }
}

impl Default for ClaudeCliBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AiBackend for ClaudeCliBackend {
    fn invoke(&self, prompt: &str) -> Result<String, RunnerError> {
        info!("Invoking {:?} ({} byte prompt)", self.program, prompt.len());
        debug!("Prompt input is: {}", prompt);

        let output = Command::new(&self.program)
            .arg(PROMPT_FLAG)
            .arg(prompt)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => RunnerError::ExecutableNotFound {
                    program: self.program.clone(),
                },
                _ => RunnerError::ProcessLaunch {
                    program: self.program.clone(),
                    source,
                },
            })?;

        // exit status and stderr are not part of the result
        debug!("{:?} exited with {}", self.program, output.status);
        if !output.stderr.is_empty() {
            debug!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::*;

    // A stub that is still open for writing in one thread can be inherited by a
    // child forked from another, which makes exec fail with ETXTBSY.
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    fn write_stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("claude");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn run_stub(body: &str, prompt: &str) -> Result<String, RunnerError> {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let stub = write_stub(dir.path(), body);
        ClaudeCliBackend::with_program(stub).invoke(prompt)
    }

    #[test]
    fn default_program_is_claude() {
        assert_eq!(ClaudeCliBackend::new().program(), "claude");
    }

    #[test]
    fn passes_flag_and_prompt_as_separate_arguments() {
        let out = run_stub(r#"printf '%s|' "$#" "$1" "$2""#, "write a login form").unwrap();
        assert_eq!(out, "2|--prompt|write a login form|");
    }

    #[test]
    fn prompt_is_not_interpreted_by_a_shell() {
        let prompt = r#"$(echo pwned) `id` "quoted" 'single'; rm -rf / && echo *"#;
        let out = run_stub(r#"printf '%s' "$2""#, prompt).unwrap();
        assert_eq!(out, prompt);
    }

    #[test]
    fn non_ascii_prompt_arrives_unchanged() {
        let prompt = "JavaScript'te API çağrısı nasıl yapılır";
        let out = run_stub(r#"printf '%s' "$2""#, prompt).unwrap();
        assert_eq!(out, prompt);
    }

    #[test]
    fn returns_stdout_exactly() {
        let out = run_stub(r#"printf 'line one\nline two\n\n'"#, "p").unwrap();
        assert_eq!(out, "line one\nline two\n\n");
    }

    #[test]
    fn non_zero_exit_still_returns_stdout() {
        let out = run_stub("printf 'partial answer'\nexit 3", "p").unwrap();
        assert_eq!(out, "partial answer");
    }

    #[test]
    fn stderr_only_yields_empty_string() {
        let out = run_stub("echo 'something went wrong' >&2\nexit 1", "p").unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn missing_executable_is_reported() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-claude");
        let err = ClaudeCliBackend::with_program(&missing)
            .invoke("p")
            .unwrap_err();
        match err {
            RunnerError::ExecutableNotFound { program } => {
                assert_eq!(PathBuf::from(program), missing)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_executable_file_is_a_launch_error() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claude");
        std::fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = ClaudeCliBackend::with_program(&path).invoke("p").unwrap_err();
        assert!(matches!(err, RunnerError::ProcessLaunch { .. }), "{err:?}");
    }

    #[test]
    fn sequential_calls_are_logged_in_order() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let stub = write_stub(
            dir.path(),
            &format!(r#"printf '%s\n' "$2" >> '{}'"#, log.display()),
        );
        let backend = ClaudeCliBackend::with_program(stub);

        for prompt in ["first", "second", "third"] {
            backend.invoke(prompt).unwrap();
        }

        let logged = std::fs::read_to_string(&log).unwrap();
        assert_eq!(logged, "first\nsecond\nthird\n");
    }
}
