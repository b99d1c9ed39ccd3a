//! Invocation of an external SMT solver on an SMT-LIB script file.
//!
//! The solver is called with a fixed protocol: `--lang=smt2.6 --incremental <script>`.
//! Its standard output and standard error are captured as a single stream and returned verbatim.
//! The exit status of the solver is reported but never interpreted, since solvers disagree on
//! whether `unsat` or `unknown` is a non-zero exit.

use std::{
    borrow::Cow,
    ffi::OsStr,
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    time::{Duration, Instant},
};

use wait_timeout::ChildExt;

use crate::error::RunError;

/// Selects SMT-LIB 2.6 as the input language.
pub const LANG_FLAG: &str = "--lang=smt2.6";
/// Enables incremental solving.
pub const INCREMENTAL_FLAG: &str = "--incremental";

/// The parameters of a single solver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverInvocation {
    executable: PathBuf,
    script: PathBuf,
    /// The maximum time to wait for the solver to terminate.
    /// If `None`, the caller is blocked until the solver terminates by itself.
    timeout: Option<Duration>,
}

impl SolverInvocation {
    pub fn new(executable: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            script: script.into(),
            timeout: None,
        }
    }

    /// Bounds the time the solver may run before it is killed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The command line arguments passed to the solver, in order.
    pub fn args(&self) -> [&OsStr; 3] {
        [
            OsStr::new(LANG_FLAG),
            OsStr::new(INCREMENTAL_FLAG),
            self.script.as_os_str(),
        ]
    }

    /// Runs the solver and waits for it to terminate.
    ///
    /// Both output streams of the solver are redirected into the same anonymous file, so the
    /// captured text is interleaved in the order in which the solver wrote it.
    /// A solver that terminates with a non-zero exit status is not an error.
    pub fn run(&self) -> Result<SolverResult, RunError> {
        let mut capture = tempfile::tempfile().map_err(RunError::Capture)?;
        let stdout = capture.try_clone().map_err(RunError::Capture)?;
        let stderr = capture.try_clone().map_err(RunError::Capture)?;

        log::info!(
            "Running {} {}",
            self.executable.display(),
            self.args()
                .iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        let t = Instant::now();
        let mut child = Command::new(&self.executable)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|source| RunError::LaunchFailure {
                executable: self.executable.clone(),
                source,
            })?;

        let status = match self.timeout {
            None => child.wait().map_err(RunError::Capture)?,
            Some(timeout) => match child.wait_timeout(timeout).map_err(RunError::Capture)? {
                Some(status) => status,
                None => {
                    log::warn!("Solver exceeded {:?}, killing it", timeout);
                    if let Err(err) = child.kill() {
                        // Waiting for a child that could not be killed may block forever
                        log::warn!("Failed to kill solver: {}", err);
                        return Err(RunError::Capture(err));
                    }
                    child.wait().map_err(RunError::Capture)?;
                    return Err(RunError::Timeout(timeout));
                }
            },
        };
        log::info!("Solver terminated with {} ({:?})", status, t.elapsed());

        let output = read_capture(&mut capture).map_err(RunError::Capture)?;
        Ok(SolverResult { output, status })
    }
}

fn read_capture(capture: &mut File) -> std::io::Result<Vec<u8>> {
    // The handle shares its offset with the ones given to the solver
    capture.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    capture.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Runs `solver` on the script at `script`, without a time bound.
pub fn run(script: &Path, solver: &Path) -> Result<SolverResult, RunError> {
    SolverInvocation::new(solver, script).run()
}

/// The combined output and the termination status of a solver run.
#[derive(Debug, Clone)]
pub struct SolverResult {
    output: Vec<u8>,
    status: ExitStatus,
}

impl SolverResult {
    /// The interleaved standard output and standard error of the solver, exactly as written.
    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    /// The output of the solver as text.
    /// Invalid UTF-8 sequences are replaced, use [`output_bytes`](Self::output_bytes) for the raw output.
    pub fn output(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    pub fn into_output(self) -> Vec<u8> {
        self.output
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Whether the solver exited with status zero.
    /// This says nothing about the verdict.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}
