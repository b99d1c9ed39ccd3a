use std::{path::PathBuf, time::Duration};

use crate::extract::ObligationTag;

const DEFAULT_LOG_FILE: &str = "out.txt";
const DEFAULT_SOLVER: &str = "./cvc4.exe";
const DEFAULT_TAG: &str = "Test.smtlib_at()";
const DEFAULT_DRY: bool = false;

#[derive(Debug, Clone)]
pub struct Options {
    /// The verbose output of the verifier, containing the SMT-LIB translations of the proof obligations.
    pub log_file: PathBuf,
    /// The solver executable.
    pub solver: PathBuf,
    /// The tag of the proof obligation to check.
    pub tag: ObligationTag,
    /// The maximum time the solver is allowed to run.
    /// If `None`, the solver runs until it terminates by itself.
    pub timeout: Option<Duration>,
    /// Whether to use a dry-run mode.
    /// In dry-run mode, the translation is extracted but the solver is not invoked.
    pub dry: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            solver: PathBuf::from(DEFAULT_SOLVER),
            tag: ObligationTag::new(DEFAULT_TAG),
            timeout: None,
            dry: DEFAULT_DRY,
        }
    }
}

impl Options {
    pub fn set_timeout_secs(&mut self, secs: u64) {
        self.timeout = Some(Duration::from_secs(secs))
    }
}
