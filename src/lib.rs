//! Checks a single proof obligation of a verifier with an external SMT solver.
//!
//! The SMT-LIB translation of the obligation is extracted from the verbose log of the verifier
//! (see [`extract`]) and handed to the solver as a script file (see [`SolverInvocation`]).
//! The output of the solver is returned as-is.

mod error;
mod extract;
mod options;
mod pipeline;
mod solver;

pub use error::{Error, ExtractionError, RunError};
pub use extract::{extract, ObligationTag, TranslationBlock, CHECK_SAT, HEADER_PREFIX};
pub use options::Options;
pub use pipeline::{check_obligation, write_scratch, Outcome};
pub use solver::{run, SolverInvocation, SolverResult, INCREMENTAL_FLAG, LANG_FLAG};
