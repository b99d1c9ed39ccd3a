use std::io::Write;

use tempfile::NamedTempFile;

use crate::{
    error::Error,
    extract::{extract, TranslationBlock},
    options::Options,
    solver::{SolverInvocation, SolverResult},
};

/// The result of checking a proof obligation.
#[derive(Debug)]
pub enum Outcome {
    /// The translation was extracted but not checked (dry run).
    Extracted(TranslationBlock),
    /// The solver was run on the translation.
    Solved(SolverResult),
}

/// Writes the block to a fresh scratch file.
/// The file is removed when the returned handle is dropped.
pub fn write_scratch(block: &TranslationBlock) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("smtlib_input")
        .suffix(".smt2")
        .tempfile()?;
    file.write_all(block.as_str().as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Extracts the obligation selected by `opts` from the verifier log and runs the solver on it.
pub fn check_obligation(opts: &Options) -> Result<Outcome, Error> {
    let bytes = std::fs::read(&opts.log_file)?;
    let log = String::from_utf8_lossy(&bytes);
    log::debug!(
        "Read {} bytes from {}",
        bytes.len(),
        opts.log_file.display()
    );

    let block = extract(&log, &opts.tag)?;
    if opts.dry {
        return Ok(Outcome::Extracted(block));
    }

    let scratch = write_scratch(&block)?;
    log::debug!("Wrote script to {}", scratch.path().display());
    let result = SolverInvocation::new(&opts.solver, scratch.path())
        .with_timeout(opts.timeout)
        .run()?;
    if let Err(err) = scratch.close() {
        log::warn!("Failed to remove scratch file: {}", err);
    }
    Ok(Outcome::Solved(result))
}
