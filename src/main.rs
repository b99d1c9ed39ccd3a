use std::{
    io::Write,
    path::{Path, PathBuf},
    process::exit,
    time::Instant,
};

use clap::Parser as ClapParser;

use smtcheck::{check_obligation, Error, ExtractionError, Options, Outcome, RunError};

/// The command line interface
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
struct Args {
    /// Path to the verbose output of the verifier
    #[arg(long, alias = "verbose_file", default_value = "out.txt")]
    verbose_file: PathBuf,

    /// Path to the solver executable
    #[arg(long, alias = "solver_exe", default_value = "./cvc4.exe")]
    solver_exe: PathBuf,

    /// Tag of the proof obligation to check
    #[arg(long, default_value = "Test.smtlib_at()")]
    tag: String,

    /// Kill the solver if it has not terminated after this many seconds
    #[arg(long, short = 't')]
    timeout: Option<u64>,

    /// Only print the extracted SMT-LIB script, do not run the solver
    #[arg(long)]
    dry: bool,
}

const EXIT_IO: i32 = 1;
const EXIT_INVALID_INPUT: i32 = 3;
const EXIT_TAG_NOT_FOUND: i32 = 4;
const EXIT_MALFORMED_BLOCK: i32 = 5;
const EXIT_MISSING_CHECK_SAT: i32 = 6;
const EXIT_LAUNCH_FAILURE: i32 = 7;
const EXIT_TIMEOUT: i32 = 8;
const EXIT_CAPTURE: i32 = 9;

/// Parses the command line arguments, checks the obligation and prints the output of the solver.
fn main() {
    env_logger::init();
    let ts = Instant::now();
    let cli = Args::parse();
    let opts = convert_options(&cli);

    let res = validate(&opts).and_then(|_| check_obligation(&opts));
    match res {
        Ok(Outcome::Extracted(block)) => print!("{}", block),
        Ok(Outcome::Solved(result)) => {
            if !result.success() {
                log::info!("Solver exited with {}", result.status());
            }
            if let Err(err) = print_output(result.output_bytes()) {
                log::error!("Error: {}", err);
                exit(EXIT_IO);
            }
        }
        Err(Error::InvalidInput(msg)) => {
            println!("{}", msg);
            exit(EXIT_INVALID_INPUT);
        }
        Err(err) => {
            log::error!("Error: {}", err);
            exit(exit_code(&err));
        }
    };

    log::info!("Done ({}ms).", ts.elapsed().as_millis());
}

/// Writes the raw solver output followed by a newline.
fn print_output(output: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output)?;
    stdout.write_all(b"\n")?;
    stdout.flush()
}

fn convert_options(args: &Args) -> Options {
    let mut opts = Options {
        log_file: args.verbose_file.clone(),
        solver: args.solver_exe.clone(),
        tag: args.tag.as_str().into(),
        ..Default::default()
    };
    if let Some(secs) = args.timeout {
        opts.set_timeout_secs(secs);
    }
    if args.dry {
        opts.dry = true;
    }
    opts
}

/// Checks that the input files exist and the solver can be executed.
fn validate(opts: &Options) -> Result<(), Error> {
    if !opts.log_file.exists() {
        return Err(Error::InvalidInput(
            "verbose file could not be found".to_string(),
        ));
    }
    if opts.dry {
        return Ok(());
    }
    if !opts.solver.exists() {
        return Err(Error::InvalidInput(
            "solver executable could not be found".to_string(),
        ));
    }
    if !is_executable(&opts.solver) {
        return Err(Error::InvalidInput(
            "solver executable must be executable".to_string(),
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Io(_) => EXIT_IO,
        Error::InvalidInput(_) => EXIT_INVALID_INPUT,
        Error::Extraction(ExtractionError::TagNotFound(_)) => EXIT_TAG_NOT_FOUND,
        Error::Extraction(ExtractionError::MalformedBlock(_)) => EXIT_MALFORMED_BLOCK,
        Error::Extraction(ExtractionError::MissingCheckSat(_)) => EXIT_MISSING_CHECK_SAT,
        Error::Run(RunError::LaunchFailure { .. }) => EXIT_LAUNCH_FAILURE,
        Error::Run(RunError::Timeout(_)) => EXIT_TIMEOUT,
        Error::Run(RunError::Capture(_)) => EXIT_CAPTURE,
    }
}
