pub mod backup;
pub mod cli;
pub mod columns;
pub mod error;
pub mod io_utils;
pub mod patch;
pub mod reference;

use std::{env, ffi::OsString, path::PathBuf, process::ExitCode, sync::OnceLock};

use anyhow::{Context, Result};
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Invocation, parse_invocation},
    patch::{PatchConfig, PatchSummary},
};

static LOGGER: OnceLock<()> = OnceLock::new();

const USAGE_EXIT: u8 = 2;

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("ru_locfix", LevelFilter::Warn);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<ExitCode> {
    run_from(env::args_os())
}

pub fn run_from<I, T>(args: I) -> Result<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    init_logging();
    let cli = match parse_invocation(args) {
        Invocation::Run(cli) => cli,
        Invocation::Help => {
            print!("{}", cli::usage());
            return Ok(ExitCode::SUCCESS);
        }
        Invocation::Usage => {
            print!("{}", cli::usage());
            return Ok(ExitCode::from(USAGE_EXIT));
        }
    };

    let reference = match cli.reference {
        Some(path) => path,
        None => default_reference_path()?,
    };
    let config = PatchConfig {
        target: cli.target,
        reference,
        allow_empty_replacement: cli.allow_empty_replacement,
    };
    info!(
        "Patching {:?} from {:?} (allow empty replacement: {})",
        config.target, config.reference, config.allow_empty_replacement
    );

    let summary = patch::patch_target(&config)?;
    print_report(&summary);
    Ok(ExitCode::SUCCESS)
}

/// `LocalizationRemake.csv` in the directory holding the running executable.
pub fn default_reference_path() -> Result<PathBuf> {
    let exe = env::current_exe().context("Locating the running executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    debug!("Resolved executable path {:?}", exe);
    let dir = exe
        .parent()
        .map(|parent| parent.to_path_buf())
        .unwrap_or_default();
    Ok(dir.join(cli::DEFAULT_REFERENCE_FILE))
}

fn print_report(summary: &PatchSummary) {
    println!("Done.");
    println!("Backup created: {}", summary.backup_path.display());
    println!("Russian rows updated: {}", summary.changed_rows);
    println!("Keys missing in remake: {}", summary.missing_keys);
}
