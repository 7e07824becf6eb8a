use std::{ffi::OsString, path::PathBuf};

use clap::{CommandFactory, Parser};

/// Flags that print usage when passed as the only argument.
pub const HELP_FLAGS: [&str; 3] = ["-h", "--help", "/?"];

/// File name of the reference table looked up next to the executable.
pub const DEFAULT_REFERENCE_FILE: &str = "LocalizationRemake.csv";

#[derive(Debug, Parser)]
#[command(
    name = "ru-locfix",
    about = "Update the russian column of a localization CSV from LocalizationRemake.csv",
    long_about = None,
    disable_help_flag = true
)]
pub struct Cli {
    /// Localization CSV to patch in place (a timestamped backup is written first)
    #[arg(value_name = "TARGET_CSV")]
    pub target: PathBuf,
    /// Reference table to read replacements from (defaults to LocalizationRemake.csv next to the executable)
    #[arg(long, value_name = "PATH")]
    pub reference: Option<PathBuf>,
    /// Allow an empty reference value to blank a non-empty russian cell
    #[arg(long = "allow-empty-replacement")]
    pub allow_empty_replacement: bool,
}

#[derive(Debug)]
pub enum Invocation {
    Run(Cli),
    Help,
    Usage,
}

pub fn parse_invocation<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    // a lone argument is always the target path unless it asks for help
    if let [_, only] = args.as_slice() {
        if HELP_FLAGS.iter().any(|help| only.as_os_str() == *help) {
            return Invocation::Help;
        }
        return Invocation::Run(Cli {
            target: PathBuf::from(only),
            reference: None,
            allow_empty_replacement: false,
        });
    }
    match Cli::try_parse_from(&args) {
        Ok(cli) => Invocation::Run(cli),
        Err(_) => Invocation::Usage,
    }
}

pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
