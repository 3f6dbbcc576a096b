use clap::Parser;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Check a charm built with rscharm build:\n    rscharm validate $JUJU_REPOSITORY/trusty/mycharm\n\n\
                   Check a charm built with --source:\n    rscharm validate ./mycharm --source")]
pub struct ValidateArgs {
    /// Charm directory to check
    pub dir: PathBuf,

    /// Expect the runhook sources instead of a compiled runhook
    #[arg(long)]
    pub source: bool,
}
