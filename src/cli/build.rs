use clap::Parser;
use std::path::PathBuf;

use crate::toolchain::TargetPlatform;

/// Arguments for the build command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Build into $JUJU_REPOSITORY/trusty/<package dir>:\n    rscharm build\n\n\
                   Build another package for a different series:\n    rscharm build ./mycharm --series xenial\n\n\
                   Ship sources and compile on the unit:\n    rscharm build --source\n\n\
                   Build into an explicit directory:\n    rscharm build --dest /tmp/charms/mycharm")]
pub struct BuildArgs {
    /// Charm package directory (defaults to current directory)
    pub package: Option<PathBuf>,

    /// Ship the package sources and vendored dependencies instead of a binary
    #[arg(long)]
    pub source: bool,

    /// Charm repository the charm is written into
    #[arg(long, value_name = "DIR", env = "JUJU_REPOSITORY")]
    pub repo: Option<PathBuf>,

    /// Series directory inside the repository
    #[arg(long, value_name = "NAME", env = "RSCHARM_SERIES", default_value = "trusty")]
    pub series: String,

    /// Write the charm here instead of <repo>/<series>/<package dir>
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Target triple runhook is compiled for
    #[arg(
        long,
        value_name = "TRIPLE",
        env = "RSCHARM_TARGET",
        default_value = TargetPlatform::DEFAULT_TRIPLE
    )]
    pub target: String,

    /// Keep the scratch directory and print its path
    #[arg(long)]
    pub keep_temp: bool,
}
