//! Version command implementation

use crate::error::Result;
use crate::toolchain::TargetPlatform;

/// Run version command
pub fn run() -> Result<()> {
    println!("rscharm {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Minimum Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!("  Default target: {}", TargetPlatform::DEFAULT_TRIPLE);

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
