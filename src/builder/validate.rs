//! Reading a freshly built charm back before reporting success

use std::path::Path;

use crate::charm::{CharmDir, CharmLayout};
use crate::error::Result;
use crate::error::fs::read_failed;
use crate::error::invariant::charm_unreadable;

/// Check that the charm in `dir` reads back the way Juju will read it
///
/// Any failure means the build produced a broken charm and is reported as
/// an invariant violation.
pub fn validate_charm(dir: &Path, source: bool) -> Result<CharmDir> {
    check_charm(dir, source).map_err(|e| charm_unreadable(dir, e))
}

/// Read the charm in `dir` and check its executable
///
/// In source mode the executable is compiled on the unit, so the runhook
/// crate must be present instead.
pub fn check_charm(dir: &Path, source: bool) -> Result<CharmDir> {
    let charm = CharmDir::read(dir)?;

    let layout = CharmLayout::new(dir);
    let required = if source {
        layout.runhook_crate().join("Cargo.toml")
    } else {
        layout.exe()
    };
    if !required.is_file() {
        return Err(read_failed(&required, "is missing"));
    }

    Ok(charm)
}
