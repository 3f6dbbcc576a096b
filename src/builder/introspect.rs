//! Asking the compiled charm what it registers
//!
//! The charm's `register_hooks` is the only authority on its hooks,
//! relations and config, so a small probe program is built for the host,
//! run, and its JSON report parsed.

use std::path::Path;

use super::codegen::{Program, Templates};
use super::compile::{CompileRequest, compile};
use crate::charm::CharmInfo;
use crate::error::Result;
use crate::package::Package;
use crate::toolchain::{EnvOverlay, Toolchain};
use crate::ui::BuildReporter;

/// Build and run the charminfo probe in `scratch`
pub fn introspect(
    package: &Package,
    scratch: &Path,
    templates: &Templates,
    toolchain: &dyn Toolchain,
    reporter: &dyn BuildReporter,
) -> Result<CharmInfo> {
    let generated = templates.program(Program::Charminfo, package, &package.dir)?;
    let crate_dir = scratch.join(Program::Charminfo.name());
    let exe = scratch.join("bin").join(Program::Charminfo.name());
    compile(
        &CompileRequest {
            generated: &generated,
            crate_dir: &crate_dir,
            exe: &exe,
            target_dir: &scratch.join("target"),
            env: &EnvOverlay::host(),
        },
        toolchain,
        reporter,
    )?;

    let output = toolchain.run(&exe, reporter)?;
    let info = CharmInfo::from_probe_output(&output)?;
    reporter.info(&format!(
        "charm registers {} hooks, {} relations, {} config options",
        info.hooks.len(),
        info.relations.len(),
        info.config.len()
    ));
    Ok(info)
}
