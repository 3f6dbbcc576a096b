//! Hook stub scripts
//!
//! Every registered hook gets a small shell script under `hooks/` that
//! execs `bin/runhook` with the hook's name. Files already present are
//! left alone so hand-edited hooks survive a rebuild.

use super::codegen::Templates;
use crate::charm::CharmLayout;
use crate::common::fs::{ensure_dir, entry_exists, write_executable};
use crate::error::Result;
use crate::ui::BuildReporter;

/// The three kinds of stub script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubVariant {
    /// Bootstraps the toolchain and compiles runhook if it is not there yet
    Install,
    /// Recompiles when the `compile-always` sentinel exists
    Recompile,
    /// Only dispatches
    Plain,
}

impl StubVariant {
    pub fn select(hook_name: &str, source: bool) -> Self {
        match (hook_name, source) {
            ("install", _) => StubVariant::Install,
            (_, true) => StubVariant::Recompile,
            (_, false) => StubVariant::Plain,
        }
    }
}

/// What [`write_hooks`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HooksReport {
    pub written: Vec<String>,
    pub preserved: Vec<String>,
}

/// Write a stub for every hook that has no file yet
pub fn write_hooks(
    layout: &CharmLayout,
    hooks: &[String],
    source: bool,
    templates: &Templates,
    reporter: &dyn BuildReporter,
) -> Result<HooksReport> {
    ensure_dir(&layout.hooks_dir())?;

    let mut report = HooksReport::default();
    for name in hooks {
        let path = layout.hook(name);
        if entry_exists(&path) {
            reporter.info(&format!("keeping existing hook {name}"));
            report.preserved.push(name.clone());
            continue;
        }
        let stub = templates.hook_stub(StubVariant::select(name, source), name)?;
        write_executable(&path, stub)?;
        reporter.info(&format!("created hook {name}"));
        report.written.push(name.clone());
    }
    Ok(report)
}
