//! The charm build pipeline
//!
//! This module handles:
//! - Generating the runhook dispatcher crate ([`codegen`])
//! - Compiling it for the deployment platform ([`compile`])
//! - Asking the charm what it registers ([`introspect`])
//! - Writing hook stubs and descriptors ([`hooks`], [`descriptors`])
//! - Reading the result back ([`validate`])
//! - Shipping sources for on-unit compilation ([`vendor`])
//!
//! Stages run strictly in order. A failing stage aborts the build and the
//! charm is left as the completed stages wrote it.

pub mod codegen;
pub mod compile;
pub mod descriptors;
pub mod hooks;
pub mod introspect;
pub mod stage;
pub mod validate;
pub mod vendor;

use std::path::PathBuf;

pub use stage::BuildStage;

use codegen::{Program, Templates};
use compile::{CompileRequest, compile};
use crate::charm::{CharmLayout, is_valid_charm_name};
use crate::error::{CharmError, Result, StageContext};
use crate::package::Package;
use crate::toolchain::{EnvOverlay, TargetPlatform, Toolchain};
use crate::ui::BuildReporter;

/// Everything one build needs
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub package: Package,
    /// The charm directory to write
    pub charm_dir: PathBuf,
    /// Scratch space owned by the caller
    pub temp_dir: PathBuf,
    /// Ship sources and compile on the unit instead of shipping a binary
    pub source: bool,
    pub platform: TargetPlatform,
}

/// What a successful build did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    pub charm_dir: PathBuf,
    pub hooks_written: Vec<String>,
    pub hooks_preserved: Vec<String>,
    pub config_written: bool,
    pub source: bool,
}

/// Runs the pipeline for one [`BuildRequest`]
pub struct CharmBuilder<'a> {
    request: &'a BuildRequest,
    toolchain: &'a dyn Toolchain,
    reporter: &'a dyn BuildReporter,
    templates: Templates,
    layout: CharmLayout,
}

impl<'a> CharmBuilder<'a> {
    pub fn new(
        request: &'a BuildRequest,
        toolchain: &'a dyn Toolchain,
        reporter: &'a dyn BuildReporter,
    ) -> Result<Self> {
        Ok(Self {
            request,
            toolchain,
            reporter,
            templates: Templates::new()?,
            layout: CharmLayout::new(&request.charm_dir),
        })
    }

    fn begin(&self, stage: BuildStage) {
        self.reporter.stage(stage);
    }

    /// Build the charm
    pub fn build(&self) -> Result<BuildOutcome> {
        let request = self.request;
        let name = self.layout.charm_name();
        if !is_valid_charm_name(&name) {
            return Err(CharmError::InvalidCharmName { name });
        }

        let charm_path = if request.source {
            self.begin(BuildStage::StageSource);
            vendor::stage_package(&request.package, &self.layout, self.reporter)
                .stage(BuildStage::StageSource)?;
            vendor::staged_package_path()
        } else {
            request.package.dir.clone()
        };

        self.begin(BuildStage::Synthesize);
        let runhook = self
            .templates
            .program(Program::Runhook, &request.package, &charm_path)
            .stage(BuildStage::Synthesize)?;

        self.begin(BuildStage::Compile);
        self.compile_runhook(&runhook).stage(BuildStage::Compile)?;

        self.begin(BuildStage::Introspect);
        let info = introspect::introspect(
            &request.package,
            &request.temp_dir,
            &self.templates,
            self.toolchain,
            self.reporter,
        )
        .stage(BuildStage::Introspect)?;

        self.begin(BuildStage::WriteHooks);
        let hooks = hooks::write_hooks(
            &self.layout,
            &info.hooks,
            request.source,
            &self.templates,
            self.reporter,
        )
        .stage(BuildStage::WriteHooks)?;

        self.begin(BuildStage::WriteMetadata);
        descriptors::write_meta(&self.layout, &request.package.dir, &info, self.reporter)
            .stage(BuildStage::WriteMetadata)?;

        self.begin(BuildStage::WriteConfig);
        let config_written = descriptors::write_config(&self.layout, &info, self.reporter)
            .stage(BuildStage::WriteConfig)?;

        self.begin(BuildStage::Validate);
        validate::validate_charm(self.layout.root(), request.source)
            .stage(BuildStage::Validate)?;

        if request.source {
            self.begin(BuildStage::Vendor);
            vendor::vendor_deps(&self.layout, self.toolchain, self.reporter)
                .stage(BuildStage::Vendor)?;

            self.begin(BuildStage::CompileScript);
            vendor::write_compile_script(&self.layout, &self.templates)
                .stage(BuildStage::CompileScript)?;
        }

        Ok(BuildOutcome {
            charm_dir: request.charm_dir.clone(),
            hooks_written: hooks.written,
            hooks_preserved: hooks.preserved,
            config_written,
            source: request.source,
        })
    }

    /// Write the runhook crate into the charm and build it
    ///
    /// A binary charm gets the cross-compiled `bin/runhook`. In source mode
    /// the unit compiles it, so the crate is only built for the host to
    /// prove that it compiles, and any stale binary is removed so the
    /// install hook recompiles.
    fn compile_runhook(&self, runhook: &codegen::GeneratedCrate) -> Result<()> {
        let request = self.request;
        let target_dir = request.temp_dir.join("target");
        let (exe, env) = if request.source {
            let stale = self.layout.exe();
            if stale.exists() {
                std::fs::remove_file(&stale)
                    .map_err(|e| crate::error::fs::write_failed(&stale, e))?;
            }
            (
                request.temp_dir.join("bin").join(Program::Runhook.name()),
                EnvOverlay::host(),
            )
        } else {
            let platform = &request.platform;
            self.reporter.info(&format!(
                "cross-compiling for {} on {} ({platform})",
                platform.os(),
                platform.arch()
            ));
            (self.layout.exe(), platform.env_overlay())
        };

        compile(
            &CompileRequest {
                generated: runhook,
                crate_dir: &self.layout.runhook_crate(),
                exe: &exe,
                target_dir: &target_dir,
                env: &env,
            },
            self.toolchain,
            self.reporter,
        )
    }
}
