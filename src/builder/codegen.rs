//! Source generation for the runhook dispatcher and the charminfo probe
//!
//! Templates are embedded at compile time and rendered with Tera. Every
//! generated file carries the autogeneration banner.

use std::path::Path;

use tera::{Context, Tera};

use super::hooks::StubVariant;
use crate::charm::AUTOGEN_MESSAGE;
use crate::charm::layout::{self, RUNHOOK_CRATE_DIR};
use crate::error::Result;
use crate::package::{Package, toml_string};

const MANIFEST: &str = "Cargo.toml";
const RUNHOOK_MAIN: &str = "runhook.main.rs";
const CHARMINFO_MAIN: &str = "charminfo.main.rs";
const HOOK_INSTALL: &str = "hook-install.sh";
const HOOK_RECOMPILE: &str = "hook-recompile.sh";
const HOOK_PLAIN: &str = "hook.sh";
const COMPILE_SCRIPT: &str = "compile.sh";

/// Which program to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// Dispatches hooks on the deployed unit
    Runhook,
    /// Prints the charm's registrations as JSON
    Charminfo,
}

impl Program {
    /// Package and binary name
    pub fn name(self) -> &'static str {
        match self {
            Program::Runhook => "runhook",
            Program::Charminfo => "charminfo",
        }
    }

    fn main_template(self) -> &'static str {
        match self {
            Program::Runhook => RUNHOOK_MAIN,
            Program::Charminfo => CHARMINFO_MAIN,
        }
    }
}

/// A generated Cargo package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCrate {
    pub program: Program,
    pub manifest: String,
    pub main: String,
}

/// Embedded templates
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (MANIFEST, include_str!("templates/Cargo.toml.tera")),
            (RUNHOOK_MAIN, include_str!("templates/runhook.main.rs.tera")),
            (CHARMINFO_MAIN, include_str!("templates/charminfo.main.rs.tera")),
            (HOOK_INSTALL, include_str!("templates/hook-install.sh.tera")),
            (HOOK_RECOMPILE, include_str!("templates/hook-recompile.sh.tera")),
            (HOOK_PLAIN, include_str!("templates/hook.sh.tera")),
            (COMPILE_SCRIPT, include_str!("templates/compile.sh.tera")),
        ])?;
        Ok(Self { tera })
    }

    fn render(&self, name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(name, context)?)
    }

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert("autogen_message", AUTOGEN_MESSAGE);
        context
    }

    /// Generate `program` for `package`
    ///
    /// `charm_path` is where the generated manifest finds the charm package;
    /// it may be relative to the generated crate.
    pub fn program(
        &self,
        program: Program,
        package: &Package,
        charm_path: &Path,
    ) -> Result<GeneratedCrate> {
        let hook = &package.hook_dependency;
        let mut context = Self::base_context();
        context.insert("package_name", program.name());
        context.insert("bin_name", program.name());
        context.insert("charm_crate", &package.lib_name);
        context.insert("hook_crate", &hook.crate_name());
        context.insert(
            "charm_dependency",
            &format!(
                "{} = {{ path = {} }}",
                package.name,
                toml_string(&charm_path.to_string_lossy())
            ),
        );
        context.insert(
            "hook_dependency",
            &format!("{} = {}", hook.key(), hook.to_inline_table()),
        );

        Ok(GeneratedCrate {
            program,
            manifest: self.render(MANIFEST, &context)?,
            main: self.render(program.main_template(), &context)?,
        })
    }

    /// Shell stub for one hook
    pub fn hook_stub(&self, variant: StubVariant, hook_name: &str) -> Result<String> {
        let template = match variant {
            StubVariant::Install => HOOK_INSTALL,
            StubVariant::Recompile => HOOK_RECOMPILE,
            StubVariant::Plain => HOOK_PLAIN,
        };
        let mut context = Self::base_context();
        context.insert("hook_name", hook_name);
        context.insert("exe_path", &format!("{}/{}", layout::BIN_DIR, layout::EXE_NAME));
        context.insert("compile_script", layout::COMPILE_SCRIPT);
        context.insert("compile_always", layout::COMPILE_ALWAYS);
        self.render(template, &context)
    }

    /// Script that rebuilds bin/runhook from the vendored sources
    pub fn compile_script(&self) -> Result<String> {
        let mut context = Self::base_context();
        context.insert("crate_dir", RUNHOOK_CRATE_DIR);
        self.render(COMPILE_SCRIPT, &context)
    }
}
