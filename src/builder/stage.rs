//! Named pipeline stages

use std::fmt;

/// A step of the charm build
///
/// `Display` gives the context prefixed to errors raised in the stage;
/// [`BuildStage::description`] is the progress message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    StageSource,
    Synthesize,
    Compile,
    Introspect,
    WriteHooks,
    WriteMetadata,
    WriteConfig,
    Validate,
    Vendor,
    CompileScript,
}

impl BuildStage {
    pub fn description(self) -> &'static str {
        match self {
            BuildStage::StageSource => "Copying charm source",
            BuildStage::Synthesize => "Generating runhook",
            BuildStage::Compile => "Compiling runhook",
            BuildStage::Introspect => "Reading registered hooks",
            BuildStage::WriteHooks => "Writing hooks",
            BuildStage::WriteMetadata => "Writing metadata.yaml",
            BuildStage::WriteConfig => "Writing config.yaml",
            BuildStage::Validate => "Validating charm",
            BuildStage::Vendor => "Vendoring dependencies",
            BuildStage::CompileScript => "Writing compile script",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildStage::StageSource => "cannot copy charm source",
            BuildStage::Synthesize => "cannot generate hooks main package",
            BuildStage::Compile => "cannot build hooks main package",
            BuildStage::Introspect => "cannot get charm info",
            BuildStage::WriteHooks => "cannot write hooks to charm",
            BuildStage::WriteMetadata => "cannot write metadata.yaml",
            BuildStage::WriteConfig => "cannot write config.yaml",
            BuildStage::Validate => "cannot validate charm",
            BuildStage::Vendor => "cannot get dependencies",
            BuildStage::CompileScript => "cannot write compile script",
        })
    }
}
