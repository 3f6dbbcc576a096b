//! Validate command implementation
//!
//! Reads a charm directory back the way the Juju agent would and prints
//! what it declares.

use console::Style;

use crate::builder::validate::check_charm;
use crate::charm::CharmDir;
use crate::cli::ValidateArgs;
use crate::error::Result;

/// Run validate command
pub fn run(args: ValidateArgs) -> Result<()> {
    let charm = check_charm(&args.dir, args.source)?;
    print!("{}", describe(&charm));
    Ok(())
}

fn describe(charm: &CharmDir) -> String {
    let header = Style::new().green().bold();
    let meta = &charm.meta;
    let mut out = format!("{} {}\n", header.apply_to("Charm:"), meta.name);
    out.push_str(&format!("  Summary: {}\n", meta.summary));

    out.push_str(&format!("  Hooks ({}):", charm.hooks.len()));
    if charm.hooks.is_empty() {
        out.push_str(" none");
    } else {
        out.push(' ');
        out.push_str(&charm.hooks.join(", "));
    }
    out.push('\n');

    for (label, relations) in [
        ("Provides", &meta.provides),
        ("Requires", &meta.requires),
        ("Peers", &meta.peers),
    ] {
        if relations.is_empty() {
            continue;
        }
        let listed: Vec<String> = relations
            .iter()
            .map(|(name, spec)| format!("{name} ({})", spec.interface))
            .collect();
        out.push_str(&format!("  {label}: {}\n", listed.join(", ")));
    }

    let options = charm.config.as_ref().map_or(0, |c| c.options.len());
    out.push_str(&format!("  Config options: {options}\n"));
    out
}
