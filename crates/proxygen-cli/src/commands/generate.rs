//! `proxygen generate`: synthesize proxies and write `<Class>.cs` files.

use std::path::Path;

use anyhow::Context;
use proxygen_engine::{emit, ProxySpec};
use termcolor::ColorChoice;

use super::{default_targets, find_interface, load_catalog, load_profile, load_registries};
use crate::output::StyledOutput;

pub fn execute(
    catalog_path: &Path,
    interfaces: &[String],
    out_dir: &Path,
    config: Option<&Path>,
    stdout: bool,
    color: ColorChoice,
) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(color);
    let catalog = load_catalog(catalog_path)?;
    let profile = load_profile(config)?;
    let registries = load_registries(&catalog, &profile, &mut out)?;

    let targets = if interfaces.is_empty() {
        default_targets(&catalog, &profile, &registries)
    } else {
        interfaces
            .iter()
            .map(|name| find_interface(&catalog, name))
            .collect::<anyhow::Result<Vec<_>>>()?
    };

    if !stdout {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    }

    for model in &targets {
        let unit = ProxySpec::new(*model, &catalog, &registries, &profile)
            .with_all()
            .synthesize(&mut out);
        let source = emit(&unit);

        if stdout {
            out.plain(&source);
            continue;
        }

        let path = out_dir.join(format!("{}.cs", unit.class_name));
        std::fs::write(&path, source)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        out.success("Generated ");
        out.plain(&format!("{} ", unit.class_name));
        out.info(&path.display().to_string());
        out.newline();
    }

    if !stdout {
        out.bold(&format!("{} proxy class(es) written", targets.len()));
        out.newline();
    }
    out.summary();
    out.flush();
    Ok(())
}
