//! `proxygen registries`: list discovered registry descriptors.

use std::path::Path;

use anyhow::Context;
use proxygen_engine::RegistryDescriptor;
use termcolor::ColorChoice;

use super::{load_catalog, load_profile, load_registries};
use crate::output::StyledOutput;

pub fn execute(
    catalog_path: &Path,
    config: Option<&Path>,
    json: bool,
    color: ColorChoice,
) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(color);
    let catalog = load_catalog(catalog_path)?;
    let profile = load_profile(config)?;
    let registries = load_registries(&catalog, &profile, &mut out)?;

    if json {
        let descriptors: Vec<&RegistryDescriptor> = registries.iter().collect();
        let text = serde_json::to_string_pretty(&descriptors)
            .context("Failed to serialize registry descriptors")?;
        out.plain(&text);
        out.newline();
    } else if registries.is_empty() {
        out.plain("No registries discovered.");
        out.newline();
    } else {
        for descriptor in registries.iter() {
            out.bold(&descriptor.name);
            out.plain(&format!(
                "  {} -> {} (key {})",
                descriptor.registry_type, descriptor.member_type, descriptor.key_type
            ));
            out.newline();
            out.info(&format!("    {}", profile.registry_path_for(&descriptor.name)));
            out.newline();
        }
    }

    out.summary();
    out.flush();
    Ok(())
}
