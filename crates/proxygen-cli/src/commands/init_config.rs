//! `proxygen init-config`: write the default host profile.

use std::path::Path;

use anyhow::Context;
use proxygen_engine::HostProfile;
use termcolor::ColorChoice;

use crate::output::StyledOutput;

pub fn execute(path: &Path, force: bool, color: ColorChoice) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    HostProfile::default()
        .to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let mut out = StyledOutput::new(color);
    out.success("Created ");
    out.plain(&path.display().to_string());
    out.newline();
    out.flush();
    Ok(())
}
