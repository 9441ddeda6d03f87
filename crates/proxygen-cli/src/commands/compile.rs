//! `proxygen compile`: synthesize one proxy and compile it.

use std::path::PathBuf;

use anyhow::Context;
use proxygen_engine::{compile, CheckBackend, CommandBackend, CompilerBackend, ProxySpec};
use termcolor::ColorChoice;

use super::{find_interface, load_catalog, load_profile, load_registries};
use crate::output::StyledOutput;

pub struct CompileOptions {
    pub catalog: PathBuf,
    pub interface: String,
    pub references: Vec<String>,
    pub compiler: String,
    pub out: Option<PathBuf>,
    pub check_only: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(options: CompileOptions, color: ColorChoice) -> anyhow::Result<()> {
    let mut out = StyledOutput::new(color);
    let catalog = load_catalog(&options.catalog)?;
    let profile = load_profile(options.config.as_deref())?;
    let registries = load_registries(&catalog, &profile, &mut out)?;
    let model = find_interface(&catalog, &options.interface)?;

    let unit = ProxySpec::new(model, &catalog, &registries, &profile)
        .with_all()
        .synthesize(&mut out);

    let command;
    let backend: &dyn CompilerBackend = if options.check_only {
        &CheckBackend
    } else {
        command = CommandBackend::new(options.compiler.clone());
        &command
    };

    let result = compile(&unit, &options.references, backend, &mut out);
    out.summary();
    let artifact = result.with_context(|| format!("{} did not compile", unit.class_name))?;

    match artifact.image {
        Some(image) => {
            let path = options
                .out
                .unwrap_or_else(|| PathBuf::from(format!("{}.dll", artifact.assembly_name)));
            std::fs::write(&path, image)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            out.success("Compiled ");
            out.plain(&format!("{} ", artifact.assembly_name));
            out.info(&path.display().to_string());
        }
        None => {
            out.success("Checked ");
            out.plain(&artifact.assembly_name);
        }
    }
    out.newline();
    out.flush();
    Ok(())
}
