//! Library interface for the seqbind command line

use anyhow::{Context, Result};
use seqbind_codegen::{GoBindConfig, GoBindGen, Generation};
use seqbind_core::Package;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything one invocation needs
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    /// Package model (JSON)
    pub input: PathBuf,
    /// Artifact destination; `None` leaves writing to the caller
    pub output: Option<PathBuf>,
    /// TOML file holding a [`GoBindConfig`]
    pub config: Option<PathBuf>,
    pub namespace: Option<String>,
    pub seq_import: Option<String>,
}

impl BindOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Config file values, then flag overrides
    pub fn resolve_config(&self) -> Result<GoBindConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GoBindConfig::default(),
        };
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        if let Some(seq_import) = &self.seq_import {
            config.seq_import = seq_import.clone();
        }
        debug!("Using config {:?}", config);
        Ok(config)
    }
}

pub fn load_config(path: &Path) -> Result<GoBindConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

/// Load the model, generate, and write the artifact when the run succeeded.
///
/// A failed run writes nothing; the returned [`Generation`] carries the
/// diagnostics for the caller to report.
pub fn run(options: &BindOptions) -> Result<Generation> {
    let config = options.resolve_config()?;
    let package = Package::load(&options.input)
        .with_context(|| format!("Failed to load package model: {:?}", options.input))?;
    info!("Binding package {} ({})", package.name, package.path);

    let generation = GoBindGen::new().with_config(config).bind(&package)?;
    if !generation.is_success() {
        return Ok(generation);
    }

    if let Some(output) = &options.output {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
        fs::write(output, &generation.source)
            .with_context(|| format!("Failed to write output: {:?}", output))?;
        info!("Generated binder written to {:?}", output);
    }
    Ok(generation)
}
