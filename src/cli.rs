use anyhow::Context;
use jobwire::{
    config::Config,
    from_wire_document,
    jobwire_types::jobs::Job,
    normalization::normalize_job,
    semantic_equals, to_wire_document,
    wire::{Conversion, WireDocument},
};
use similar::TextDiff;
use std::{fs, path::Path};
use tracing::debug;

/// Format of the job config file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobFormat {
    Toml,
    Json,
}

impl JobFormat {
    /// Files with the `.json` extension hold JSON, everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

pub fn read_job(path: &Path) -> anyhow::Result<Job> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read job file `{}`.", path.display()))?;
    parse_job(&contents, JobFormat::from_path(path))
        .with_context(|| format!("Failed to parse job file `{}`.", path.display()))
}

pub fn read_wire_document(path: &Path) -> anyhow::Result<WireDocument> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read wire document `{}`.", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse wire document `{}`.", path.display()))
}

pub fn parse_job(contents: &str, format: JobFormat) -> anyhow::Result<Job> {
    Ok(match format {
        JobFormat::Toml => toml::from_str(contents)?,
        JobFormat::Json => serde_json::from_str(contents)?,
    })
}

/// Converts the job to the serialized wire document.
pub fn to_wire(job: &Job, config: &Config) -> anyhow::Result<Conversion<String>> {
    let conversion = to_wire_document(job, &config.converter)?;
    let wire = if config.pretty {
        serde_json::to_string_pretty(&conversion.value)?
    } else {
        serde_json::to_string(&conversion.value)?
    };

    Ok(Conversion {
        value: wire,
        diagnostics: conversion.diagnostics,
    })
}

/// Converts the wire document to the job config serialized as TOML.
pub fn from_wire(document: &WireDocument, config: &Config) -> anyhow::Result<Conversion<String>> {
    let conversion = from_wire_document(document, &config.converter)?;
    Ok(Conversion {
        value: toml::to_string_pretty(&conversion.value)?,
        diagnostics: conversion.diagnostics,
    })
}

/// Compares the desired job with the job read from the wire document. Returns the unified diff
/// of the normalized jobs if they drifted apart.
pub fn diff(
    job: &Job,
    document: &WireDocument,
    config: &Config,
) -> anyhow::Result<Conversion<Option<String>>> {
    let Conversion {
        value: remote_job,
        diagnostics,
    } = from_wire_document(document, &config.converter)?;

    if semantic_equals(job, &remote_job) {
        debug!(job = %job.name, "Job hasn't drifted.");
        return Ok(Conversion {
            value: None,
            diagnostics,
        });
    }

    let desired = toml::to_string_pretty(&normalize_job(job))?;
    let remote = toml::to_string_pretty(&normalize_job(&remote_job))?;
    let diff = TextDiff::from_lines(&desired, &remote)
        .unified_diff()
        .header("desired", "remote")
        .to_string();

    Ok(Conversion {
        value: Some(diff),
        diagnostics,
    })
}
