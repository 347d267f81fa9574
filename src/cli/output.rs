//! Output rendering for CLI results

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use vmcloud::model::{
    AccessToken, CloudProviderInfo, DeploymentInfo, DeploymentSummary, RegionInfo, TierInfo,
};

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// A value that can be shown as one table row
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl TableRow for CloudProviderInfo {
    fn headers() -> &'static [&'static str] {
        &["ID", "URL"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.url.clone()]
    }
}

impl TableRow for RegionInfo {
    fn headers() -> &'static [&'static str] {
        &["PROVIDER", "NAME"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.cloud_provider.to_string(), self.name.clone()]
    }
}

impl TableRow for TierInfo {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "TYPE", "PROVIDER", "COST/H", "INGESTION", "ACTIVE SERIES"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.deployment_type.to_string(),
            self.cloud_provider.to_string(),
            format!("{:.4}", self.compute_cost_per_hour),
            self.ingestion_rate.to_string(),
            self.active_time_series.to_string(),
        ]
    }
}

impl TableRow for DeploymentSummary {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "TYPE", "TIER", "REGION", "STATUS", "CREATED"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.deployment_type.to_string(),
            self.tier.to_string(),
            self.region.clone(),
            self.status.to_string(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl TableRow for DeploymentInfo {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "TYPE", "TIER", "STATUS", "STORAGE", "RETENTION", "ENDPOINT"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.deployment_type.to_string(),
            self.tier.to_string(),
            self.status.to_string(),
            format!("{} GB", self.storage_size_gb),
            format!("{}{}", self.retention_value, self.retention_unit),
            self.access_endpoint.clone(),
        ]
    }
}

impl TableRow for AccessToken {
    fn headers() -> &'static [&'static str] {
        &["ID", "DESCRIPTION", "TYPE", "SECRET", "TENANT", "CREATED BY", "LAST USED"]
    }

    fn cells(&self) -> Vec<String> {
        let tenant = if self.tenant_id.is_empty() {
            "-".to_string()
        } else {
            self.tenant_id.clone()
        };
        let last_used = self
            .last_used_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        vec![
            self.id.clone(),
            self.description.clone(),
            self.mode.to_string(),
            self.secret.clone(),
            tenant,
            self.created_by.clone(),
            last_used,
        ]
    }
}

/// Rule file names
impl TableRow for String {
    fn headers() -> &'static [&'static str] {
        &["NAME"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

/// Render a list of items in the chosen format
pub fn render_list<T: Serialize + TableRow>(items: &[T], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(
            T::headers(),
            &items.iter().map(TableRow::cells).collect::<Vec<_>>(),
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(items)?),
    }
}

/// Render a single item in the chosen format
pub fn render_one<T: Serialize + TableRow>(item: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(T::headers(), &[item.cells()])),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(item)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(item)?),
    }
}

/// Left-aligned columns separated by two spaces
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(headers.to_vec())];
    for row in rows {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}
