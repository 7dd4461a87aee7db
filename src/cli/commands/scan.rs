//! `scan` command: populate the fabric cache and show the NUMA table.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use std::path::Path;

use crate::adapters::fabric::SnapshotFabricScanner;
use crate::cli::commands::load_config;
use crate::cli::output::{or_dash, output, table_with_header, CommandOutput};
use crate::domain::ports::FabricScanner;
use crate::infrastructure::setup::build_fabric_cache;
use crate::services::{FabricDeviceSelector, FabricSnapshot};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Provider to scan for
    #[arg(short, long)]
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct ScanOutput {
    pub provider: String,
    #[serde(flatten)]
    pub snapshot: FabricSnapshot,
}

impl CommandOutput for ScanOutput {
    fn to_human(&self) -> String {
        let mut table = table_with_header(&["NUMA", "Index", "Device", "Alias", "Class"]);

        for (numa_node, interfaces) in &self.snapshot.interfaces {
            for (index, fabric_if) in interfaces.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(numa_node),
                    Cell::new(index),
                    Cell::new(&fabric_if.name),
                    Cell::new(or_dash(&fabric_if.alias)),
                    Cell::new(fabric_if.net_dev_class),
                ]);
            }
        }

        format!(
            "Provider: {}\nDefault NUMA node: {}\n{table}",
            self.provider, self.snapshot.default_numa_node
        )
    }
}

pub async fn execute(args: ScanArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let fabric_cache = build_fabric_cache(&config);
    let scan_file = config
        .fabric
        .scan_file
        .as_ref()
        .context("fabric.scan_file must be set")?;

    let scan = SnapshotFabricScanner::new(scan_file)
        .scan(&args.provider)
        .await
        .context("fabric scan failed")?;
    fabric_cache.populate(scan).await?;
    let snapshot = fabric_cache.snapshot().await?;

    output(
        &ScanOutput {
            provider: args.provider,
            snapshot,
        },
        json_mode,
    );
    Ok(())
}
