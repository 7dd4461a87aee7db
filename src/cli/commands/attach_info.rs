//! `attach-info` command: serve client requests for one NUMA node.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;
use std::path::Path;

use crate::cli::commands::load_config;
use crate::cli::output::{or_dash, output, table_with_header, CommandOutput};
use crate::domain::models::{AttachInfoResponse, NumaNode};
use crate::infrastructure::setup::build_components;

#[derive(Args, Debug)]
pub struct AttachInfoArgs {
    /// NUMA node the client is bound to
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub numa: NumaNode,

    /// Number of consecutive requests to serve
    #[arg(long, default_value = "1")]
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ServedRequest {
    pub request: usize,
    pub numa_node: NumaNode,
    pub response: AttachInfoResponse,
}

#[derive(Debug, Serialize)]
pub struct AttachInfoOutput {
    pub system: String,
    pub caching: bool,
    pub requests: Vec<ServedRequest>,
}

impl CommandOutput for AttachInfoOutput {
    fn to_human(&self) -> String {
        let mut table = table_with_header(&[
            "Request", "NUMA", "Interface", "Domain", "Provider", "Class", "Ranks",
        ]);

        for served in &self.requests {
            let resp = &served.response;
            table.add_row(vec![
                Cell::new(served.request),
                Cell::new(served.numa_node),
                Cell::new(or_dash(&resp.interface)),
                Cell::new(or_dash(&resp.domain)),
                Cell::new(or_dash(&resp.provider)),
                Cell::new(resp.net_dev_class),
                Cell::new(resp.rank_uris.len()),
            ]);
        }

        format!(
            "System: {} (caching {})\n{table}",
            self.system,
            if self.caching { "enabled" } else { "disabled" }
        )
    }
}

pub async fn execute(
    args: AttachInfoArgs,
    config_path: Option<&Path>,
    json_mode: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let components = build_components(&config)?;
    let service = &components.service;

    let mut requests = Vec::with_capacity(args.count);
    for request in 1..=args.count {
        let response = service
            .get_attach_info(args.numa)
            .await
            .with_context(|| format!("attach info request {request} failed"))?;
        requests.push(ServedRequest {
            request,
            numa_node: args.numa,
            response,
        });
    }

    output(
        &AttachInfoOutput {
            system: service.system_name().to_string(),
            caching: service.caching_enabled(),
            requests,
        },
        json_mode,
    );
    Ok(())
}
