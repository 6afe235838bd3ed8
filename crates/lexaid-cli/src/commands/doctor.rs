use std::io::Write;

use anyhow::Result;
use lexaid_core::config::API_KEY_VAR;
use serde_json::json;

use super::{write_json, Ctx};

/// Report the effective configuration. Returns false when the upstream
/// credential is missing from this environment.
pub async fn doctor(ctx: &Ctx, out: &mut dyn Write) -> Result<bool> {
    let config = &ctx.config;
    let gateway = match ctx.client()?.health().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("unreachable: {e:#}"),
    };
    let has_key = config.has_credential();

    if ctx.json {
        write_json(
            out,
            &json!({
                "credential": has_key,
                "upstream": config.upstream_url(),
                "gateway": config.gateway_url,
                "gatewayHealth": gateway,
                "model": config.model,
                "dataDir": config.data_dir,
            }),
        )?;
    } else {
        let key = if has_key { "configured" } else { "MISSING" };
        writeln!(out, "{API_KEY_VAR}: {key}")?;
        writeln!(out, "upstream:  {}", config.upstream_url())?;
        writeln!(out, "gateway:   {} ({gateway})", config.gateway_url)?;
        writeln!(out, "model:     {}", config.model)?;
        writeln!(out, "data dir:  {}", config.data_dir)?;
    }

    if !has_key {
        eprintln!("{API_KEY_VAR} is not set; add it to the environment or .env");
    }
    Ok(has_key)
}
