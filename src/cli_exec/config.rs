use serde::Serialize;

use exprec_console::model::ConsoleConfig;

use super::*;

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    #[serde(flatten)]
    stored: &'a ConsoleConfig,
    effective_base_url: &'a str,
    state_dir: String,
}

pub(super) fn handle_config_command(session: &Session, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            if json {
                let out = EffectiveConfig {
                    stored: &session.config,
                    effective_base_url: &session.base_url,
                    state_dir: session.store.root().display().to_string(),
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).context("serialize config json")?
                );
            } else {
                println!("url: {}", session.base_url);
                println!("state_dir: {}", session.store.root().display());
                println!(
                    "table_state_retention_days: {}",
                    session.config.table_state_retention_days
                );
                println!("page_size: {}", session.config.page_size);
            }
        }
        ConfigCommands::Set {
            backend_url,
            retention_days,
            page_size,
        } => {
            let mut cfg = session.config.clone();
            if let Some(url) = backend_url {
                cfg.base_url = Some(url.trim_end_matches('/').to_string());
            }
            if let Some(days) = retention_days {
                cfg.table_state_retention_days = days;
            }
            if let Some(size) = page_size {
                if size == 0 {
                    anyhow::bail!("page size must be at least 1");
                }
                cfg.page_size = size;
            }
            session.store.write_config(&cfg)?;
            println!("Configuration saved");
        }
    }
    Ok(())
}
