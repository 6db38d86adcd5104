use anyhow::Context;

use saas_api::{Config, bootstrap};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    saas_observability::init(config.log_format);

    let table = bootstrap::load_policies().context("role policy table failed validation")?;

    if let Some(role) = config.policy_dump_role {
        let summary = bootstrap::policy_summary(&table, role);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    tracing::info!("authorization policies ready");
    Ok(())
}
