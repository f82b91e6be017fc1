use super::context::{display_tokens, Context};
use oss_rewards::deployment::{DeploymentError, DeploymentRecord};
use oss_rewards::registry::ContributionStatus;

/// Show deployment and platform health
///
/// Displays:
/// - Deployment record (network, components, deployer)
/// - Token supply and pause state
/// - Contribution counts by status
/// - Invariant check results
pub fn execute(config: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;

    println!("📊 OSS Rewards Status");
    println!();
    println!("Config: {}", ctx.config_path.display());

    match DeploymentRecord::load(&ctx.data_dir(), &ctx.config.network.name) {
        Ok(record) => {
            println!(
                "Network: {} (chain {}), deployed {} by {}",
                record.network, record.chain_id, record.timestamp, record.deployer
            );
            for (name, component) in &record.components {
                println!("  {:<11} {}", name, component.address);
            }
        }
        Err(DeploymentError::NotFound(path)) => {
            println!("❌ No deployment record at {}", path.display());
        }
        Err(e) => return Err(e.into()),
    }
    println!();

    let platform = ctx.platform()?;
    let ledger = platform.ledger();
    let registry = platform.registry();

    println!(
        "Supply: {} of {}{}",
        display_tokens(&platform, ledger.total_supply()),
        display_tokens(&platform, ledger.max_supply()),
        if ledger.is_paused() { " (PAUSED)" } else { "" }
    );
    println!(
        "Contributions: {} pending, {} approved, {} rejected",
        registry.count_by_status(ContributionStatus::Pending),
        registry.count_by_status(ContributionStatus::Approved),
        registry.count_by_status(ContributionStatus::Rejected)
    );
    println!(
        "Policy: quorum {}, threshold {} bps, margin bonus {} bps",
        registry.voting_policy().quorum,
        registry.voting_policy().approval_threshold_bps,
        registry.reward_policy().margin_bonus_bps
    );
    println!("Last sequence: {}", platform.sequence());
    println!();

    let violations = platform.invariant_violations();
    if violations.is_empty() {
        println!("✅ Invariants hold");
        Ok(())
    } else {
        for violation in &violations {
            println!("❌ Invariant violated: {}", violation);
        }
        Err(format!("{} invariant(s) violated", violations.len()).into())
    }
}
