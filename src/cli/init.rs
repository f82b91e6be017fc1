use super::config::OssConfig;
use super::context::{display_tokens, parse_account, Context};
use oss_rewards::deployment::{
    component_account, DeploymentError, DeploymentRecord, REWARDS_COMPONENT, TOKEN_COMPONENT,
};
use oss_rewards::platform::{unix_now, Platform};
use std::time::SystemTime;

/// Create the platform and record the deployment
///
/// Writes a default config file first if none exists. The deployer owns the
/// token, receives the initial supply, and the rewards component is
/// registered as a minter.
pub async fn execute(config: Option<String>, deployer: String) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let ctx = if ctx.config_path.exists() {
        ctx
    } else {
        println!("📝 No config file found. Creating default configuration...");
        OssConfig::create_default(&ctx.config_path)?;
        println!("   Created: {}", ctx.config_path.display());
        Context::load(config.as_deref())?
    };

    let _lock = ctx.store.lock()?;
    let data_dir = ctx.data_dir();
    let network = &ctx.config.network;
    let record_path = DeploymentRecord::path_for(&data_dir, &network.name);
    if record_path.exists() {
        return Err(DeploymentError::AlreadyExists(record_path).into());
    }

    let deployer = parse_account(&deployer);
    let token = component_account(TOKEN_COMPONENT);
    let rewards = component_account(REWARDS_COMPONENT);

    let platform = Platform::genesis(deployer, rewards, &ctx.config.platform_config(), unix_now())?;
    ctx.store.create(&platform)?;

    let record = DeploymentRecord::new(
        &network.name,
        network.chain_id,
        deployer,
        token,
        rewards,
        SystemTime::now(),
    );
    let record_path = record.save(&data_dir)?;

    let ledger = platform.ledger();
    println!("🚀 Deployed {} ({}) on {}", ledger.name(), ledger.symbol(), network.name);
    println!();
    println!("Deployer:     {}", deployer);
    println!("{:<13} {}", format!("{}:", TOKEN_COMPONENT), token);
    println!("{:<13} {}", format!("{}:", REWARDS_COMPONENT), rewards);
    println!("Supply:       {}", display_tokens(&platform, ledger.total_supply()));
    println!("Max supply:   {}", display_tokens(&platform, ledger.max_supply()));
    println!();
    println!("State:        {}", ctx.store.path().display());
    println!("Deployment:   {}", record_path.display());

    Ok(())
}
