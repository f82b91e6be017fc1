use super::context::Context;
use oss_rewards::platform::Command;

/// Fields to change; unset fields keep the live policy's value
#[derive(Debug, Default)]
pub struct PolicyChanges {
    pub quorum: Option<u32>,
    pub threshold_bps: Option<u16>,
    pub margin_bonus_bps: Option<u16>,
}

/// Update the live voting and reward policy (owner only)
///
/// Contributions that are already approved keep the reward they were
/// approved with.
pub async fn execute(
    config: Option<String>,
    caller: String,
    changes: PolicyChanges,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (_, platform) = ctx
        .submit(&caller, |p| {
            let mut voting = *p.registry().voting_policy();
            let mut rewards = *p.registry().reward_policy();
            if let Some(quorum) = changes.quorum {
                voting.quorum = quorum;
            }
            if let Some(bps) = changes.threshold_bps {
                voting.approval_threshold_bps = bps;
            }
            if let Some(bps) = changes.margin_bonus_bps {
                rewards.margin_bonus_bps = bps;
            }
            Ok(Command::UpdatePolicy { voting, rewards })
        })
        .await?;

    let registry = platform.registry();
    println!(
        "   Policy: quorum {}, threshold {} bps, margin bonus {} bps",
        registry.voting_policy().quorum,
        registry.voting_policy().approval_threshold_bps,
        registry.reward_policy().margin_bonus_bps
    );
    Ok(())
}
