//! Contribution subcommands: submit, vote, claim.

use super::context::{display_tokens, Context};
use oss_rewards::platform::{Command, Outcome};
use oss_rewards::registry::{Category, ContributionStatus, Submission};

pub async fn submit(
    config: Option<String>,
    caller: String,
    submission: Submission,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (receipt, _) = ctx
        .submit(&caller, |_| Ok(Command::SubmitContribution(submission)))
        .await?;

    if let Outcome::Submitted(id) = receipt.outcome {
        println!("   Contribution #{} submitted, pending review", id);
    }
    Ok(())
}

pub fn parse_category(input: &str) -> Result<Category, String> {
    input.parse::<Category>().map_err(|e| e.to_string())
}

pub async fn vote(
    config: Option<String>,
    caller: String,
    id: u64,
    approve: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (receipt, platform) = ctx
        .submit(&caller, |_| Ok(Command::Vote { id, approve }))
        .await?;

    if let Outcome::Voted(vote) = receipt.outcome {
        println!(
            "   Vote recorded on #{}: {} approve / {} reject",
            id, vote.approval_votes, vote.rejection_votes
        );
        match vote.finalized {
            Some(ContributionStatus::Approved) => println!(
                "   Contribution approved, reward {}",
                display_tokens(&platform, vote.reward_amount)
            ),
            Some(status) => println!("   Contribution {}", status.display_name().to_lowercase()),
            None => println!(
                "   {} of {} votes needed for a decision",
                vote.approval_votes + vote.rejection_votes,
                platform.registry().voting_policy().quorum
            ),
        }
    }
    Ok(())
}

pub async fn claim(
    config: Option<String>,
    caller: String,
    id: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (receipt, platform) = ctx
        .submit(&caller, |_| Ok(Command::ClaimReward { id }))
        .await?;

    if let Outcome::Claimed(amount) = receipt.outcome {
        println!("   Claimed {} for #{}", display_tokens(&platform, amount), id);
    }
    Ok(())
}
