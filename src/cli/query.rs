//! Read-only subcommands.

use super::context::{display_tokens, parse_account, Context};
use oss_rewards::journal::{format_journal, JournalQuery};
use oss_rewards::registry::{Contribution, ContributionStatus};

pub fn balance(config: Option<String>, account: String) -> Result<(), Box<dyn std::error::Error>> {
    let platform = Context::load(config.as_deref())?.platform()?;
    let account = parse_account(&account);
    let stats = platform.registry().contributor_stats(&account);

    println!("Account:    {}", account);
    println!("Balance:    {}", display_tokens(&platform, platform.balance_of(&account)));
    if stats.submitted > 0 {
        println!(
            "Contributions: {} submitted, {} pending, {} approved, {} rejected",
            stats.submitted, stats.pending, stats.approved, stats.rejected
        );
        println!("Earned:     {}", display_tokens(&platform, stats.earned));
        println!("Unclaimed:  {}", display_tokens(&platform, stats.unclaimed));
    }
    Ok(())
}

pub fn supply(config: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let platform = Context::load(config.as_deref())?.platform()?;
    let ledger = platform.ledger();

    println!("{} ({})", ledger.name(), ledger.symbol());
    println!("Total supply: {}", display_tokens(&platform, ledger.total_supply()));
    println!("Max supply:   {}", display_tokens(&platform, ledger.max_supply()));
    println!("Owner:        {}", ledger.owner());
    println!("Paused:       {}", if ledger.is_paused() { "yes" } else { "no" });
    println!("Minters:");
    for minter in ledger.minters() {
        println!("  {}", minter);
    }
    Ok(())
}

pub fn show(config: Option<String>, id: u64) -> Result<(), Box<dyn std::error::Error>> {
    let platform = Context::load(config.as_deref())?.platform()?;
    let c = platform.get_contribution(id)?;

    println!("Contribution #{}: {}", c.id, c.title);
    println!();
    println!("Contributor:  {}", c.contributor);
    println!("Category:     {}", c.category);
    println!("Project:      {}", c.project_url);
    println!("Pull request: {}", c.github_pr);
    println!("Submitted:    {}", format_time(c.submission_time));
    println!("Status:       {}", c.status);
    println!(
        "Votes:        {} approve / {} reject ({} validators)",
        c.approval_votes, c.rejection_votes, c.total_validators
    );
    if c.status == ContributionStatus::Approved {
        println!(
            "Reward:       {}{}",
            display_tokens(&platform, c.reward_amount),
            if c.claimed { " (claimed)" } else { " (unclaimed)" }
        );
    }
    println!();
    println!("{}", c.description);
    Ok(())
}

pub fn list(
    config: Option<String>,
    status: Option<String>,
    contributor: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let platform = Context::load(config.as_deref())?.platform()?;
    let status = status.as_deref().map(parse_status).transpose()?;
    let contributor = contributor.as_deref().map(parse_account);

    let rows: Vec<&Contribution> = platform
        .list_contributions()
        .into_iter()
        .filter(|c| status.map_or(true, |s| c.status == s))
        .filter(|c| contributor.map_or(true, |a| c.contributor == a))
        .collect();

    if rows.is_empty() {
        println!("No contributions found.");
        return Ok(());
    }

    println!("{:<6} {:<9} {:<14} {:<9} {:<24} TITLE", "ID", "STATUS", "CATEGORY", "VOTES", "REWARD");
    for c in rows {
        let reward = if c.status == ContributionStatus::Approved {
            display_tokens(&platform, c.reward_amount)
        } else {
            "-".to_string()
        };
        println!(
            "{:<6} {:<9} {:<14} {:<9} {:<24} {}",
            format!("#{}", c.id),
            c.status,
            c.category,
            format!("{}/{}", c.approval_votes, c.rejection_votes),
            reward,
            c.title
        );
    }
    Ok(())
}

pub fn history(
    config: Option<String>,
    account: Option<String>,
    after: Option<u64>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let platform = Context::load(config.as_deref())?.platform()?;
    let query = JournalQuery {
        actor: account.as_deref().map(parse_account),
        after_sequence: after,
        limit: Some(limit),
        ..Default::default()
    };

    let entries = platform.journal().query(&query);
    println!("{}", format_journal(&entries, platform.ledger().decimals()));
    Ok(())
}

fn parse_status(input: &str) -> Result<ContributionStatus, String> {
    match input.to_ascii_lowercase().as_str() {
        "pending" | "0" => Ok(ContributionStatus::Pending),
        "approved" | "1" => Ok(ContributionStatus::Approved),
        "rejected" | "2" => Ok(ContributionStatus::Rejected),
        other => Err(format!("Unknown status '{}' (pending, approved, rejected)", other)),
    }
}

fn format_time(secs: u64) -> String {
    let at = std::time::UNIX_EPOCH + std::time::Duration::from_secs(secs);
    humantime::format_rfc3339_seconds(at).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Pending").unwrap(), ContributionStatus::Pending);
        assert_eq!(parse_status("1").unwrap(), ContributionStatus::Approved);
        assert_eq!(parse_status("rejected").unwrap(), ContributionStatus::Rejected);
        assert!(parse_status("merged").is_err());
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "1970-01-01T00:00:00Z");
    }
}
