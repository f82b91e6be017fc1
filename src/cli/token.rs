//! Token ledger subcommands.

use super::context::{display_tokens, parse_account, parse_tokens, Context};
use oss_rewards::platform::{Command, Outcome};

pub async fn mint(
    config: Option<String>,
    caller: String,
    to: String,
    amount: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let to = parse_account(&to);
    let (_, platform) = ctx
        .submit(&caller, |p| {
            Ok(Command::Mint {
                to,
                amount: parse_tokens(p, &amount)?,
            })
        })
        .await?;

    println!("   Minted {} to {}", amount, to);
    println!("   Total supply: {}", display_tokens(&platform, platform.total_supply()));
    Ok(())
}

pub async fn burn(
    config: Option<String>,
    caller: String,
    amount: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (_, platform) = ctx
        .submit(&caller, |p| {
            Ok(Command::Burn {
                amount: parse_tokens(p, &amount)?,
            })
        })
        .await?;

    println!("   Burned {}", amount);
    println!("   Total supply: {}", display_tokens(&platform, platform.total_supply()));
    Ok(())
}

pub async fn transfer(
    config: Option<String>,
    caller: String,
    to: String,
    amount: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let to = parse_account(&to);
    ctx.submit(&caller, |p| {
        Ok(Command::Transfer {
            to,
            amount: parse_tokens(p, &amount)?,
        })
    })
    .await?;

    println!("   Transferred {} to {}", amount, to);
    Ok(())
}

pub async fn add_minter(
    config: Option<String>,
    caller: String,
    account: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let account = parse_account(&account);
    let (receipt, _) = ctx
        .submit(&caller, |_| Ok(Command::AddMinter { account }))
        .await?;

    report_change(receipt.outcome, &format!("{} is now a minter", account));
    Ok(())
}

pub async fn remove_minter(
    config: Option<String>,
    caller: String,
    account: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let account = parse_account(&account);
    let (receipt, _) = ctx
        .submit(&caller, |_| Ok(Command::RemoveMinter { account }))
        .await?;

    report_change(receipt.outcome, &format!("{} is no longer a minter", account));
    Ok(())
}

pub async fn pause(config: Option<String>, caller: String) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (receipt, _) = ctx.submit(&caller, |_| Ok(Command::Pause)).await?;

    report_change(receipt.outcome, "Ledger paused");
    Ok(())
}

pub async fn unpause(config: Option<String>, caller: String) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::load(config.as_deref())?;
    let (receipt, _) = ctx.submit(&caller, |_| Ok(Command::Unpause)).await?;

    report_change(receipt.outcome, "Ledger unpaused");
    Ok(())
}

fn report_change(outcome: Outcome, message: &str) {
    match outcome {
        Outcome::Changed(false) => println!("   No change: {}", message.to_lowercase()),
        _ => println!("   {}", message),
    }
}
