use clap::{Args, Parser, Subcommand};
use oss_rewards::registry::{Category, Submission};

pub mod config;
pub mod context;
pub mod contribution;
pub mod init;
pub mod policy;
pub mod query;
pub mod status;
pub mod token;
pub mod version;

#[derive(Parser)]
#[command(name = "oss-rewards")]
#[command(author = "OSS Rewards Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the open-source contribution rewards ledger", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.local/share/oss-rewards/config.toml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Identity issuing a state-changing command (hex account or name)
#[derive(Args, Debug, Clone)]
pub struct Caller {
    #[arg(long = "as", value_name = "IDENTITY")]
    pub identity: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the platform, credit the initial supply and write the deployment record
    Init {
        #[command(flatten)]
        caller: Caller,
    },

    /// Mint tokens (minters only)
    Mint {
        #[command(flatten)]
        caller: Caller,

        /// Recipient account
        to: String,

        /// Amount in tokens (e.g. 1000 or 0.5)
        amount: String,
    },

    /// Burn tokens from the caller's balance
    Burn {
        #[command(flatten)]
        caller: Caller,

        amount: String,
    },

    /// Transfer tokens
    Transfer {
        #[command(flatten)]
        caller: Caller,

        to: String,

        amount: String,
    },

    /// Grant minting rights (owner only)
    AddMinter {
        #[command(flatten)]
        caller: Caller,

        account: String,
    },

    /// Revoke minting rights (owner only)
    RemoveMinter {
        #[command(flatten)]
        caller: Caller,

        account: String,
    },

    /// Halt mint, burn and transfer (owner only)
    Pause {
        #[command(flatten)]
        caller: Caller,
    },

    /// Resume mint, burn and transfer (owner only)
    Unpause {
        #[command(flatten)]
        caller: Caller,
    },

    /// Submit a contribution for review
    Submit {
        #[command(flatten)]
        caller: Caller,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: String,

        /// Project repository URL
        #[arg(long)]
        project_url: String,

        /// Pull request URL
        #[arg(long)]
        github_pr: String,

        /// bug-fix, feature, security, documentation, performance, research (or 0-5)
        #[arg(long, value_parser = contribution::parse_category)]
        category: Category,
    },

    /// Vote on a pending contribution
    Vote {
        #[command(flatten)]
        caller: Caller,

        id: u64,

        /// Vote to reject (default is approve)
        #[arg(long)]
        reject: bool,
    },

    /// Claim the reward of an approved contribution
    Claim {
        #[command(flatten)]
        caller: Caller,

        id: u64,
    },

    /// Change the voting and reward policy for future decisions (owner only)
    UpdatePolicy {
        #[command(flatten)]
        caller: Caller,

        #[arg(long)]
        quorum: Option<u32>,

        #[arg(long)]
        threshold_bps: Option<u16>,

        #[arg(long)]
        margin_bonus_bps: Option<u16>,
    },

    /// Show an account's balance and contribution totals
    Balance { account: String },

    /// Show supply, owner, minters and pause state
    Supply,

    /// Show one contribution
    Show { id: u64 },

    /// List contributions, newest first
    List {
        /// pending, approved or rejected
        #[arg(long)]
        status: Option<String>,

        /// Only contributions by this account
        #[arg(long)]
        by: Option<String>,
    },

    /// Show the event journal, newest first
    History {
        /// Only commands issued by this account
        #[arg(long)]
        account: Option<String>,

        /// Only entries after this sequence number
        #[arg(long)]
        after: Option<u64>,

        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Show deployment and platform health
    Status,

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.config;
    match cli.command {
        Commands::Init { caller } => init::execute(config, caller.identity).await,
        Commands::Mint { caller, to, amount } => {
            token::mint(config, caller.identity, to, amount).await
        }
        Commands::Burn { caller, amount } => token::burn(config, caller.identity, amount).await,
        Commands::Transfer { caller, to, amount } => {
            token::transfer(config, caller.identity, to, amount).await
        }
        Commands::AddMinter { caller, account } => {
            token::add_minter(config, caller.identity, account).await
        }
        Commands::RemoveMinter { caller, account } => {
            token::remove_minter(config, caller.identity, account).await
        }
        Commands::Pause { caller } => token::pause(config, caller.identity).await,
        Commands::Unpause { caller } => token::unpause(config, caller.identity).await,
        Commands::Submit {
            caller,
            title,
            description,
            project_url,
            github_pr,
            category,
        } => {
            let submission = Submission {
                title,
                description,
                project_url,
                github_pr,
                category,
            };
            contribution::submit(config, caller.identity, submission).await
        }
        Commands::Vote { caller, id, reject } => {
            contribution::vote(config, caller.identity, id, !reject).await
        }
        Commands::Claim { caller, id } => contribution::claim(config, caller.identity, id).await,
        Commands::UpdatePolicy {
            caller,
            quorum,
            threshold_bps,
            margin_bonus_bps,
        } => {
            let changes = policy::PolicyChanges {
                quorum,
                threshold_bps,
                margin_bonus_bps,
            };
            policy::execute(config, caller.identity, changes).await
        }
        Commands::Balance { account } => query::balance(config, account),
        Commands::Supply => query::supply(config),
        Commands::Show { id } => query::show(config, id),
        Commands::List { status, by } => query::list(config, status, by),
        Commands::History {
            account,
            after,
            limit,
        } => query::history(config, account, after, limit),
        Commands::Status => status::execute(config),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
