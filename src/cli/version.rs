use oss_rewards::deployment::{REWARDS_COMPONENT, TOKEN_COMPONENT};
use oss_rewards::store::SNAPSHOT_VERSION;

/// Version line plus the formats this build reads and writes.
pub fn version_report() -> String {
    format!(
        "oss-rewards {}\nSnapshot format: v{}\nComponents: {}, {}",
        env!("CARGO_PKG_VERSION"),
        SNAPSHOT_VERSION,
        TOKEN_COMPONENT,
        REWARDS_COMPONENT
    )
}

pub fn execute() {
    println!("{}", version_report());
}
