//! Benchmarks for voting and finalization
//!
//! - Vote-to-finalize cycle for one contribution
//! - Policy evaluation in isolation
//! - Scaling with the number of contributions already on record

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use oss_rewards::config::{PlatformConfig, TokenConfig};
use oss_rewards::registry::{Category, Submission, VoteTally, VotingPolicy};
use oss_rewards::{Account, Command, Platform};

const NOW: u64 = 1_700_000_000;

fn member(id: u32) -> Account {
    Account::from_identity(&format!("member-{}", id))
}

fn submission() -> Submission {
    Submission {
        title: "Speed up tokenizer".to_string(),
        description: "Avoid reallocations in the hot loop".to_string(),
        project_url: "https://github.com/example/tokenizer".to_string(),
        github_pr: "https://github.com/example/tokenizer/pull/3".to_string(),
        category: Category::Performance,
    }
}

fn platform(quorum: u32) -> Platform {
    let config = PlatformConfig {
        token: TokenConfig {
            decimals: 0,
            initial_supply: 0,
            max_supply: u64::MAX,
            ..Default::default()
        },
        voting: VotingPolicy {
            quorum,
            ..Default::default()
        },
        ..Default::default()
    };
    Platform::genesis(member(0), Account::from_identity("OSSRewards"), &config, NOW)
        .expect("genesis")
}

/// Platform holding `count` pending contributions
fn populated(quorum: u32, count: u32) -> Platform {
    let mut platform = platform(quorum);
    for i in 0..count {
        platform
            .execute(&member(1 + i % 16), Command::SubmitContribution(submission()), NOW)
            .expect("submit");
    }
    platform
}

/// Submit, vote to quorum and claim
fn full_cycle(platform: &mut Platform, quorum: u32) {
    let contributor = member(1_000);
    let receipt = platform
        .execute(&contributor, Command::SubmitContribution(submission()), NOW)
        .expect("submit");
    let id = match receipt.outcome {
        oss_rewards::Outcome::Submitted(id) => id,
        _ => unreachable!(),
    };
    for v in 0..quorum {
        platform
            .execute(&member(2_000 + v), Command::Vote { id, approve: true }, NOW)
            .expect("vote");
    }
    platform
        .execute(&contributor, Command::ClaimReward { id }, NOW)
        .expect("claim");
}

fn benchmark_policy_evaluate(c: &mut Criterion) {
    let policy = VotingPolicy::default();
    let tally = VoteTally {
        approve: 7,
        reject: 4,
    };

    c.bench_function("voting_policy_evaluate", |b| {
        b.iter(|| black_box(&policy).evaluate(black_box(&tally)));
    });
}

fn benchmark_full_cycle(c: &mut Criterion) {
    c.bench_function("submit_vote_claim_quorum_3", |b| {
        b.iter_batched(
            || platform(3),
            |mut p| full_cycle(&mut p, 3),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn benchmark_vote_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("vote_with_existing_contributions");

    for count in [10u32, 100, 1_000].iter() {
        let base = populated(3, *count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter_batched(
                || base.clone(),
                |mut p| {
                    p.execute(&member(9_999), Command::Vote { id: 1, approve: true }, NOW)
                        .expect("vote")
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_policy_evaluate,
    benchmark_full_cycle,
    benchmark_vote_scaling
);
criterion_main!(benches);
