//! Claim and restake batch construction
//!
//! Pure functions: no chain access, no notifications. The workflow in
//! [`restake_claim`](super::restake_claim) sequences them around the fee quotes.

use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::debug;

use super::allocator::RestakeAllocator;
use crate::domain::{Balance, BatchPlan, CoreTarget, StakingCall, StakingCoreRef, UnclaimedCoreEntry};
use crate::error::ClaimError;

/// Which restake pass is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestakePass {
    /// Fee unknown; the plan only exists to be quoted
    Draft,
    /// Fee known from the draft quote; the plan will be submitted
    Final { fee: Balance },
}

impl RestakePass {
    pub fn fee(&self) -> Option<Balance> {
        match self {
            RestakePass::Draft => None,
            RestakePass::Final { fee } => Some(*fee),
        }
    }
}

/// Drop repeated core ids, keeping the first entry for each in its original position
pub fn unique_cores(entries: &[UnclaimedCoreEntry]) -> Vec<UnclaimedCoreEntry> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| seen.insert(entry.core_id))
        .copied()
        .collect()
}

/// Cores to claim from and restake into.
///
/// Era-aware entries when the indexer supplied any, otherwise one era-unaware target
/// per staking core.
pub fn claim_targets(unique: &[UnclaimedCoreEntry], staking_cores: &[StakingCoreRef]) -> Vec<CoreTarget> {
    if unique.is_empty() {
        staking_cores.iter().map(CoreTarget::from).collect()
    } else {
        unique.iter().copied().map(CoreTarget::from).collect()
    }
}

/// One claim per unclaimed era for era-aware targets, one per core otherwise
pub fn build_claims(targets: &[CoreTarget], current_era: u32) -> BatchPlan {
    let mut plan = BatchPlan::new();
    for target in targets {
        match *target {
            CoreTarget::EraAware {
                core_id,
                earliest_era: Some(earliest),
            } => {
                for _era in earliest..current_era {
                    plan.push(StakingCall::ClaimRewards { core: core_id });
                }
            }
            CoreTarget::EraAware {
                earliest_era: None, ..
            } => {}
            CoreTarget::EraUnaware { key } => plan.push(StakingCall::ClaimRewards { core: key }),
        }
    }
    plan
}

/// Append one stake call per restake-eligible target.
///
/// On the draft pass a missing or non-positive allocation skips the core. On the final
/// pass it means the fee ate the rewards and the whole claim must be abandoned. A
/// positive allocation below half a planck rounds to nothing and is skipped.
pub fn append_restakes(
    plan: &mut BatchPlan,
    targets: &[CoreTarget],
    allocator: &dyn RestakeAllocator,
    pass: RestakePass,
) -> Result<usize, ClaimError> {
    let eligible: Vec<&CoreTarget> = targets.iter().filter(|t| t.is_restake_eligible()).collect();
    let core_count = eligible.len();
    let mut appended = 0;

    for target in eligible {
        let allocation = allocator
            .allocate(pass.fee(), core_count)
            .filter(|amount| *amount > Decimal::ZERO);

        match (allocation, pass) {
            (Some(allocation), _) => match Balance::from_planck_decimal(allocation) {
                Some(amount) => {
                    plan.push(StakingCall::Stake {
                        core: target.core(),
                        amount,
                    });
                    appended += 1;
                }
                None => debug!(
                    "Allocation {} for core {} rounds to zero planck, skipping",
                    allocation,
                    target.core()
                ),
            },
            (None, RestakePass::Draft) => {
                debug!("No restake allocation for core {} on draft pass", target.core());
            }
            (None, RestakePass::Final { .. }) => {
                return Err(ClaimError::RestakeInsufficientAfterFees);
            }
        }
    }

    Ok(appended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoreId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(core: u32, era: Option<u32>) -> UnclaimedCoreEntry {
        UnclaimedCoreEntry::new(core, era)
    }

    #[test]
    fn unique_cores_keeps_first_occurrence() {
        let resolved = unique_cores(&[entry(1, Some(3)), entry(1, Some(7)), entry(2, Some(5))]);
        assert_eq!(resolved, vec![entry(1, Some(3)), entry(2, Some(5))]);
    }

    #[test]
    fn claims_cover_half_open_era_range() {
        let targets = claim_targets(&[entry(1, Some(5))], &[]);
        assert_eq!(build_claims(&targets, 8).claim_count(), 3);
        assert_eq!(build_claims(&targets, 5).claim_count(), 0);
    }

    #[test]
    fn entries_without_era_contribute_nothing() {
        let targets = claim_targets(&[entry(1, None), entry(2, Some(6))], &[StakingCoreRef::new(9)]);
        let plan = build_claims(&targets, 8);
        assert_eq!(
            plan.calls(),
            &[
                StakingCall::ClaimRewards { core: CoreId(2) },
                StakingCall::ClaimRewards { core: CoreId(2) },
            ]
        );
    }

    #[test]
    fn fallback_claims_once_per_staking_core() {
        let cores = vec![StakingCoreRef::new(1), StakingCoreRef::new(2), StakingCoreRef::new(3)];
        let targets = claim_targets(&[], &cores);
        let plan = build_claims(&targets, 100);
        assert_eq!(plan.claim_count(), 3);
    }

    #[test]
    fn draft_pass_skips_cores_without_allocation() {
        let targets = claim_targets(&[entry(1, Some(1)), entry(2, None)], &[]);
        let mut plan = BatchPlan::new();
        let none = |_: Option<Balance>, _: usize| None::<Decimal>;
        assert_eq!(append_restakes(&mut plan, &targets, &none, RestakePass::Draft), Ok(0));
        assert!(plan.is_empty());
    }

    #[test]
    fn final_pass_rejects_non_positive_allocation() {
        let targets = claim_targets(&[entry(1, Some(1))], &[]);
        let mut plan = BatchPlan::new();
        let zero = |_: Option<Balance>, _: usize| Some(Decimal::ZERO);
        assert_eq!(
            append_restakes(
                &mut plan,
                &targets,
                &zero,
                RestakePass::Final { fee: Balance(10) }
            ),
            Err(ClaimError::RestakeInsufficientAfterFees)
        );
    }

    #[test]
    fn final_pass_skips_positive_dust_instead_of_aborting() {
        let targets = claim_targets(&[entry(1, Some(1)), entry(2, Some(1))], &[]);
        let mut plan = BatchPlan::new();
        let dust = |_: Option<Balance>, _: usize| Some(dec!(0.3));
        assert_eq!(
            append_restakes(&mut plan, &targets, &dust, RestakePass::Final { fee: Balance(1) }),
            Ok(0)
        );
        assert!(plan.is_empty());

        let half = |_: Option<Balance>, _: usize| Some(dec!(0.5));
        assert_eq!(
            append_restakes(&mut plan, &targets, &half, RestakePass::Final { fee: Balance(1) }),
            Ok(2)
        );
        assert_eq!(plan.total_restaked(), Balance(2));
    }

    #[test]
    fn allocator_sees_fee_only_on_final_pass_and_eligible_count() {
        let targets = claim_targets(&[entry(1, Some(1)), entry(2, None), entry(3, Some(2))], &[]);
        let alloc = |fee: Option<Balance>, count: usize| {
            assert_eq!(count, 2);
            Some(match fee {
                None => dec!(100.5),
                Some(fee) => Decimal::from(100u64 - fee.planck() as u64),
            })
        };

        let mut draft = BatchPlan::new();
        append_restakes(&mut draft, &targets, &alloc, RestakePass::Draft).unwrap();
        assert_eq!(draft.total_restaked(), Balance(202));

        let mut fin = BatchPlan::new();
        append_restakes(&mut fin, &targets, &alloc, RestakePass::Final { fee: Balance(40) }).unwrap();
        assert_eq!(
            fin.calls(),
            &[
                StakingCall::Stake {
                    core: CoreId(1),
                    amount: Balance(60)
                },
                StakingCall::Stake {
                    core: CoreId(3),
                    amount: Balance(60)
                },
            ]
        );
    }
}
