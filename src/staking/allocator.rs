use rust_decimal::Decimal;

use crate::domain::Balance;

/// Decides how much of the claimed rewards to restake into each core.
///
/// `fee` is `None` while the batch fee is still unknown (draft pass) and `Some` once a
/// quote exists. The result is a planck amount; `None` or a non-positive value means
/// nothing can be restaked.
pub trait RestakeAllocator: Send + Sync {
    /// `core_count` counts restake-eligible targets only; era-less entries are excluded.
    fn allocate(&self, fee: Option<Balance>, core_count: usize) -> Option<Decimal>;
}

impl<F> RestakeAllocator for F
where
    F: Fn(Option<Balance>, usize) -> Option<Decimal> + Send + Sync,
{
    fn allocate(&self, fee: Option<Balance>, core_count: usize) -> Option<Decimal> {
        self(fee, core_count)
    }
}

/// Splits the unclaimed rewards evenly across cores after paying the batch fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvenSplitAllocator {
    pub unclaimed: Balance,
}

impl EvenSplitAllocator {
    pub fn new(unclaimed: Balance) -> Self {
        Self { unclaimed }
    }
}

impl RestakeAllocator for EvenSplitAllocator {
    fn allocate(&self, fee: Option<Balance>, core_count: usize) -> Option<Decimal> {
        if core_count == 0 {
            return None;
        }
        let unclaimed = self.unclaimed.as_decimal().ok()?;
        let fee = fee.unwrap_or_default().as_decimal().ok()?;
        let net = unclaimed - fee;
        net.checked_div(Decimal::from(core_count as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn even_split_nets_out_fee() {
        let alloc = EvenSplitAllocator::new(Balance(1_000));
        assert_eq!(alloc.allocate(None, 4), Some(dec!(250)));
        assert_eq!(alloc.allocate(Some(Balance(100)), 4), Some(dec!(225)));
    }

    #[test]
    fn even_split_goes_negative_when_fee_exceeds_rewards() {
        let alloc = EvenSplitAllocator::new(Balance(10));
        let share = alloc.allocate(Some(Balance(30)), 2).unwrap();
        assert!(share < Decimal::ZERO);
    }

    #[test]
    fn zero_cores_allocates_nothing() {
        assert_eq!(EvenSplitAllocator::new(Balance(10)).allocate(None, 0), None);
    }

    #[test]
    fn closures_are_allocators() {
        let fixed = |_: Option<Balance>, _: usize| Some(dec!(7));
        assert_eq!(fixed.allocate(Some(Balance(1)), 3), Some(dec!(7)));
    }
}
