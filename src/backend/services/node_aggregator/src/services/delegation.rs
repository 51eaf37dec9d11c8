use serde::Serialize;

/// Delegation status of a staking participant relative to the current
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DelegationStatus {
    Unbonded,
    Unbonding,
    Pending,
    Bonded,
}

/// One unbonding lock held by a delegator.
#[derive(Debug, Clone, PartialEq)]
pub struct UnbondingLock {
    pub amount: f64,
    pub withdraw_epoch: Option<u64>,
}

/// Delegation position of one participant as reported by the indexer.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegatorState {
    pub bonded_amount: f64,
    pub start_epoch: u64,
    pub unbonding_locks: Vec<UnbondingLock>,
}

/// Classify a delegator position. A lock whose withdraw epoch is still in
/// the future marks the position as unbonding; a start epoch past the
/// current one means the bond is not yet effective.
pub fn delegation_status(delegator: &DelegatorState, current_epoch: u64) -> DelegationStatus {
    if delegator.bonded_amount == 0.0 {
        return DelegationStatus::Unbonded;
    }
    if delegator
        .unbonding_locks
        .iter()
        .any(|lock| lock.withdraw_epoch.map_or(false, |epoch| epoch > current_epoch))
    {
        return DelegationStatus::Unbonding;
    }
    if delegator.start_epoch > current_epoch {
        return DelegationStatus::Pending;
    }
    if delegator.start_epoch > 0 {
        DelegationStatus::Bonded
    } else {
        DelegationStatus::Unbonded
    }
}
