use crate::domain::DomainError;
use crate::infrastructure::repository::AccountRepositoryTrait;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// How many candidate numbers are probed before giving up. The keyspace
/// holds 10^8 values, so hitting this bound means the pool is effectively
/// saturated or the store is misbehaving.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 16;

/// Allocates 8-digit, zero-padded account numbers by uniform sampling.
/// The probe here is advisory only; the storage-level uniqueness
/// constraint on `account_number` is what actually guarantees no two
/// accounts ever share a number.
#[derive(Clone)]
pub struct AccountNumberAllocator {
    accounts: Arc<dyn AccountRepositoryTrait>,
    max_attempts: usize,
}

impl AccountNumberAllocator {
    pub fn new(accounts: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self {
            accounts,
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
        }
    }

    #[cfg(test)]
    fn with_max_attempts(accounts: Arc<dyn AccountRepositoryTrait>, max_attempts: usize) -> Self {
        Self {
            accounts,
            max_attempts,
        }
    }

    pub async fn allocate(&self) -> Result<String, DomainError> {
        for attempt in 1..=self.max_attempts {
            let candidate = generate_candidate();
            if !self.accounts.number_in_use(&candidate).await? {
                debug!(
                    "Allocated account number {} on attempt {}",
                    candidate, attempt
                );
                return Ok(candidate);
            }
        }
        Err(DomainError::AllocationExhausted)
    }
}

fn generate_candidate() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..100_000_000);
    format!("{:08}", n)
}
