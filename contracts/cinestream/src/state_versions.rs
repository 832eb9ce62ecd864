use crate::types::Movie;
use near_sdk::store::{IterableMap, LookupMap, LookupSet};
use near_sdk::{near, AccountId};

/// State for version 0.1.0, before per-account watch history.
#[near(serializers = [borsh])]
pub struct StateV010 {
    pub version: String,
    pub owner_id: AccountId,
    pub movies: IterableMap<String, Movie>,
    pub watched: LookupSet<(AccountId, String)>,
    pub balances: LookupMap<AccountId, u128>,
    pub total_supply: u128,
}
