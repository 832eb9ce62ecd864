use crate::errors::CineStreamError;
use crate::types::Movie;
use near_sdk::store::{IterableMap, LookupMap, LookupSet};
use near_sdk::{env, near, AccountId, BorshStorageKey};

pub const STATE_VERSION: &str = "0.2.0";

#[derive(BorshStorageKey)]
#[near]
pub(crate) enum StorageKey {
    Movies,
    Watched,
    Balances,
    History,
}

#[near(serializers = [borsh])]
pub struct CineStreamState {
    pub version: String,
    pub owner_id: AccountId,
    pub movies: IterableMap<String, Movie>,
    pub watched: LookupSet<(AccountId, String)>,
    pub balances: LookupMap<AccountId, u128>,
    pub total_supply: u128,
    pub history: LookupMap<AccountId, Vec<String>>, // Added for 0.2.0
}

impl CineStreamState {
    pub fn new(owner_id: AccountId) -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            owner_id,
            movies: IterableMap::new(StorageKey::Movies),
            watched: LookupSet::new(StorageKey::Watched),
            balances: LookupMap::new(StorageKey::Balances),
            total_supply: 0,
            history: LookupMap::new(StorageKey::History),
        }
    }

    pub fn is_owner(&self, account_id: &AccountId) -> bool {
        &self.owner_id == account_id
    }

    pub fn assert_owner(&self) -> Result<AccountId, CineStreamError> {
        let caller = env::predecessor_account_id();
        if !self.is_owner(&caller) {
            return Err(CineStreamError::Unauthorized);
        }
        Ok(caller)
    }

    pub fn movie(&self, title: &str) -> Result<&Movie, CineStreamError> {
        self.movies
            .get(title)
            .ok_or(CineStreamError::MovieDoesNotExist)
    }

    pub fn has_watched(&self, account_id: &AccountId, title: &str) -> bool {
        self.watched
            .contains(&(account_id.clone(), title.to_string()))
    }

    pub fn balance_of(&self, account_id: &AccountId) -> u128 {
        self.balances.get(account_id).copied().unwrap_or(0)
    }

    pub fn watched_movies(&self, account_id: &AccountId) -> Vec<String> {
        self.history.get(account_id).cloned().unwrap_or_default()
    }

    pub fn set_owner(&mut self, new_owner: AccountId) -> Result<AccountId, CineStreamError> {
        self.assert_owner()?;
        Ok(std::mem::replace(&mut self.owner_id, new_owner))
    }
}
