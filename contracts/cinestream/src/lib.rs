//! CineStream ledger. Owner-curated movie catalog that pays a fixed
//! 18-decimal reward once per (account, movie) pair.

use crate::errors::CineStreamError;
use crate::events::CineStreamEvent;
use crate::rewards::TOKENS_PER_MOVIE;
use crate::state::{CineStreamState, STATE_VERSION};
use crate::types::MovieView;
use near_contract_standards::fungible_token::metadata::{
    FungibleTokenMetadata, FungibleTokenMetadataProvider, FT_METADATA_SPEC,
};
use near_sdk::json_types::U128;
use near_sdk::{env, near, AccountId, Gas, NearToken, PanicOnDefault, Promise};

mod catalog;
mod errors;
mod events;
mod rewards;
mod state;
mod state_versions;
mod types;

const TOKEN_NAME: &str = "CineToken";
const TOKEN_SYMBOL: &str = "CTK";
const DECIMALS: u8 = 18;

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct CineStream {
    state: CineStreamState,
}

#[near]
impl CineStream {
    #[init]
    pub fn new(owner_id: AccountId) -> Self {
        Self {
            state: CineStreamState::new(owner_id),
        }
    }

    #[private]
    #[init(ignore_state)]
    pub fn migrate() -> Self {
        use near_sdk::borsh;
        use state_versions::StateV010;

        let state_bytes = env::storage_read(b"STATE").unwrap_or_default();

        if let Ok(state) = borsh::from_slice::<CineStreamState>(&state_bytes) {
            if state.version == STATE_VERSION {
                env::log_str("State is already at latest version");
                return Self { state };
            }
        }

        if let Ok(old_state) = borsh::from_slice::<StateV010>(&state_bytes) {
            if old_state.version == "0.1.0" {
                env::log_str("Migrating from state version 0.1.0");
                let mut state = CineStreamState::new(old_state.owner_id);
                state.movies = old_state.movies;
                state.watched = old_state.watched;
                state.balances = old_state.balances;
                state.total_supply = old_state.total_supply;
                CineStreamEvent::StateMigrated {
                    old_version: "0.1.0".to_string(),
                    new_version: STATE_VERSION.to_string(),
                }
                .emit();
                return Self { state };
            }
        }

        env::log_str("No valid prior state found, initializing new state");
        Self {
            state: CineStreamState::new(env::current_account_id()),
        }
    }

    // --- Catalog (owner) ---

    #[handle_result]
    pub fn add_movie(
        &mut self,
        title: String,
        description: String,
        url: String,
    ) -> Result<(), CineStreamError> {
        catalog::add_movie(&mut self.state, title, description, url)
    }

    #[handle_result]
    pub fn remove_movie(&mut self, title: String) -> Result<(), CineStreamError> {
        catalog::remove_movie(&mut self.state, title)
    }

    // --- Rewards ---

    /// Attach enough NEAR to cover the storage this watch adds; the rest is refunded.
    #[payable]
    #[handle_result]
    pub fn watch_movie(&mut self, title: String) -> Result<(), CineStreamError> {
        rewards::watch_movie(&mut self.state, title)
    }

    // --- Views ---

    #[handle_result]
    pub fn get_movie(&self, title: String) -> Result<MovieView, CineStreamError> {
        let movie = self.state.movie(&title)?;
        Ok(MovieView::new(&title, movie))
    }

    pub fn get_movies(&self, from_index: Option<u32>, limit: Option<u32>) -> Vec<MovieView> {
        catalog::get_movies(&self.state, from_index, limit)
    }

    pub fn get_movie_count(&self) -> u32 {
        self.state.movies.len()
    }

    pub fn balance_of(&self, account_id: AccountId) -> U128 {
        U128(self.state.balance_of(&account_id))
    }

    pub fn has_watched(&self, account_id: AccountId, title: String) -> bool {
        self.state.has_watched(&account_id, &title)
    }

    pub fn get_watched_movies(&self, account_id: AccountId) -> Vec<String> {
        self.state.watched_movies(&account_id)
    }

    pub fn reward_per_movie(&self) -> U128 {
        U128(TOKENS_PER_MOVIE)
    }

    // --- Token details ---

    pub fn name(&self) -> String {
        TOKEN_NAME.to_string()
    }

    pub fn symbol(&self) -> String {
        TOKEN_SYMBOL.to_string()
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn total_supply(&self) -> U128 {
        U128(self.state.total_supply)
    }

    /// NEP-141 view alias of `total_supply`.
    pub fn ft_total_supply(&self) -> U128 {
        self.total_supply()
    }

    /// NEP-141 view alias of `balance_of`.
    pub fn ft_balance_of(&self, account_id: AccountId) -> U128 {
        self.balance_of(account_id)
    }

    // --- Administration ---

    pub fn get_owner(&self) -> AccountId {
        self.state.owner_id.clone()
    }

    #[handle_result]
    pub fn set_owner(&mut self, new_owner: AccountId) -> Result<(), CineStreamError> {
        let old_owner = self.state.set_owner(new_owner.clone())?;
        CineStreamEvent::OwnerChanged {
            old_owner,
            new_owner,
        }
        .emit();
        Ok(())
    }

    pub fn version(&self) -> String {
        self.state.version.clone()
    }

    /// Deploys the wasm passed as raw input, then runs `migrate`. Owner only.
    #[handle_result]
    pub fn update_contract(&mut self) -> Result<Promise, CineStreamError> {
        let owner = self.state.assert_owner()?;
        let code = env::input().ok_or(CineStreamError::MissingInput)?;
        CineStreamEvent::ContractUpgraded {
            owner,
            timestamp: env::block_timestamp_ms(),
        }
        .emit();
        Ok(Promise::new(env::current_account_id())
            .deploy_contract(code)
            .function_call(
                "migrate".to_string(),
                vec![],
                NearToken::from_yoctonear(0),
                Gas::from_tgas(250),
            ))
    }
}

// --- NEP-148: Fungible Token Metadata ---
#[near]
impl FungibleTokenMetadataProvider for CineStream {
    fn ft_metadata(&self) -> FungibleTokenMetadata {
        FungibleTokenMetadata {
            spec: FT_METADATA_SPEC.to_string(),
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            icon: None,
            reference: None,
            reference_hash: None,
            decimals: DECIMALS,
        }
    }
}
