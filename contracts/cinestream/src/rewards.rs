use crate::errors::CineStreamError;
use crate::events::CineStreamEvent;
use crate::state::CineStreamState;
use near_contract_standards::fungible_token::events::FtMint;
use near_sdk::json_types::U128;
use near_sdk::{env, AccountId, NearToken, Promise};

/// 10 tokens at 18 decimals.
pub const TOKENS_PER_MOVIE: u128 = 10_000_000_000_000_000_000;

pub fn watch_movie(state: &mut CineStreamState, title: String) -> Result<(), CineStreamError> {
    state.movie(&title)?;
    let user = env::predecessor_account_id();
    if state.has_watched(&user, &title) {
        return Err(CineStreamError::AlreadyWatched);
    }

    let balance = state
        .balance_of(&user)
        .checked_add(TOKENS_PER_MOVIE)
        .ok_or(CineStreamError::BalanceOverflow)?;
    let total_supply = state
        .total_supply
        .checked_add(TOKENS_PER_MOVIE)
        .ok_or(CineStreamError::BalanceOverflow)?;

    // The caller pays for the bytes this watch adds; the surplus goes back.
    let before = env::storage_usage();
    let prior_history = state.history.get(&user).cloned();
    let prior_balance = state.balances.get(&user).copied();

    let mut history = prior_history.clone().unwrap_or_default();
    history.push(title.clone());
    state.watched.insert((user.clone(), title.clone()));
    state.history.insert(user.clone(), history);
    state.balances.insert(user.clone(), balance);
    state.history.flush();
    state.balances.flush();

    let bytes_used = env::storage_usage().saturating_sub(before);
    let storage_cost = u128::from(bytes_used) * env::storage_byte_cost().as_yoctonear();
    let attached = env::attached_deposit().as_yoctonear();
    if attached < storage_cost {
        state.watched.remove(&(user.clone(), title));
        match prior_history {
            Some(history) => state.history.insert(user.clone(), history),
            None => state.history.remove(&user),
        };
        match prior_balance {
            Some(balance) => state.balances.insert(user, balance),
            None => state.balances.remove(&user),
        };
        return Err(CineStreamError::InsufficientDeposit {
            required: storage_cost,
            attached,
        });
    }
    state.total_supply = total_supply;

    let refund = attached - storage_cost;
    if refund > 0 {
        let _ = Promise::new(user.clone()).transfer(NearToken::from_yoctonear(refund));
    }

    emit_reward(&user, title, TOKENS_PER_MOVIE);
    Ok(())
}

fn emit_reward(user: &AccountId, title: String, amount: u128) {
    FtMint {
        owner_id: user,
        amount: U128(amount),
        memo: Some("Movie reward"),
    }
    .emit();
    CineStreamEvent::TokensRewarded {
        user: user.clone(),
        title,
        amount: U128(amount),
    }
    .emit();
}
