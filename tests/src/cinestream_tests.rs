//! Integration tests for the CineStream ledger contract.
//!
//! Covers:
//! - Deployment, initialization and token metadata
//! - Owner-only catalog management
//! - Watch rewards and the one-reward-per-movie rule
//! - Ownership transfer

use anyhow::Result;
use near_workspaces::network::Sandbox;
use near_workspaces::types::NearToken;
use near_workspaces::{Account, Contract, Worker};
use serde_json::{json, Value};

use crate::utils::{deploy_contract, get_wasm_path, setup_sandbox};

const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;
const REWARD: u128 = 10 * ONE_TOKEN;

fn watch_deposit() -> NearToken {
    NearToken::from_millinear(10)
}

// =============================================================================
// Setup helpers
// =============================================================================

async fn setup_cinestream() -> Result<(Worker<Sandbox>, Contract)> {
    let worker = setup_sandbox().await?;
    let wasm_path = get_wasm_path("cinestream");
    let contract = deploy_contract(&worker, &wasm_path).await?;

    contract
        .call("new")
        .args_json(json!({ "owner_id": contract.id() }))
        .transact()
        .await?
        .into_result()?;

    Ok((worker, contract))
}

async fn add_movie(contract: &Contract, title: &str) -> Result<()> {
    contract
        .call("add_movie")
        .args_json(json!({
            "title": title,
            "description": "A test movie description",
            "url": "ipfs://test-movie"
        }))
        .transact()
        .await?
        .into_result()?;
    Ok(())
}

async fn balance_of(contract: &Contract, account: &Account) -> Result<String> {
    Ok(contract
        .view("balance_of")
        .args_json(json!({ "account_id": account.id() }))
        .await?
        .json()?)
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[tokio::test]
async fn test_cinestream_deploy_and_init() -> Result<()> {
    let (_worker, contract) = setup_cinestream().await?;

    let owner: String = contract.view("get_owner").args_json(json!({})).await?.json()?;
    assert_eq!(owner, contract.id().as_str());

    let version: String = contract.view("version").args_json(json!({})).await?.json()?;
    assert_eq!(version, "0.2.0");

    let total_supply: String = contract.view("total_supply").args_json(json!({})).await?.json()?;
    assert_eq!(total_supply, "0");

    let count: u32 = contract.view("get_movie_count").args_json(json!({})).await?.json()?;
    assert_eq!(count, 0);

    Ok(())
}

#[tokio::test]
async fn test_cinestream_token_metadata() -> Result<()> {
    let (_worker, contract) = setup_cinestream().await?;

    let metadata: Value = contract.view("ft_metadata").args_json(json!({})).await?.json()?;
    assert_eq!(metadata["name"], "CineToken");
    assert_eq!(metadata["symbol"], "CTK");
    assert_eq!(metadata["decimals"], 18);
    assert_eq!(metadata["spec"], "ft-1.0.0");

    let reward: String = contract.view("reward_per_movie").args_json(json!({})).await?.json()?;
    assert_eq!(reward, REWARD.to_string());

    Ok(())
}

// =============================================================================
// Catalog Tests
// =============================================================================

#[tokio::test]
async fn test_add_movie_reads_back() -> Result<()> {
    let (_worker, contract) = setup_cinestream().await?;
    add_movie(&contract, "Test Movie").await?;

    let movie: Value = contract
        .view("get_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .await?
        .json()?;
    assert_eq!(movie["title"], "Test Movie");
    assert_eq!(movie["description"], "A test movie description");
    assert_eq!(movie["url"], "ipfs://test-movie");

    Ok(())
}

#[tokio::test]
async fn test_add_movie_rejects_empty_and_duplicate() -> Result<()> {
    let (_worker, contract) = setup_cinestream().await?;

    let result = contract
        .call("add_movie")
        .args_json(json!({ "title": "", "description": "d", "url": "u" }))
        .transact()
        .await?;
    assert!(result.is_failure());
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Title cannot be empty"));

    add_movie(&contract, "Test Movie").await?;
    let result = contract
        .call("add_movie")
        .args_json(json!({ "title": "Test Movie", "description": "d", "url": "u" }))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Movie already exists"));

    let count: u32 = contract.view("get_movie_count").args_json(json!({})).await?.json()?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn test_non_owner_cannot_manage_catalog() -> Result<()> {
    let (worker, contract) = setup_cinestream().await?;
    let alice = worker.dev_create_account().await?;
    add_movie(&contract, "Test Movie").await?;

    let result = alice
        .call(contract.id(), "add_movie")
        .args_json(json!({ "title": "Other", "description": "d", "url": "u" }))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err())
        .contains("Only owner can call this function"));

    let result = alice
        .call(contract.id(), "remove_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .transact()
        .await?;
    assert!(result.is_failure());

    let count: u32 = contract.view("get_movie_count").args_json(json!({})).await?.json()?;
    assert_eq!(count, 1);

    Ok(())
}

#[tokio::test]
async fn test_remove_movie() -> Result<()> {
    let (_worker, contract) = setup_cinestream().await?;
    add_movie(&contract, "Test Movie").await?;

    contract
        .call("remove_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .transact()
        .await?
        .into_result()?;

    let movies: Vec<Value> = contract
        .view("get_movies")
        .args_json(json!({}))
        .await?
        .json()?;
    assert!(movies.is_empty());

    let result = contract
        .call("remove_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Movie does not exist"));

    Ok(())
}

// =============================================================================
// Reward Tests
// =============================================================================

#[tokio::test]
async fn test_watch_movie_rewards_once() -> Result<()> {
    let (worker, contract) = setup_cinestream().await?;
    let user = worker.dev_create_account().await?;
    add_movie(&contract, "Test Movie").await?;

    let outcome = user
        .call(contract.id(), "watch_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .deposit(watch_deposit())
        .transact()
        .await?
        .into_result()?;
    assert!(outcome.logs().iter().any(|l| l.contains("\"event\":\"tokens_rewarded\"")));
    assert!(outcome.logs().iter().any(|l| l.contains("\"event\":\"ft_mint\"")));

    assert_eq!(balance_of(&contract, &user).await?, REWARD.to_string());
    let total_supply: String = contract.view("total_supply").args_json(json!({})).await?.json()?;
    assert_eq!(total_supply, REWARD.to_string());

    let watched: bool = contract
        .view("has_watched")
        .args_json(json!({ "account_id": user.id(), "title": "Test Movie" }))
        .await?
        .json()?;
    assert!(watched);

    let result = user
        .call(contract.id(), "watch_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .deposit(watch_deposit())
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err())
        .contains("Movie already watched by user"));
    assert_eq!(balance_of(&contract, &user).await?, REWARD.to_string());

    Ok(())
}

#[tokio::test]
async fn test_watch_requires_storage_deposit() -> Result<()> {
    let (worker, contract) = setup_cinestream().await?;
    let user = worker.dev_create_account().await?;
    add_movie(&contract, "Test Movie").await?;

    let result = user
        .call(contract.id(), "watch_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Insufficient deposit"));
    assert_eq!(balance_of(&contract, &user).await?, "0");

    let before = user.view_account().await?.balance;
    user.call(contract.id(), "watch_movie")
        .args_json(json!({ "title": "Test Movie" }))
        .deposit(NearToken::from_near(1))
        .transact()
        .await?
        .into_result()?;
    let spent = before.as_yoctonear() - user.view_account().await?.balance.as_yoctonear();
    // Gas plus storage; the rest of the 1 NEAR came back.
    assert!(spent < NearToken::from_millinear(50).as_yoctonear());

    Ok(())
}

#[tokio::test]
async fn test_watch_unknown_movie_fails() -> Result<()> {
    let (worker, contract) = setup_cinestream().await?;
    let user = worker.dev_create_account().await?;

    let result = user
        .call(contract.id(), "watch_movie")
        .args_json(json!({ "title": "Nope" }))
        .deposit(watch_deposit())
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Movie does not exist"));
    assert_eq!(balance_of(&contract, &user).await?, "0");

    Ok(())
}

#[tokio::test]
async fn test_total_supply_tracks_all_users() -> Result<()> {
    let (worker, contract) = setup_cinestream().await?;
    let alice = worker.dev_create_account().await?;
    let bob = worker.dev_create_account().await?;
    add_movie(&contract, "Quantum Heist").await?;
    add_movie(&contract, "Neon City").await?;

    for (user, title) in [
        (&alice, "Quantum Heist"),
        (&alice, "Neon City"),
        (&bob, "Neon City"),
    ] {
        user.call(contract.id(), "watch_movie")
            .args_json(json!({ "title": title }))
            .deposit(watch_deposit())
            .transact()
            .await?
            .into_result()?;
    }

    assert_eq!(balance_of(&contract, &alice).await?, (2 * REWARD).to_string());
    assert_eq!(balance_of(&contract, &bob).await?, REWARD.to_string());
    let total_supply: String = contract.view("ft_total_supply").args_json(json!({})).await?.json()?;
    assert_eq!(total_supply, (3 * REWARD).to_string());

    let history: Vec<String> = contract
        .view("get_watched_movies")
        .args_json(json!({ "account_id": alice.id() }))
        .await?
        .json()?;
    assert_eq!(history, vec!["Quantum Heist", "Neon City"]);

    Ok(())
}

// =============================================================================
// Owner Admin Tests
// =============================================================================

#[tokio::test]
async fn test_set_owner_transfers_catalog_rights() -> Result<()> {
    let (worker, contract) = setup_cinestream().await?;
    let new_owner = worker.dev_create_account().await?;

    contract
        .call("set_owner")
        .args_json(json!({ "new_owner": new_owner.id() }))
        .transact()
        .await?
        .into_result()?;

    new_owner
        .call(contract.id(), "add_movie")
        .args_json(json!({ "title": "Mystic Forest", "description": "d", "url": "u" }))
        .transact()
        .await?
        .into_result()?;

    let result = contract
        .call("add_movie")
        .args_json(json!({ "title": "Neon City", "description": "d", "url": "u" }))
        .transact()
        .await?;
    assert!(result.is_failure());

    Ok(())
}
