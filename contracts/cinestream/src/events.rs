use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "cinestream"))]
pub enum CineStreamEvent {
    #[event_version("1.0.0")]
    MovieAdded {
        title: String,
        description: String,
        url: String,
    },
    #[event_version("1.0.0")]
    MovieRemoved { title: String },
    #[event_version("1.0.0")]
    TokensRewarded {
        user: AccountId,
        title: String,
        amount: U128,
    },
    #[event_version("1.0.0")]
    OwnerChanged {
        old_owner: AccountId,
        new_owner: AccountId,
    },
    #[event_version("1.0.0")]
    ContractUpgraded { owner: AccountId, timestamp: u64 },
    #[event_version("1.0.0")]
    StateMigrated {
        old_version: String,
        new_version: String,
    },
}
