use near_sdk::{env, FunctionError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CineStreamError {
    Unauthorized,
    EmptyTitle,
    MovieAlreadyExists,
    MovieDoesNotExist,
    AlreadyWatched,
    BalanceOverflow,
    MissingInput,
    InsufficientDeposit { required: u128, attached: u128 },
}

impl fmt::Display for CineStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CineStreamError::Unauthorized => f.write_str("Only owner can call this function"),
            CineStreamError::EmptyTitle => f.write_str("Title cannot be empty"),
            CineStreamError::MovieAlreadyExists => f.write_str("Movie already exists"),
            CineStreamError::MovieDoesNotExist => f.write_str("Movie does not exist"),
            CineStreamError::AlreadyWatched => f.write_str("Movie already watched by user"),
            CineStreamError::BalanceOverflow => f.write_str("Reward would overflow balance"),
            CineStreamError::MissingInput => f.write_str("Contract code missing from input"),
            CineStreamError::InsufficientDeposit { required, attached } => write!(
                f,
                "Insufficient deposit: storage costs {required} yoctoNEAR, attached {attached}"
            ),
        }
    }
}

impl FunctionError for CineStreamError {
    fn panic(&self) -> ! {
        env::panic_str(&self.to_string())
    }
}
