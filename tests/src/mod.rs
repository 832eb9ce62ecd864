#[cfg(test)]
pub mod cinestream_tests;
pub mod utils;
