//! wallet-api
//!
//! A small ledger-style web service: users, wallets and money-movement
//! transactions over PostgreSQL. The ledger engine mutates wallet balances
//! only inside explicit units of work with row-level locks, so concurrent
//! transfers can never overdraw a wallet or lose a transaction record.

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
