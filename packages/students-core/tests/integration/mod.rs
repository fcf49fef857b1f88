//! Integration test suite for the storage engines.
//!
//! 1. Storage contract, run against every engine
//! 2. On-disk SQLite persistence

pub mod helpers;
pub mod persistence_tests;
pub mod storage_contract_tests;
