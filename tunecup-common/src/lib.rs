//! # tunecup Common Library
//!
//! Shared code for the tunecup league tools including:
//! - Record types (competitors, rounds, submissions, votes)
//! - Record stores and the storage collaborator contract
//! - Configuration loading
//! - Permissive points parsing

pub mod config;
pub mod error;
pub mod points;
pub mod records;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use records::{Competitor, Record, Round, Submission, Vote, VoteKey};
pub use storage::{
    CsvFileStorage, FileStorage, JsonFileStorage, MemoryStorage, RecordStorage, StoreFormat,
};
pub use store::{CompetitorStore, RecordStore, RoundStore, SubmissionStore, VoteStore};
