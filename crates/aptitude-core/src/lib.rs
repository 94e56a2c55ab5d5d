//! aptitude-core — Question bank, answer recording, scoring and session lifecycle.
//!
//! This crate holds everything the quiz needs that is not presentation:
//! the data model, the bounded answer recorder, the score aggregator, the
//! rank resolver, the persisted record store and the stage controller that
//! ties them together. Rendering lives in `aptitude-report` and consumes the
//! view descriptions produced by [`view`].

pub mod bank;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod ranking;
pub mod recorder;
pub mod scoring;
pub mod store;
pub mod view;

pub use bank::QuestionBank;
pub use error::{BankError, QuizError, StoreError};
pub use lifecycle::{Advance, Gate, QuizState, SessionController};
pub use model::{Answer, Category, CategoryProfile, QuizOption, QuizResult, ScoreVector, Session};
pub use store::{JsonFileStore, MemoryStore, RecordKey, RecordStore};
