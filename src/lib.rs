//! Stoke - engagement scoring and leaderboard engine
//!
//! Awards points to subscribers for distinct daily actions (opening a
//! newsletter, clicking a link), maintains a global ranking, and decays
//! unused scores over time. All durable state lives in an external
//! key-value store (Redis in production, in-memory for tests).
//!
//! ## Components
//!
//! - **Engagement**: facade exposing the operations consumed by the HTTP layer
//! - **InteractionDedup**: at-most-one credit per action type per calendar day
//! - **PointsLedger**: authoritative per-subscriber point totals
//! - **RankingIndex**: sorted mirror of all positive totals
//! - **HistoryRecorder**: capped per-subscriber interaction log
//! - **DecaySweeper**: periodic -1 decay with zero-score retirement

pub mod badge;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod history;
pub mod keys;
pub mod ledger;
pub mod ranking;
pub mod store;
pub mod sweeper;
pub mod types;

pub use config::Args;
pub use engine::Engagement;
pub use store::{KvStore, MemoryStore, RedisStore};
pub use sweeper::{spawn_decay_task, DecaySweeper};
pub use types::{ActionKind, Result, StokeError};
