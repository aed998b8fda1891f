pub mod config;
pub mod diff;
pub mod enrich;
pub mod error;
pub mod load;
pub mod models;
pub mod notify;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod score;
pub mod validate;
pub mod verify;

pub use config::{EnrichConfig, RetryPolicy};
pub use diff::diff;
pub use enrich::{enrich_all, Fetcher, LeetCodeSource, SolvedCountSource};
pub use error::{FetchError, ValidationError};
pub use partition::{assign_sections, PartitionPolicy};
pub use pipeline::{process_batch, BatchOutcome};
pub use score::score;
