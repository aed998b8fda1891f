pub mod coordinator;
pub mod fetcher;
pub mod leetcode;

pub use coordinator::enrich_all;
pub use fetcher::{Fetcher, SolvedCountSource};
pub use leetcode::LeetCodeSource;
