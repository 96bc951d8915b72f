pub mod consensus;
pub mod leaderboard;

pub use consensus::{consensus, distribution, DistributionBucket};
pub use leaderboard::rank;
