use std::sync::Arc;

use crate::auth::{InMemoryUserStore, JwtConfig, TokenCodec};
use crate::time::SimulatedTimeSource;

/// Secret shared by every test codec.
pub const TEST_SECRET: &str = "test-secret-key-that-is-long-enough";

/// Create a codec signing with `TEST_SECRET` and reading time from `time`.
pub fn test_codec(time: &Arc<SimulatedTimeSource>) -> TokenCodec {
    #[allow(clippy::expect_used)]
    let config = JwtConfig::new_hs256(TEST_SECRET).expect("test secret is non-empty");
    TokenCodec::new(&config, Arc::<SimulatedTimeSource>::clone(time))
}

/// Cheapest work factor bcrypt accepts.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Create an empty user store with the cheapest bcrypt cost.
pub fn test_store() -> InMemoryUserStore {
    InMemoryUserStore::with_cost(TEST_BCRYPT_COST)
}
