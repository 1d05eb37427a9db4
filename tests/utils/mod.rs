pub mod actions;
pub mod assertions;
pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::play_and_settle;
#[allow(unused_imports)]
pub use mocks::MockSocket;
#[allow(unused_imports)]
pub use setup::{TestClient, TestSetup, TestSetupBuilder};
