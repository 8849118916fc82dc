//! Simulated venue session used by the demo binaries and integration
//! tests. Real connectivity lives outside this crate behind the
//! `OrderSession` trait.

mod session;

pub use session::{SimOrder, SimSession};
