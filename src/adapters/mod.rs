pub mod email;
pub mod json;
pub mod mock;
pub mod security;
pub mod system_clock;

pub use system_clock::SystemClock;
