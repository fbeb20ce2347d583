pub mod system_clock;

pub use system_clock::*;
