//! The writer contract (ยง4.3): a scoped output sink opened once,
//! written to as properties settle, and finalized exactly once.

pub mod console;
pub mod noop;
pub mod traits;

pub use console::ConsoleWriter;
pub use noop::NoopWriter;
pub use traits::Writer;
