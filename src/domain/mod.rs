//! Domain value types shared by the pipeline, the store, and the gateway.

mod event;
mod leader;


pub use event::Event;
pub use leader::{Leader, Leaders};
