//! Event types and the bus that carries them between threads.

pub mod bus;
pub mod types;

pub use bus::{EventBus, EventPublisher};
pub use types::OverlayEvent;
