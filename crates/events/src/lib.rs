//! Ledger events and in-process signalling.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod signal;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use signal::{SignalBus, UiSignal};
