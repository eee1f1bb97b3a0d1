pub mod event_bus;

pub use event_bus::{BlockingEventHandler, Event, EventBus, EventHandler, Topic};
