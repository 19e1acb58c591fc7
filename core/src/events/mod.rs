pub mod bus;
pub mod handler;
pub mod signal;

pub use bus::{EventSource, SignalBus, SignalCallback, Subscription};
pub use handler::SignalHandler;
pub use signal::GameSignal;
