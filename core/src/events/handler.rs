use super::GameSignal;

/// Anything that reacts to game signals.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &GameSignal);
}
