use h224::pdu::{H224ClientId, H224Frame};

/// An application carried over H.224 (for example H.281 far end camera control).
///
/// Only `client_id` is required; the callbacks default to doing nothing.
pub trait H224Client {
    /// Identification this client registers and sends under.
    fn client_id(&self) -> H224ClientId;

    /// Whether this client advertises extra capabilities in the client list.
    fn has_extra_capabilities(&self) -> bool {
        false
    }

    /// Payload of this client's extra capabilities message, if it has one to send.
    fn extra_capabilities(&self) -> Option<Vec<u8>> {
        None
    }

    /// Called with every broadcast frame addressed to this client.
    fn on_received_message(&mut self, _frame: &H224Frame) {}

    /// Called when the remote CME sends extra capabilities for this client.
    fn on_received_extra_capabilities(&mut self, _capabilities: &[u8]) {}

    /// Called whenever the remote client list changes what is known about the
    /// remote counterpart of this client.
    fn on_remote_client_availability(&mut self, _available: bool, _has_extra_capabilities: bool) {}
}
