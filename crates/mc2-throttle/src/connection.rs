//! Registration state with an input service.

use tracing::{debug, warn};

use crate::{Message, MessageSink, ThrottleResult};

/// Tracks whether a client is registered with a service and gates sends on it.
///
/// While unbound, outgoing messages are dropped so that applications keep
/// working on devices without the vendor service installed.
#[derive(Debug)]
pub struct ServiceConnection<S> {
    sink: S,
    register: Message,
    unregister: Message,
    bound: bool,
}

impl<S: MessageSink> ServiceConnection<S> {
    /// Creates an unbound connection using the service's register/unregister messages.
    pub fn new(sink: S, register: Message, unregister: Message) -> Self {
        Self {
            sink,
            register,
            unregister,
            bound: false,
        }
    }

    /// Returns `true` while registered with the service.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Registers with the service.
    ///
    /// # Errors
    ///
    /// Propagates the sink error; the connection stays unbound.
    pub fn connect(&mut self) -> ThrottleResult<()> {
        self.deliver(self.register)?;
        self.bound = true;
        debug!("Service connected");
        Ok(())
    }

    /// Unregisters from the service. Does nothing if not bound.
    ///
    /// # Errors
    ///
    /// Propagates the sink error. The connection is unbound either way.
    pub fn disconnect(&mut self) -> ThrottleResult<()> {
        if !self.bound {
            return Ok(());
        }
        self.bound = false;
        debug!("Service disconnected");
        self.deliver(self.unregister)
    }

    /// Marks the service as gone without sending anything.
    pub fn connection_lost(&mut self) {
        if self.bound {
            warn!("Service connection lost");
        }
        self.bound = false;
    }

    /// Sends `message` if bound. Returns whether the message was sent.
    ///
    /// # Errors
    ///
    /// Propagates the sink error.
    pub fn send(&mut self, message: Message) -> ThrottleResult<bool> {
        if !self.bound {
            debug!(what = message.what, "Service not bound, dropping message");
            return Ok(false);
        }
        self.deliver(message)?;
        Ok(true)
    }

    /// The underlying transport.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn deliver(&mut self, message: Message) -> ThrottleResult<()> {
        self.sink.send(message).inspect_err(|e| {
            warn!(what = message.what, "Failed to send message: {}", e);
        })
    }
}
