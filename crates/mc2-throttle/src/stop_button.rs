//! Stop button service client.

use crossbeam::channel::Receiver;
use mc2_protocol::{Message, StopButtonCallback, StopButtonMessage};
use tracing::trace;

use crate::connection::ServiceConnection;
use crate::event::{StopButtonEvent, Subscribers};
use crate::{MessageSink, ThrottleResult};

/// Client of the stop button service.
#[derive(Debug)]
pub struct StopButton<S> {
    connection: ServiceConnection<S>,
    subscribers: Subscribers<StopButtonEvent>,
}

impl<S: MessageSink> StopButton<S> {
    /// Creates a disconnected stop button client.
    pub fn new(sink: S) -> Self {
        Self {
            connection: ServiceConnection::new(
                sink,
                Message::new(StopButtonMessage::RegisterClient.code()),
                Message::new(StopButtonMessage::UnregisterClient.code()),
            ),
            subscribers: Subscribers::new(),
        }
    }

    /// Returns `true` while registered with the service.
    pub fn is_connected(&self) -> bool {
        self.connection.is_bound()
    }

    /// The underlying transport.
    pub fn sink(&self) -> &S {
        self.connection.sink()
    }

    /// Registers with the service.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn connect(&mut self) -> ThrottleResult<()> {
        self.connection.connect()
    }

    /// Unregisters from the service.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn disconnect(&mut self) -> ThrottleResult<()> {
        self.connection.disconnect()
    }

    /// Marks the service as gone.
    pub fn connection_lost(&mut self) {
        self.connection.connection_lost();
    }

    /// Returns a receiver for future stop button events, buffered like
    /// [`Throttle::subscribe`](crate::Throttle::subscribe).
    pub fn subscribe(&mut self) -> Receiver<StopButtonEvent> {
        self.subscribers.subscribe()
    }

    /// Processes a message from the service, publishing and returning stop
    /// button callbacks. Other messages are ignored.
    pub fn handle_message(&mut self, message: &Message) -> Option<StopButtonEvent> {
        match StopButtonCallback::try_from(message) {
            Ok(callback) => {
                let event = StopButtonEvent::from(callback);
                self.subscribers.publish(event);
                Some(event)
            }
            Err(e) => {
                trace!(what = message.what, "Ignoring message: {}", e);
                None
            }
        }
    }
}
