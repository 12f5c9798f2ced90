//! Throttle service client.

use crossbeam::channel::Receiver;
use mc2_protocol::{Message, ThrottleCallback, ThrottleCommand, ThrottleMessage, check_position};
use mc2_throttle_scale::ThrottleScale;
use tracing::{debug, trace};

use crate::config::ThrottleConfig;
use crate::connection::ServiceConnection;
use crate::event::{Subscribers, ThrottleEvent};
use crate::{MessageSink, ThrottleError, ThrottleResult};

/// Client of the throttle service.
///
/// Commands are dropped while the service is not connected. Incoming
/// callbacks are decoded and published to every subscriber.
#[derive(Debug)]
pub struct Throttle<S> {
    connection: ServiceConnection<S>,
    zero_position: i32,
    scale: Option<ThrottleScale>,
    last_step: Option<i32>,
    subscribers: Subscribers<ThrottleEvent>,
}

impl<S: MessageSink> Throttle<S> {
    /// Creates a disconnected throttle client.
    ///
    /// `zero_position` is the lowest position the slider may rest at; it is
    /// sent to the service on every [`connect`](Self::connect).
    ///
    /// # Errors
    ///
    /// Returns a protocol error if `zero_position` is not in `0..=255`.
    pub fn new(sink: S, zero_position: i32) -> ThrottleResult<Self> {
        let zero_position = check_position(zero_position)?;
        Ok(Self {
            connection: ServiceConnection::new(
                sink,
                Message::new(ThrottleMessage::RegisterClient.code()),
                Message::new(ThrottleMessage::UnregisterClient.code()),
            ),
            zero_position,
            scale: None,
            last_step: None,
            subscribers: Subscribers::new(),
        })
    }

    /// Creates a throttle client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation error of `config`.
    pub fn from_config(sink: S, config: &ThrottleConfig) -> ThrottleResult<Self> {
        let scale = config.validate()?;
        let mut throttle = Self::new(sink, config.zero_position)?;
        throttle.set_scale(scale);
        Ok(throttle)
    }

    /// Attaches a scale used by [`move_to_step`](Self::move_to_step) and step events.
    pub fn with_scale(mut self, scale: ThrottleScale) -> Self {
        self.set_scale(Some(scale));
        self
    }

    /// Replaces the scale. The step tracking restarts.
    pub fn set_scale(&mut self, scale: Option<ThrottleScale>) {
        self.scale = scale;
        self.last_step = None;
    }

    /// The attached scale, if any.
    pub fn scale(&self) -> Option<&ThrottleScale> {
        self.scale.as_ref()
    }

    /// The zero position sent on connect.
    pub fn zero_position(&self) -> i32 {
        self.zero_position
    }

    /// The step of the last reported position, if a scale is attached.
    pub fn current_step(&self) -> Option<i32> {
        self.last_step
    }

    /// Returns `true` while registered with the service.
    pub fn is_connected(&self) -> bool {
        self.connection.is_bound()
    }

    /// The underlying transport.
    pub fn sink(&self) -> &S {
        self.connection.sink()
    }

    /// Registers with the service and sends the zero position.
    ///
    /// # Errors
    ///
    /// Propagates transport errors. The client is left disconnected if
    /// either message could not be sent.
    pub fn connect(&mut self) -> ThrottleResult<()> {
        self.connection.connect()?;
        if let Err(e) = self.send(ThrottleCommand::SetZeroPosition(self.zero_position)) {
            self.connection.connection_lost();
            return Err(e);
        }
        Ok(())
    }

    /// Unregisters from the service.
    ///
    /// # Errors
    ///
    /// Propagates transport errors.
    pub fn disconnect(&mut self) -> ThrottleResult<()> {
        self.connection.disconnect()
    }

    /// Marks the service as gone, e.g. after the remote process died.
    pub fn connection_lost(&mut self) {
        self.connection.connection_lost();
    }

    /// Moves the slider to a raw position. Returns whether the command was sent.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if `position` is not in `0..=255`, even when
    /// disconnected, and propagates transport errors.
    pub fn move_throttle(&mut self, position: i32) -> ThrottleResult<bool> {
        let sent = self.send(ThrottleCommand::MoveTo(position))?;
        if sent {
            debug!("Move throttle to {}", position);
        }
        Ok(sent)
    }

    /// Moves the slider to the position of `step` on the attached scale.
    ///
    /// # Errors
    ///
    /// - [`ThrottleError::NoScale`] without a scale
    /// - a scale error if `step` is out of range
    /// - transport errors
    pub fn move_to_step(&mut self, step: i32) -> ThrottleResult<bool> {
        let scale = self.scale.as_ref().ok_or(ThrottleError::NoScale)?;
        let position = scale.step_to_position(step)?;
        debug!(step, position, "Move throttle to step");
        self.move_throttle(position)
    }

    /// Tells the service how many slider steps, including zero, to use.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if `count` is not in `0..=127`, and
    /// propagates transport errors.
    pub fn set_step_count(&mut self, count: i32) -> ThrottleResult<bool> {
        self.send(ThrottleCommand::SetStepCount(count))
    }

    /// Returns a receiver for future throttle events.
    ///
    /// The receiver buffers up to [`SUBSCRIBER_CAPACITY`](crate::SUBSCRIBER_CAPACITY)
    /// events; newer events are dropped for it until it is read.
    pub fn subscribe(&mut self) -> Receiver<ThrottleEvent> {
        self.subscribers.subscribe()
    }

    /// Processes a message from the service.
    ///
    /// Callbacks are published to subscribers and returned. With a scale
    /// attached, a position change that crosses into another step also
    /// publishes [`ThrottleEvent::StepChanged`] after the position event.
    /// Anything that is not a throttle callback is ignored.
    pub fn handle_message(&mut self, message: &Message) -> Option<ThrottleEvent> {
        let callback = match ThrottleCallback::try_from(message) {
            Ok(callback) => callback,
            Err(e) => {
                trace!(what = message.what, "Ignoring message: {}", e);
                return None;
            }
        };

        let event = ThrottleEvent::from(callback);
        self.subscribers.publish(event);

        if let ThrottleCallback::PositionChanged(position) = callback {
            self.track_step(position);
        }

        Some(event)
    }

    fn track_step(&mut self, position: i32) {
        let Some(scale) = &self.scale else {
            return;
        };

        let step = scale.position_to_step(position);
        if self.last_step != Some(step) {
            trace!(position, step, "Throttle step changed");
            self.last_step = Some(step);
            self.subscribers.publish(ThrottleEvent::StepChanged(step));
        }
    }

    fn send(&mut self, command: ThrottleCommand) -> ThrottleResult<bool> {
        let message = command.encode()?;
        self.connection.send(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc2_protocol::ProtocolError;
    use mc2_throttle_scale::{ScaleError, ThrottleScaleConfig};
    use tracing_test::traced_test;

    fn must<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    fn scaled_throttle() -> Throttle<Vec<Message>> {
        let scale = must(ThrottleScale::new(10, 5));
        must(Throttle::new(Vec::<Message>::new(), 10)).with_scale(scale)
    }

    #[test]
    fn test_new_rejects_bad_zero_position() {
        let result = Throttle::new(Vec::<Message>::new(), 256);
        assert!(matches!(
            result,
            Err(ThrottleError::Protocol(ProtocolError::PositionOutOfRange(
                256
            )))
        ));
    }

    #[test]
    fn test_connect_sends_register_and_zero_position() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 12)?;
        throttle.connect()?;
        assert!(throttle.is_connected());
        assert_eq!(
            throttle.sink(),
            &vec![Message::new(1), Message::with_arg(4, 12)]
        );
        Ok(())
    }

    /// Accepts the first `remaining` messages, then fails.
    struct FlakySink {
        sent: Vec<Message>,
        remaining: usize,
    }

    impl MessageSink for FlakySink {
        fn send(&mut self, message: Message) -> ThrottleResult<()> {
            if self.remaining == 0 {
                return Err(ThrottleError::SendFailed("remote gone".to_string()));
            }
            self.remaining -= 1;
            self.sent.push(message);
            Ok(())
        }
    }

    #[test]
    fn test_connect_failing_zero_position_stays_disconnected() -> Result<(), Box<dyn std::error::Error>> {
        let sink = FlakySink {
            sent: Vec::new(),
            remaining: 1,
        };
        let mut throttle = Throttle::new(sink, 12)?;

        let result = throttle.connect();

        assert!(matches!(result, Err(ThrottleError::SendFailed(_))));
        assert!(!throttle.is_connected());
        assert_eq!(throttle.sink().sent, vec![Message::new(1)]);
        assert!(!throttle.move_throttle(100)?);
        Ok(())
    }

    #[test]
    fn test_idle_subscriber_does_not_grow_unbounded() {
        let mut throttle = scaled_throttle();
        let idle = throttle.subscribe();
        let active = throttle.subscribe();

        for i in 0..20_000 {
            throttle.handle_message(&Message::with_arg(5, i % 256));
            while active.try_recv().is_ok() {}
        }

        assert!(idle.len() <= crate::SUBSCRIBER_CAPACITY);
        throttle.handle_message(&Message::new(ThrottleMessage::ButtonDown.code()));
        assert_eq!(active.try_recv(), Ok(ThrottleEvent::ButtonDown));
    }

    #[test]
    fn test_move_throttle_while_connected() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        throttle.connect()?;
        assert!(throttle.move_throttle(100)?);
        assert_eq!(throttle.sink().last(), Some(&Message::with_arg(3, 100)));
        Ok(())
    }

    #[test]
    fn test_move_throttle_while_disconnected_is_noop() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        assert!(!throttle.move_throttle(100)?);
        assert!(throttle.sink().is_empty());
        Ok(())
    }

    #[test]
    fn test_move_throttle_validates_position() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        assert!(throttle.move_throttle(-1).is_err());
        throttle.connect()?;
        assert!(matches!(
            throttle.move_throttle(256),
            Err(ThrottleError::Protocol(ProtocolError::PositionOutOfRange(
                256
            )))
        ));
        Ok(())
    }

    #[test]
    fn test_move_to_step_uses_scale() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = scaled_throttle();
        throttle.connect()?;
        assert!(throttle.move_to_step(2)?);
        assert_eq!(throttle.sink().last(), Some(&Message::with_arg(3, 108)));
        assert!(throttle.move_to_step(0)?);
        assert_eq!(throttle.sink().last(), Some(&Message::with_arg(3, 0)));
        Ok(())
    }

    #[test]
    fn test_move_to_step_out_of_range() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = scaled_throttle();
        throttle.connect()?;
        assert!(matches!(
            throttle.move_to_step(5),
            Err(ThrottleError::Scale(ScaleError::StepOutOfRange { .. }))
        ));
        assert!(matches!(
            throttle.move_to_step(-1),
            Err(ThrottleError::Scale(ScaleError::StepOutOfRange { .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_move_to_step_without_scale() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        assert!(matches!(
            throttle.move_to_step(1),
            Err(ThrottleError::NoScale)
        ));
        Ok(())
    }

    #[test]
    fn test_set_step_count() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        throttle.connect()?;
        assert!(throttle.set_step_count(28)?);
        assert_eq!(throttle.sink().last(), Some(&Message::with_arg(8, 28)));
        assert!(throttle.set_step_count(128).is_err());
        Ok(())
    }

    #[test]
    fn test_disconnect_unregisters() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        throttle.connect()?;
        throttle.disconnect()?;
        assert!(!throttle.is_connected());
        assert_eq!(throttle.sink().last(), Some(&Message::new(2)));
        Ok(())
    }

    #[test]
    fn test_connection_lost_stops_commands() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        throttle.connect()?;
        throttle.connection_lost();
        assert!(!throttle.move_throttle(50)?);
        assert_eq!(throttle.sink().len(), 2);
        Ok(())
    }

    #[test]
    fn test_handle_button_messages() {
        let mut throttle = scaled_throttle();
        let events = throttle.subscribe();

        assert_eq!(
            throttle.handle_message(&Message::new(6)),
            Some(ThrottleEvent::ButtonDown)
        );
        assert_eq!(
            throttle.handle_message(&Message::new(7)),
            Some(ThrottleEvent::ButtonUp)
        );

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![ThrottleEvent::ButtonDown, ThrottleEvent::ButtonUp]
        );
    }

    #[test]
    fn test_position_changes_report_steps_once() {
        let mut throttle = scaled_throttle();
        let events = throttle.subscribe();

        for position in [0, 30, 60, 70, 108, 109, 255] {
            throttle.handle_message(&Message::with_arg(5, position));
        }

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                ThrottleEvent::PositionChanged(0),
                ThrottleEvent::StepChanged(0),
                ThrottleEvent::PositionChanged(30),
                ThrottleEvent::PositionChanged(60),
                ThrottleEvent::StepChanged(1),
                ThrottleEvent::PositionChanged(70),
                ThrottleEvent::PositionChanged(108),
                ThrottleEvent::PositionChanged(109),
                ThrottleEvent::StepChanged(2),
                ThrottleEvent::PositionChanged(255),
                ThrottleEvent::StepChanged(4),
            ]
        );
        assert_eq!(throttle.current_step(), Some(4));
    }

    #[test]
    fn test_position_changes_without_scale() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        let events = throttle.subscribe();
        throttle.handle_message(&Message::with_arg(5, 200));
        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(received, vec![ThrottleEvent::PositionChanged(200)]);
        assert_eq!(throttle.current_step(), None);
        Ok(())
    }

    #[test]
    fn test_set_scale_resets_step_tracking() {
        let mut throttle = scaled_throttle();
        throttle.handle_message(&Message::with_arg(5, 120));
        assert_eq!(throttle.current_step(), Some(2));
        throttle.set_scale(None);
        assert_eq!(throttle.current_step(), None);
        assert!(throttle.scale().is_none());
    }

    #[traced_test]
    #[test]
    fn test_unknown_messages_are_ignored() {
        let mut throttle = scaled_throttle();
        let events = throttle.subscribe();

        assert_eq!(throttle.handle_message(&Message::new(42)), None);
        assert_eq!(throttle.handle_message(&Message::with_arg(3, 10)), None);
        assert!(events.try_recv().is_err());
        assert!(logs_contain("Ignoring message"));
    }

    #[traced_test]
    #[test]
    fn test_move_is_logged() -> Result<(), Box<dyn std::error::Error>> {
        let mut throttle = Throttle::new(Vec::<Message>::new(), 0)?;
        throttle.connect()?;
        throttle.move_throttle(42)?;
        assert!(logs_contain("Move throttle to 42"));
        Ok(())
    }

    #[test]
    fn test_from_config() -> Result<(), Box<dyn std::error::Error>> {
        let config = ThrottleConfig {
            zero_position: 10,
            scale: Some(ThrottleScaleConfig {
                zero_offset: 10,
                step_count: 5,
            }),
        };
        let throttle = Throttle::from_config(Vec::<Message>::new(), &config)?;
        assert_eq!(throttle.zero_position(), 10);
        assert_eq!(
            throttle.scale().map(ThrottleScale::lookup),
            Some(&[0, 59, 108, 157, 206][..])
        );
        Ok(())
    }

    #[test]
    fn test_from_config_rejects_invalid_scale() {
        let config = ThrottleConfig {
            zero_position: 0,
            scale: Some(ThrottleScaleConfig {
                zero_offset: 250,
                step_count: 10,
            }),
        };
        assert!(matches!(
            Throttle::from_config(Vec::<Message>::new(), &config),
            Err(ThrottleError::Scale(ScaleError::TooManySteps { .. }))
        ));
    }
}
