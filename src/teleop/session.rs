//! A teleoperation session bound to a host publish sink.
//!
//! The session owns a [`CommandMapper`], keeps its publish topic advertised
//! on the sink, publishes every emitted command, and unadvertises the topic
//! when dropped.

use serde::Serialize;

use crate::teleop::command::CommandMessage;
use crate::teleop::key::KeyEvent;
use crate::teleop::traits::CommandMapper;

/// Publish side of the host extension API.
pub trait CommandSink {
    /// Announce that messages of `schema_name` will be published on `topic`.
    fn advertise(&mut self, topic: &str, schema_name: &str);

    /// Withdraw a previous advertisement.
    fn unadvertise(&mut self, topic: &str);

    /// Publish one message.
    fn publish<T: Serialize>(&mut self, topic: &str, message: &T);
}

/// Keyboard teleoperation session publishing to a [`CommandSink`].
pub struct TeleopSession<M: CommandMapper, S: CommandSink> {
    mapper: M,
    sink: S,
    topic: Option<String>,
}

impl<M: CommandMapper, S: CommandSink> TeleopSession<M, S> {
    /// Create a session, advertising `topic` if one is given.
    pub fn new(mapper: M, mut sink: S, topic: Option<String>) -> Self {
        if let Some(topic) = &topic {
            log::info!("Advertising {} on {}", M::Command::SCHEMA_NAME, topic);
            sink.advertise(topic, M::Command::SCHEMA_NAME);
        }
        Self {
            mapper,
            sink,
            topic,
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut M {
        &mut self.mapper
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Switch the publish topic, moving the advertisement.
    pub fn set_topic(&mut self, topic: Option<String>) {
        if self.topic == topic {
            return;
        }

        if let Some(previous) = self.topic.take() {
            log::info!("Unadvertising {}", previous);
            self.sink.unadvertise(&previous);
        }
        if let Some(topic) = &topic {
            log::info!("Advertising {} on {}", M::Command::SCHEMA_NAME, topic);
            self.sink.advertise(topic, M::Command::SCHEMA_NAME);
        }
        self.topic = topic;
    }

    /// Enable or disable key handling.
    ///
    /// Disabling keeps the held keys and does not publish a stop command.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.mapper.is_enabled() && !self.mapper.pressed_keys().is_empty() {
            log::warn!(
                "Teleop disabled while {} key(s) held; last command stays in effect",
                self.mapper.pressed_keys().len()
            );
        }
        self.mapper.set_enabled(enabled);
    }

    /// Feed one host key event and publish the resulting command, if any.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<M::Command> {
        let command = self.mapper.on_key_event(event)?;
        match &self.topic {
            Some(topic) => self.sink.publish(topic, &command),
            None => log::trace!("No topic selected, command not published"),
        }
        Some(command)
    }
}

impl<M: CommandMapper, S: CommandSink> Drop for TeleopSession<M, S> {
    fn drop(&mut self) {
        if let Some(topic) = self.topic.take() {
            log::info!("Unadvertising {}", topic);
            self.sink.unadvertise(&topic);
        }
    }
}
