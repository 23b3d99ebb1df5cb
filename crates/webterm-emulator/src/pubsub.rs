//! Minimal topic-based publish/subscribe.

use std::collections::HashMap;
use std::fmt;

use tracing::warn;

/// Callback registered for a topic.
pub type Subscriber<T> = Box<dyn FnMut(&T) -> anyhow::Result<()>>;

/// Topic registry.
///
/// Subscribers run in subscription order. A failing subscriber is logged and
/// does not prevent the remaining subscribers from running.
pub struct PubSub<T> {
    topics: HashMap<String, Vec<Subscriber<T>>>,
}

impl<T> Default for PubSub<T> {
    fn default() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }
}

impl<T> fmt::Debug for PubSub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<&str, usize> = self
            .topics
            .iter()
            .map(|(topic, subscribers)| (topic.as_str(), subscribers.len()))
            .collect();
        f.debug_struct("PubSub").field("topics", &counts).finish()
    }
}

impl<T> PubSub<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `topic`.
    pub fn subscribe<F>(&mut self, topic: impl Into<String>, callback: F)
    where
        F: FnMut(&T) -> anyhow::Result<()> + 'static,
    {
        self.topics
            .entry(topic.into())
            .or_default()
            .push(Box::new(callback));
    }

    /// Remove every subscriber of `topic`.
    pub fn unsubscribe_all(&mut self, topic: &str) {
        self.topics.remove(topic);
    }

    /// Number of subscribers for `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Call every subscriber of `topic` with `value`, then `final_callback`.
    ///
    /// Returns the number of subscribers that succeeded.
    pub fn publish(
        &mut self,
        topic: &str,
        value: &T,
        final_callback: Option<&mut dyn FnMut(&T)>,
    ) -> usize {
        let mut succeeded = 0;
        if let Some(subscribers) = self.topics.get_mut(topic) {
            for (index, subscriber) in subscribers.iter_mut().enumerate() {
                match subscriber(value) {
                    Ok(()) => succeeded += 1,
                    Err(e) => warn!(topic, index, error = %e, "subscriber failed"),
                }
            }
        }
        if let Some(callback) = final_callback {
            callback(value);
        }
        succeeded
    }
}
