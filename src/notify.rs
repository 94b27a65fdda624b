use std::sync::mpsc::{channel, Receiver, Sender};

/// Observable values of [`crate::UsageModel`]. A change event carries only the
/// name; subscribers read the new value from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    FilteredNames,
    Target,
    CpuPercent,
    CpuTier,
    MemoryMb,
    MemoryTier,
    Found,
    State,
}

/// Fans change events out to every live subscriber.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Vec<Sender<Property>>,
}

impl ChangeNotifier {
    pub fn subscribe(&mut self) -> Receiver<Property> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// Subscribers whose receiver was dropped are forgotten.
    pub fn notify(&mut self, property: Property) {
        self.subscribers.retain(|tx| tx.send(property).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
