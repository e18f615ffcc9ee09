use crossbeam_channel::{Receiver, Sender, unbounded};
use estatevision_core::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Graph lifecycle
    AssetInspected {
        asset_id: String,
    },
    GraphRebuilt {
        depth: u8,
        node_count: usize,
        edge_count: usize,
        dangling_edges: usize,
    },
    LayoutCompleted {
        spacing: f32,
        iterations: usize,
    },
    /// The drawing surface was repainted.
    Rendered,

    // Interaction
    NodeSelected {
        id: NodeId,
    },
    NodeMoved {
        id: NodeId,
        x: f32,
        y: f32,
    },
    ZoomChanged {
        scale: f32,
    },
    ViewReset,
    ViewChanged {
        title: String,
    },

    // Host
    ImageExported {
        byte_len: usize,
    },
    /// The inspector asks its host to unmount it.
    CloseRequested,
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Drain every pending event without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }

    /// Dispatch all pending events to a listener.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Implemented by hosts that react to inspector notifications.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let receiver = bus.receiver();

        sender
            .send(Event::NodeSelected {
                id: NodeId::from("owner-1"),
            })
            .unwrap();

        match receiver.recv().unwrap() {
            Event::NodeSelected { id } => assert_eq!(id.as_str(), "owner-1"),
            other => panic!("Expected NodeSelected, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_to_listener_preserves_order() {
        struct Recorder(Vec<String>);
        impl EventListener for Recorder {
            fn handle_event(&mut self, event: &Event) {
                self.0.push(format!("{event:?}"));
            }
        }

        let bus = EventBus::new();
        bus.publish(Event::ViewReset);
        bus.publish(Event::ZoomChanged { scale: 1.1 });
        bus.publish(Event::CloseRequested);

        let mut recorder = Recorder(Vec::new());
        bus.dispatch_to(&mut recorder);

        assert_eq!(recorder.0.len(), 3);
        assert!(recorder.0[0].starts_with("ViewReset"));
        assert!(recorder.0[2].starts_with("CloseRequested"));
        assert!(bus.drain().is_empty());
    }
}
