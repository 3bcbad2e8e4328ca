use std::sync::mpsc::{self, Receiver, Sender};

use log::debug;

/// Notifications the graph engine sends to its host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    NavigateTo {
        node_id: String,
    },
    /// A ghost was converted: `link_to` names the existing person it was
    /// merged into, or is `None` when a new contact should be created.
    ContactRequest {
        ghost_name: String,
        link_to: Option<String>,
    },
    RelationshipConfirmed {
        edge_id: String,
    },
}

#[derive(Clone, Debug)]
pub struct EventSink {
    tx: Option<Sender<GraphEvent>>,
}

impl EventSink {
    pub fn channel() -> (Self, Receiver<GraphEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: GraphEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(error) = tx.send(event) {
            debug!("graph event dropped, host receiver is gone: {:?}", error.0);
        }
    }
}
