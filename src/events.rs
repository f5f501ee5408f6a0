use super::*;

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    // Delegated listeners fire only when the event target sits under a
    // descendant of the binding node matching this selector.
    pub(crate) delegate: Option<String>,
    pub(crate) handler: Handler,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: String, listener: Listener) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event)
            .or_default()
            .push(listener);
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

pub(crate) fn delegate_target(
    dom: &Dom,
    binding_node: NodeId,
    target: NodeId,
    selector: &str,
) -> Result<Option<NodeId>> {
    let Some(hit) = dom.closest(target, selector)? else {
        return Ok(None);
    };

    // The match must sit strictly inside the binding node.
    let mut cursor = dom.parent(hit);
    while let Some(node) = cursor {
        if node == binding_node {
            return Ok(Some(hit));
        }
        cursor = dom.parent(node);
    }
    Ok(None)
}
