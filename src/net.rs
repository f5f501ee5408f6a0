use super::*;

#[derive(Debug, Clone)]
pub(crate) enum CompletionAction {
    ToggleLikeIcon {
        control: NodeId,
        outline: String,
        filled: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct InFlightRequest {
    pub(crate) id: i64,
    pub(crate) method: String,
    pub(crate) url: String,
    pub(crate) body: String,
    pub(crate) action: CompletionAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: i64,
    pub method: String,
    pub url: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub(crate) enum RequestOutcome {
    Status(u16),
    TransportError(String),
}

pub(crate) fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}
