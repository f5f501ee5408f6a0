use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub container: String,
    pub like_control: String,
    pub message_id_attr: String,
    pub like_endpoint: String,
    pub outline_class: String,
    pub filled_class: String,
    pub compose_form: String,
    pub modal: String,
    pub modal_open_class: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            container: ".container".to_string(),
            like_control: ".like".to_string(),
            message_id_attr: "data".to_string(),
            like_endpoint: "/messages/{id}/like".to_string(),
            outline_class: "far".to_string(),
            filled_class: "fas".to_string(),
            compose_form: ".add-message".to_string(),
            modal: "#newMessageModal".to_string(),
            modal_open_class: "show".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Handler {
    LikeToggle(LikeToggle),
    ComposeModal(ComposeModal),
}

#[derive(Debug, Clone)]
pub(crate) struct LikeToggle {
    pub(crate) endpoint: String,
    pub(crate) message_id_attr: String,
    pub(crate) outline_class: String,
    pub(crate) filled_class: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ComposeModal {
    pub(crate) modal: String,
    pub(crate) modal_open_class: String,
}
