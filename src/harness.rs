use super::*;

#[derive(Debug)]
pub struct Harness {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) document_url: String,
    pub(crate) pending: Vec<InFlightRequest>,
    pub(crate) next_request_id: i64,
    pub(crate) issued_requests: Vec<String>,
    pub(crate) navigations: Vec<String>,
    pub(crate) warnings: Vec<String>,
    pub(crate) trace: bool,
    pub(crate) trace_logs: Vec<String>,
    pub(crate) trace_log_limit: usize,
    pub(crate) trace_to_stderr: bool,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_url("about:blank", html)
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        let dom = parse_document(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            document_url: url.to_string(),
            pending: Vec::new(),
            next_request_id: 1,
            issued_requests: Vec::new(),
            navigations: Vec::new(),
            warnings: Vec::new(),
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: true,
        })
    }

    pub fn document_url(&self) -> &str {
        &self.document_url
    }

    pub fn install_like_toggle(&mut self, config: &FeedConfig) -> Result<()> {
        if !config.like_endpoint.contains("{id}") {
            return Err(Error::InvalidConfig(format!(
                "like endpoint must contain an {{id}} placeholder: {}",
                config.like_endpoint
            )));
        }

        let container = self.select_one(&config.container)?;
        parse_selector_groups(&config.like_control)?;

        self.listeners.add(
            container,
            "click".to_string(),
            Listener {
                delegate: Some(config.like_control.clone()),
                handler: Handler::LikeToggle(LikeToggle {
                    endpoint: config.like_endpoint.clone(),
                    message_id_attr: config.message_id_attr.clone(),
                    outline_class: config.outline_class.clone(),
                    filled_class: config.filled_class.clone(),
                }),
            },
        );
        self.trace_line(format!(
            "[install] like_toggle container={} delegate={}",
            config.container, config.like_control
        ));
        Ok(())
    }

    pub fn install_compose_modal(&mut self, config: &FeedConfig) -> Result<()> {
        let forms = self.dom.query_selector_all(&config.compose_form)?;
        if forms.is_empty() {
            return Err(Error::SelectorNotFound(config.compose_form.clone()));
        }
        parse_selector_groups(&config.modal)?;

        for form in forms {
            self.listeners.add(
                form,
                "submit".to_string(),
                Listener {
                    delegate: None,
                    handler: Handler::ComposeModal(ComposeModal {
                        modal: config.modal.clone(),
                        modal_open_class: config.modal_open_class.clone(),
                    }),
                },
            );
        }
        self.trace_line(format!(
            "[install] compose_modal form={} modal={}",
            config.compose_form, config.modal
        ));
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || self.click_node(target))
    }

    fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }

        let click_outcome = self.dispatch_event(target, "click")?;
        if click_outcome.default_prevented {
            return Ok(());
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.dom.closest(target, "form")? {
                self.submit_form(form)?;
            }
            return Ok(());
        }

        if self.dom.tag_name(target) == Some("a") {
            let href = self
                .dom
                .attr(target, "href")
                .filter(|href| !href.is_empty())
                .map(str::to_string);
            if let Some(href) = href {
                self.trace_line(format!("[nav] follow {href}"));
                self.navigations.push(href);
            }
        }

        Ok(())
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;

        let form = if self
            .dom
            .tag_name(target)
            .map(|tag| tag.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            Some(target)
        } else {
            self.dom.closest(target, "form")?
        };

        let Some(form) = form else {
            return Ok(());
        };
        stacker::grow(32 * 1024 * 1024, || self.submit_form(form))
    }

    fn submit_form(&mut self, form: NodeId) -> Result<()> {
        let submit_outcome = self.dispatch_event(form, "submit")?;
        if !submit_outcome.default_prevented {
            let destination = self
                .dom
                .attr(form, "action")
                .filter(|action| !action.is_empty())
                .unwrap_or(self.document_url.as_str())
                .to_string();
            self.trace_line(format!("[nav] submit {destination}"));
            self.navigations.push(destination);
        }
        Ok(())
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(32 * 1024 * 1024, || {
            self.dispatch_event(target, event).map(|_| ())
        })
    }

    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        // Target phase, then bubble phase along the ancestor path.
        for node in path {
            event.current_target = node;
            self.invoke_listeners(node, &mut event)?;
            if event.propagation_stopped {
                self.trace_line(format!(
                    "[event] {} done reason=propagation_stopped default_prevented={}",
                    event.event_type, event.default_prevented
                ));
                return Ok(event);
            }
        }

        self.trace_line(format!(
            "[event] {} done reason=completed default_prevented={}",
            event.event_type, event.default_prevented
        ));
        Ok(event)
    }

    fn invoke_listeners(&mut self, node_id: NodeId, event: &mut EventState) -> Result<()> {
        let listeners = self.listeners.get(node_id, &event.event_type);
        for listener in listeners {
            if let Some(selector) = &listener.delegate {
                let hit = delegate_target(&self.dom, node_id, event.target, selector)?;
                if hit.is_none() {
                    continue;
                }
            }

            if self.trace {
                let target_label = self.dom.start_tag_snippet(event.target);
                let current_label = self.dom.start_tag_snippet(event.current_target);
                self.trace_line(format!(
                    "[event] {} target={} current={} default_prevented={}",
                    event.event_type, target_label, current_label, event.default_prevented
                ));
            }

            match &listener.handler {
                Handler::LikeToggle(handler) => self.run_like_toggle(handler, event)?,
                Handler::ComposeModal(handler) => self.run_compose_modal(handler, event)?,
            }

            if event.propagation_stopped {
                break;
            }
        }
        Ok(())
    }

    fn run_like_toggle(&mut self, handler: &LikeToggle, event: &mut EventState) -> Result<()> {
        event.default_prevented = true;

        // The toggle targets the clicked element itself, not the delegate
        // match, so the continuation captures the event target.
        let control = event.target;

        let Some(form) = self.dom.closest(control, "form")? else {
            self.warn("like control has no enclosing form; dropping click".to_string());
            return Ok(());
        };

        let message_id = self
            .dom
            .attr(form, &handler.message_id_attr)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let Some(message_id) = message_id else {
            self.warn(format!(
                "missing message id attribute '{}' on form; dropping like",
                handler.message_id_attr
            ));
            return Ok(());
        };

        let url = handler.endpoint.replace("{id}", &message_id);
        self.issue_request(
            "POST",
            url,
            CompletionAction::ToggleLikeIcon {
                control,
                outline: handler.outline_class.clone(),
                filled: handler.filled_class.clone(),
            },
        );
        Ok(())
    }

    fn run_compose_modal(&mut self, handler: &ComposeModal, event: &mut EventState) -> Result<()> {
        // Suppress the native submission and any outer submit handling.
        event.default_prevented = true;
        event.propagation_stopped = true;

        let Some(modal) = self.dom.query_selector(&handler.modal)? else {
            self.warn(format!("modal not found: {}", handler.modal));
            return Ok(());
        };

        let open = self.dom.class_toggle(modal, &handler.modal_open_class);
        self.trace_line(format!("[modal] {} open={open}", handler.modal));
        Ok(())
    }

    fn issue_request(&mut self, method: &str, url: String, action: CompletionAction) -> i64 {
        let id = self.next_request_id;
        self.next_request_id += 1;

        self.trace_line(format!("[net] issue id={id} {method} {url}"));
        self.issued_requests.push(format!("{method} {url}"));
        self.pending.push(InFlightRequest {
            id,
            method: method.to_string(),
            url,
            body: String::new(),
            action,
        });
        id
    }

    pub fn pending_requests(&self) -> Vec<PendingRequest> {
        self.pending
            .iter()
            .map(|request| PendingRequest {
                id: request.id,
                method: request.method.clone(),
                url: request.url.clone(),
                body: request.body.clone(),
            })
            .collect()
    }

    pub fn resolve_request(&mut self, id: i64, status: u16) -> Result<()> {
        let request = self.take_pending(id)?;
        self.complete_request(request, RequestOutcome::Status(status))
    }

    pub fn resolve_next(&mut self, status: u16) -> Result<()> {
        let request = self.take_oldest_pending()?;
        self.complete_request(request, RequestOutcome::Status(status))
    }

    pub fn resolve_all(&mut self, status: u16) -> Result<usize> {
        let drained: Vec<InFlightRequest> = std::mem::take(&mut self.pending);
        let count = drained.len();
        for request in drained {
            self.complete_request(request, RequestOutcome::Status(status))?;
        }
        Ok(count)
    }

    pub fn fail_request(&mut self, id: i64, reason: &str) -> Result<()> {
        let request = self.take_pending(id)?;
        self.complete_request(request, RequestOutcome::TransportError(reason.to_string()))
    }

    pub fn fail_next(&mut self, reason: &str) -> Result<()> {
        let request = self.take_oldest_pending()?;
        self.complete_request(request, RequestOutcome::TransportError(reason.to_string()))
    }

    fn take_pending(&mut self, id: i64) -> Result<InFlightRequest> {
        let index = self
            .pending
            .iter()
            .position(|request| request.id == id)
            .ok_or(Error::UnknownRequest(id))?;
        Ok(self.pending.remove(index))
    }

    fn take_oldest_pending(&mut self) -> Result<InFlightRequest> {
        if self.pending.is_empty() {
            return Err(Error::NoPendingRequest);
        }
        Ok(self.pending.remove(0))
    }

    fn complete_request(
        &mut self,
        request: InFlightRequest,
        outcome: RequestOutcome,
    ) -> Result<()> {
        match outcome {
            RequestOutcome::Status(status) if is_success_status(status) => {
                self.trace_line(format!(
                    "[net] resolve id={} status={status} {}",
                    request.id, request.url
                ));
                match request.action {
                    CompletionAction::ToggleLikeIcon {
                        control,
                        outline,
                        filled,
                    } => {
                        self.dom.class_toggle(control, &outline);
                        self.dom.class_toggle(control, &filled);
                        self.trace_line(format!(
                            "[like] toggle {}",
                            self.dom.start_tag_snippet(control)
                        ));
                    }
                }
            }
            RequestOutcome::Status(status) => {
                self.warn(format!(
                    "like request {} failed: status {status}",
                    request.url
                ));
            }
            RequestOutcome::TransportError(reason) => {
                self.warn(format!("like request {} failed: {reason}", request.url));
            }
        }
        Ok(())
    }

    pub fn append_html(&mut self, selector: &str, html: &str) -> Result<()> {
        let parent = self.select_one(selector)?;
        parse_fragment_into(&mut self.dom, parent, html)
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.class_contains(target, class_name))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name).map(str::to_string))
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(normalize_ws(&self.dom.text_content(target)))
    }

    pub fn query_count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn issued_requests(&self) -> &[String] {
        &self.issued_requests
    }

    pub fn take_issued_requests(&mut self) -> Vec<String> {
        std::mem::take(&mut self.issued_requests)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = normalize_ws(&self.dom.text_content(target));
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.start_tag_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.class_contains(target, class_name) {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class '{class_name}' present"),
                actual: self.dom.attr(target, "class").unwrap_or("").to_string(),
                dom_snippet: self.dom.start_tag_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_lacks_class(&self, selector: &str, class_name: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.class_contains(target, class_name) {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class '{class_name}' absent"),
                actual: self.dom.attr(target, "class").unwrap_or("").to_string(),
                dom_snippet: self.dom.start_tag_snippet(target),
            });
        }
        Ok(())
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn warn(&mut self, message: String) {
        tracing::warn!(target: "feed_harness", "{message}");
        self.trace_line(format!("[warn] {message}"));
        self.warnings.push(message);
    }

    fn trace_line(&mut self, line: String) {
        tracing::debug!(target: "feed_harness", "{line}");
        if !self.trace {
            return;
        }
        if self.trace_to_stderr {
            eprintln!("{line}");
        }
        self.trace_logs.push(line);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }
}

fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node_id) else {
        return false;
    };
    match tag {
        "button" => !matches!(dom.attr(node_id, "type"), Some("button") | Some("reset")),
        "input" => matches!(dom.attr(node_id, "type"), Some("submit") | Some("image")),
        _ => false,
    }
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
