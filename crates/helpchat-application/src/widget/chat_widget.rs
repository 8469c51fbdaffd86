use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use helpchat_core::backend::{ConversationBackend, ThemeProvider, WebhookRequest};
use helpchat_core::command::{Dispatch, classify};
use helpchat_core::message::{Button, Message, ProfileUpdate, SendOrigin, reconcile};
use helpchat_core::modal::{
    ActiveModal, ModalError, ModalKind, SearchKind, SearchModal, TicketFormModal, TicketStatus,
};
use helpchat_core::session::{
    ConversationSession, FeedbackVote, WidgetState, WidgetStore, welcome_message,
};
use helpchat_core::theme::{Theme, ThemeSelector};
use helpchat_core::validation::{ValidationResult, validate_input};
use helpchat_core::{HelpchatError, Result};
use tracing::{debug, info, warn};

use super::attributes::{WidgetAttribute, WidgetAttributes};
use super::loading::LoadingGuard;

/// Appended when the backend or the admin API cannot be reached.
pub const CONNECTION_ERROR_TEXT: &str =
    "Sorry, I'm having trouble connecting to the server. Please try again later.";

/// What one user action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A message went to the backend; `appended` bot messages came back
    /// (the connection error counts as one).
    Sent { appended: usize },
    /// A modal opened to collect parameters; nothing was sent.
    ModalOpened(ModalKind),
    /// Local validation refused the input; a warning was appended.
    Rejected(String),
    /// `set theme <N>` was handled locally.
    ThemeCommand { switched: bool },
    /// Blank input.
    Ignored,
}

/// One embedded chat widget.
///
/// Owns the conversation session, the message history and the single modal
/// slot. Every method takes `&mut self`; the only suspension points are the
/// backend, theme and store calls.
pub struct ChatWidget {
    backend: Arc<dyn ConversationBackend>,
    themes: Arc<dyn ThemeProvider>,
    store: Arc<dyn WidgetStore>,
    attributes: WidgetAttributes,
    session: ConversationSession,
    state: WidgetState,
    theme: Theme,
    active_modal: Option<ActiveModal>,
    loading: Arc<AtomicBool>,
}

impl ChatWidget {
    /// Mounts a widget: restores or starts the session for `attributes.app_id`
    /// and resolves the theme.
    pub async fn mount(
        backend: Arc<dyn ConversationBackend>,
        themes: Arc<dyn ThemeProvider>,
        store: Arc<dyn WidgetStore>,
        attributes: WidgetAttributes,
    ) -> Result<Self> {
        let (session, state) = restore_session(store.as_ref(), &attributes.app_id).await?;
        let theme = resolve_theme(themes.as_ref(), attributes.theme.as_ref()).await;

        Ok(Self {
            backend,
            themes,
            store,
            attributes,
            session,
            state,
            theme,
            active_modal: None,
            loading: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Changes one attribute and re-mounts the affected parts.
    ///
    /// A new `app-id` switches to that app's session and history.
    pub async fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let attribute: WidgetAttribute = name
            .parse()
            .map_err(|_| HelpchatError::validation(format!("unknown widget attribute '{}'", name)))?;

        let mut attributes = self.attributes.clone();
        attributes.apply(attribute, value)?;

        match attribute {
            WidgetAttribute::Title => {}
            WidgetAttribute::AppId => {
                if attributes.app_id != self.attributes.app_id {
                    let (session, state) =
                        restore_session(self.store.as_ref(), &attributes.app_id).await?;
                    self.session = session;
                    self.state = state;
                    self.active_modal = None;
                }
            }
            WidgetAttribute::ThemeId => {
                self.theme = resolve_theme(self.themes.as_ref(), attributes.theme.as_ref()).await;
            }
        }

        self.attributes = attributes;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn attributes(&self) -> &WidgetAttributes {
        &self.attributes
    }

    pub fn title(&self) -> &str {
        &self.attributes.title
    }

    pub fn app_id(&self) -> &str {
        &self.session.app_id
    }

    pub fn sender_id(&self) -> &str {
        &self.session.sender_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn profile(&self) -> Option<&ProfileUpdate> {
        self.state.profile.as_ref()
    }

    pub fn feedback(&self, message_id: &str) -> Option<FeedbackVote> {
        self.state.feedback.get(message_id).copied()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Shared handle to the loading flag, for observers such as a typing
    /// indicator. It reads `true` while a backend request is in flight.
    pub fn loading_flag(&self) -> Arc<AtomicBool> {
        self.loading.clone()
    }

    pub fn active_modal(&self) -> Option<&ActiveModal> {
        self.active_modal.as_ref()
    }

    /// Mutable access to the open modal's fields.
    pub fn active_modal_mut(&mut self) -> Option<&mut ActiveModal> {
        self.active_modal.as_mut()
    }

    pub fn privacy_notice_dismissed(&self) -> bool {
        self.state.privacy_dismissed
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    /// Handles text typed into the input box.
    pub async fn send(&mut self, input: &str) -> DispatchOutcome {
        if input.trim().is_empty() {
            return DispatchOutcome::Ignored;
        }
        match classify(input) {
            Dispatch::SetTheme(theme_id) => self.switch_theme(theme_id).await,
            Dispatch::OpenModal(modal) => self.open_modal(modal),
            Dispatch::SendPayload(payload) => {
                self.exchange(payload.raw.clone(), payload.raw, SendOrigin::Payload)
                    .await
            }
            Dispatch::SendText(text) => match validate_input(&text) {
                ValidationResult::Valid => {
                    self.exchange(text.clone(), text, SendOrigin::FreeText).await
                }
                ValidationResult::Invalid { error } => {
                    debug!("Rejected input: {}", error);
                    self.push_bot(format!("⚠️ {}", error));
                    self.persist_quietly().await;
                    DispatchOutcome::Rejected(error)
                }
            },
        }
    }

    /// Handles a quick-reply button; the user bubble shows the button title.
    pub async fn click_button(&mut self, button: &Button) -> DispatchOutcome {
        match classify(&button.payload) {
            Dispatch::OpenModal(modal) => self.open_modal(modal),
            Dispatch::SetTheme(theme_id) => self.switch_theme(theme_id).await,
            Dispatch::SendPayload(payload) => {
                self.exchange(payload.raw, button.title.clone(), SendOrigin::Payload)
                    .await
            }
            Dispatch::SendText(text) => {
                self.exchange(text, button.title.clone(), SendOrigin::Payload)
                    .await
            }
        }
    }

    /// Sends `message` to the backend and appends the reconciled reply.
    async fn exchange(
        &mut self,
        message: String,
        display: String,
        origin: SendOrigin,
    ) -> DispatchOutcome {
        self.state
            .messages
            .push(Message::user(self.session.sender_id.clone(), display));

        let request = WebhookRequest::new(
            self.session.sender_id.clone(),
            message,
            self.session.app_id.clone(),
        );
        let reply = {
            let _loading = LoadingGuard::engage(&self.loading);
            self.backend.send_message(&request).await
        };

        let appended = match reply {
            Ok(fragments) => {
                let reconciliation = reconcile(fragments, origin);
                if let Some(profile) = reconciliation.profile {
                    debug!("Profile updated: {:?}", profile.display_name);
                    self.state.profile = Some(profile);
                }
                let count = reconciliation.messages.len();
                self.state.messages.extend(reconciliation.messages);
                count
            }
            Err(err) => {
                warn!("Backend call failed: {}", err);
                self.push_bot(CONNECTION_ERROR_TEXT);
                1
            }
        };

        self.persist_quietly().await;
        DispatchOutcome::Sent { appended }
    }

    async fn switch_theme(&mut self, theme_id: i64) -> DispatchOutcome {
        let switched = match self.themes.theme(theme_id).await {
            Ok(theme) => {
                info!("Switched to theme {} ({})", theme_id, theme.name);
                self.push_bot(format!("Theme switched to \"{}\".", theme.name));
                self.theme = theme;
                true
            }
            Err(err) if err.is_not_found() => {
                self.push_bot(format!("Theme {} not found.", theme_id));
                false
            }
            Err(err) => {
                warn!("Theme {} lookup failed: {}", theme_id, err);
                self.push_bot(CONNECTION_ERROR_TEXT);
                false
            }
        };
        self.persist_quietly().await;
        DispatchOutcome::ThemeCommand { switched }
    }

    // ------------------------------------------------------------------
    // Modals
    // ------------------------------------------------------------------

    /// Puts `modal` in the single modal slot, replacing any open one.
    pub fn open_modal(&mut self, modal: ActiveModal) -> DispatchOutcome {
        if let Some(previous) = self.active_modal.replace(modal.clone()) {
            debug!("Replacing open {} modal with {}", previous.kind(), modal.kind());
        }
        DispatchOutcome::ModalOpened(modal.kind())
    }

    /// Opens a search modal directly (quick actions).
    pub fn open_search(&mut self, kind: SearchKind) -> DispatchOutcome {
        self.open_modal(ActiveModal::Search(SearchModal::new(kind, None)))
    }

    /// Opens the ticket form attached to `message_id`.
    pub fn open_ticket_form(&mut self, message_id: &str) -> Result<()> {
        let form = self
            .find_message(message_id)?
            .ticket_form
            .clone()
            .ok_or_else(|| {
                HelpchatError::validation(format!("message {} has no ticket form", message_id))
            })?;
        self.open_modal(ActiveModal::TicketForm(TicketFormModal::from_attachment(
            message_id, &form,
        )));
        Ok(())
    }

    pub fn cancel_modal(&mut self) {
        if let Some(modal) = self.active_modal.take() {
            debug!("Cancelled {} modal", modal.kind());
        }
    }

    /// Moves an open ticket form to its confirm step.
    ///
    /// An incomplete form appends a warning and stays in the edit step.
    pub fn confirm_ticket_form(&mut self) -> std::result::Result<(), ModalError> {
        let result = match self.active_modal.as_mut() {
            Some(ActiveModal::TicketForm(form)) => form.confirm(),
            _ => return Err(ModalError::NotConfirmed),
        };
        if let Err(err) = &result {
            self.push_bot(format!("⚠️ {}", err));
        }
        result
    }

    /// Picks a status in the ticket filter and submits it.
    pub async fn choose_ticket_status(&mut self, status: TicketStatus) -> DispatchOutcome {
        if let Some(ActiveModal::TicketFilter(filter)) = self.active_modal.as_mut() {
            filter.selected = Some(status);
        }
        self.submit_modal().await
    }

    /// Submits the open modal.
    ///
    /// The modal closes before the request is made. A modal that cannot
    /// submit yet appends a warning and stays open.
    pub async fn submit_modal(&mut self) -> DispatchOutcome {
        let Some(modal) = self.active_modal.as_ref() else {
            return DispatchOutcome::Ignored;
        };
        match modal.submit() {
            Ok(payload) => {
                self.active_modal = None;
                self.exchange(payload.clone(), payload, SendOrigin::Payload)
                    .await
            }
            Err(err) => {
                let text = err.to_string();
                self.push_bot(format!("⚠️ {}", text));
                DispatchOutcome::Rejected(text)
            }
        }
    }

    // ------------------------------------------------------------------
    // Session state
    // ------------------------------------------------------------------

    /// Starts over with a new sender id and a single welcome message.
    pub async fn clear_history(&mut self) -> Result<()> {
        self.session = ConversationSession::new(self.session.app_id.clone());
        self.state.sender_id = Some(self.session.sender_id.clone());
        self.state.messages = vec![welcome_message()];
        self.state.feedback.clear();
        self.state.profile = None;
        self.active_modal = None;
        info!(
            "Cleared history for app '{}', new sender {}",
            self.session.app_id, self.session.sender_id
        );
        self.persist().await
    }

    pub async fn dismiss_privacy_notice(&mut self) -> Result<()> {
        self.state.privacy_dismissed = true;
        self.persist().await
    }

    /// Records a vote on a bot message.
    pub async fn set_feedback(&mut self, message_id: &str, vote: FeedbackVote) -> Result<()> {
        if !self.find_message(message_id)?.sender.is_bot() {
            return Err(HelpchatError::validation(
                "feedback is only accepted on bot messages",
            ));
        }
        self.state.feedback.insert(message_id.to_string(), vote);
        self.persist().await
    }

    /// Decodes the invoice attached to `message_id` into `dir`.
    pub async fn save_invoice(&self, message_id: &str, dir: &Path) -> Result<PathBuf> {
        let invoice = self
            .find_message(message_id)?
            .invoice
            .as_ref()
            .ok_or_else(|| {
                HelpchatError::validation(format!("message {} has no invoice", message_id))
            })?;
        let data = invoice.pdf_data.as_deref().ok_or_else(|| {
            HelpchatError::validation(format!(
                "invoice for order {} has no inline PDF data",
                invoice.order_id
            ))
        })?;
        let bytes = BASE64_STANDARD
            .decode(data.trim())
            .map_err(|e| HelpchatError::validation(format!("invoice PDF is not valid base64: {}", e)))?;

        let file_name = Path::new(&invoice.filename)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| format!("invoice_order_{}.pdf", invoice.order_id).into());
        let path = dir.join(file_name);

        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, bytes).await?;
        info!("Saved invoice for order {} to {}", invoice.order_id, path.display());
        Ok(path)
    }

    fn find_message(&self, message_id: &str) -> Result<&Message> {
        self.state
            .messages
            .iter()
            .find(|message| message.id == message_id)
            .ok_or_else(|| HelpchatError::not_found("message", message_id))
    }

    fn push_bot(&mut self, text: impl Into<String>) {
        self.state.messages.push(Message::bot(text));
    }

    async fn persist(&mut self) -> Result<()> {
        self.state.sender_id = Some(self.session.sender_id.clone());
        self.store.save(&self.session.app_id, &self.state).await
    }

    /// Persists after an exchange; a storage failure must not lose the reply.
    async fn persist_quietly(&mut self) {
        if let Err(err) = self.persist().await {
            warn!("Failed to persist widget state: {}", err);
        }
    }
}

/// Loads the persisted state for `app_id` or starts a fresh session.
async fn restore_session(
    store: &dyn WidgetStore,
    app_id: &str,
) -> Result<(ConversationSession, WidgetState)> {
    let mut state = store.load(app_id).await?.unwrap_or_default();

    let session = match state.sender_id.clone() {
        Some(sender_id) => ConversationSession {
            sender_id,
            app_id: app_id.to_string(),
        },
        None => {
            let session = ConversationSession::new(app_id);
            info!("Started session {} for app '{}'", session.sender_id, app_id);
            session
        }
    };

    let fresh = state.sender_id.is_none() || state.messages.is_empty();
    if state.messages.is_empty() {
        state.messages.push(welcome_message());
    }
    state.sender_id = Some(session.sender_id.clone());
    if fresh {
        store.save(app_id, &state).await?;
    }

    Ok((session, state))
}

/// Resolves the active theme; lookup failures fall back to the defaults.
async fn resolve_theme(themes: &dyn ThemeProvider, selector: Option<&ThemeSelector>) -> Theme {
    match selector {
        Some(ThemeSelector::Color(color)) => Theme::from_color(color),
        Some(ThemeSelector::Id(id)) => match themes.theme(*id).await {
            Ok(theme) => theme,
            Err(err) => {
                warn!("Theme {} unavailable, using defaults: {}", id, err);
                Theme::default()
            }
        },
        None => match themes.default_theme().await {
            Ok(Some(theme)) => theme,
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("Default theme unavailable, using defaults: {}", err);
                Theme::default()
            }
        },
    }
}
