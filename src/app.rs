use ratatui::{layout::Rect, widgets::ListState};
use std::sync::Arc;
use std::time::Duration;

use crate::alert::{AlertKind, Alerts};
use crate::config::Config;
use crate::mail::{Email, EmailRow, FlagUpdate, Mailbox, NewEmail};
use crate::worker::{Completed, FetchPurpose, Job, Outcome, Request, UpdatePurpose};

/// The three mutually exclusive panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    MailboxList,
    Compose,
    EmailDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    #[default]
    Recipients,
    Subject,
    Body,
}

impl ComposeField {
    pub fn next(self) -> Self {
        match self {
            ComposeField::Recipients => ComposeField::Subject,
            ComposeField::Subject => ComposeField::Body,
            ComposeField::Body => ComposeField::Recipients,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            ComposeField::Recipients => ComposeField::Body,
            ComposeField::Subject => ComposeField::Recipients,
            ComposeField::Body => ComposeField::Subject,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    pub recipients: String,
    pub subject: String,
    pub body: String,
    pub focus: ComposeField,
}

impl ComposeState {
    /// Prefill a reply to `email`
    pub fn reply_to(email: &Email) -> Self {
        Self {
            recipients: email.sender.clone(),
            subject: reply_subject(&email.subject),
            body: format!(
                "On {} {} wrote:\n\n{}",
                email.timestamp, email.sender, email.body
            ),
            ..Self::default()
        }
    }

    /// Fill the fields that are still empty from `prefill`, keeping
    /// anything typed in the meantime and the current focus
    pub fn merge_prefill(&mut self, prefill: ComposeState) {
        for (field, value) in [
            (&mut self.recipients, prefill.recipients),
            (&mut self.subject, prefill.subject),
            (&mut self.body, prefill.body),
        ] {
            if field.is_empty() {
                *field = value;
            }
        }
    }

    pub fn draft(&self) -> NewEmail {
        NewEmail {
            recipients: self.recipients.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        }
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            ComposeField::Recipients => &mut self.recipients,
            ComposeField::Subject => &mut self.subject,
            ComposeField::Body => &mut self.body,
        }
    }

    /// Header block plus body, as written to the editor
    pub fn to_draft_text(&self) -> String {
        format!(
            "To: {}\nSubject: {}\n\n{}",
            self.recipients, self.subject, self.body
        )
    }

    /// Read fields back from editor text; headers end at the first blank line
    pub fn apply_draft_text(&mut self, content: &str) {
        let mut recipients = String::new();
        let mut subject = String::new();
        let mut in_headers = true;
        let mut body_lines = Vec::new();

        for line in content.lines() {
            if in_headers {
                if line.is_empty() {
                    in_headers = false;
                } else if let Some(val) = line.strip_prefix("To:") {
                    recipients = val.trim().to_string();
                } else if let Some(val) = line.strip_prefix("Subject:") {
                    subject = val.trim().to_string();
                }
            } else {
                body_lines.push(line);
            }
        }

        self.recipients = recipients;
        self.subject = subject;
        self.body = body_lines.join("\n");
    }
}

pub fn reply_subject(subject: &str) -> String {
    if subject.starts_with("Re:") {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

pub struct App {
    pub config: Arc<Config>,
    pub view: View,
    pub mailbox: Mailbox,
    pub emails: Vec<Email>,
    pub list_state: ListState,
    /// Email shown in the detail view
    pub detail: Option<Email>,
    pub detail_scroll: u16,
    pub compose: ComposeState,
    pub alerts: Alerts,
    /// Waiting on the response that fills the current view
    pub loading: bool,
    pub should_quit: bool,
    pub list_area: Rect,
    generation: u64,
    /// Send requests without a result yet
    pending_sends: usize,
    outbox: Vec<Job>,
}

impl App {
    pub fn new(config: Arc<Config>) -> Self {
        let alerts = Alerts::new(
            Duration::from_secs(config.alerts.ttl_secs),
            config.alerts.max_visible,
        );
        Self {
            config,
            view: View::MailboxList,
            mailbox: Mailbox::Inbox,
            emails: Vec::new(),
            list_state: ListState::default(),
            detail: None,
            detail_scroll: 0,
            compose: ComposeState::default(),
            alerts,
            loading: false,
            should_quit: false,
            list_area: Rect::default(),
            generation: 0,
            pending_sends: 0,
            outbox: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Make `view` the only visible panel. Responses issued before this
    /// call no longer populate the screen.
    pub fn show(&mut self, view: View) {
        self.view = view;
        self.generation += 1;
        self.loading = false;
    }

    fn submit(&mut self, request: Request) {
        self.submit_as(self.generation, request);
    }

    fn submit_as(&mut self, generation: u64, request: Request) {
        self.outbox.push(Job {
            generation,
            request,
        });
    }

    /// Requests queued since the last call, oldest first
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.outbox)
    }

    pub fn heading(&self) -> &'static str {
        self.mailbox.label()
    }

    pub fn load_mailbox(&mut self, name: &str) {
        self.load(Mailbox::from_name(name));
    }

    pub fn load(&mut self, mailbox: Mailbox) {
        self.show(View::MailboxList);
        self.mailbox = mailbox;
        self.emails.clear();
        self.list_state.select(None);
        self.loading = true;
        self.submit(Request::ListMailbox { mailbox });
    }

    pub fn reload(&mut self) {
        self.load(self.mailbox);
    }

    pub fn rows(&self) -> Vec<EmailRow> {
        let preview_length = self.config.layout.preview_length;
        self.emails
            .iter()
            .map(|e| EmailRow::new(e, self.mailbox, preview_length))
            .collect()
    }

    pub fn selected_email(&self) -> Option<&Email> {
        self.list_state.selected().and_then(|i| self.emails.get(i))
    }

    pub fn next(&mut self) {
        if self.emails.is_empty() {
            return;
        }
        let max = self.emails.len() - 1;
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(max),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.emails.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Open the selected row from the listing already in memory
    pub fn open_selected(&mut self) {
        if let Some(email) = self.selected_email().cloned() {
            self.open_email(email);
        }
    }

    fn open_email(&mut self, email: Email) {
        self.show(View::EmailDetail);
        self.detail_scroll = 0;
        self.mark_read(email.id);
        self.detail = Some(email);
    }

    /// Fetch one email by id and show it
    pub fn open_detail(&mut self, id: u64) {
        self.show(View::EmailDetail);
        self.detail = None;
        self.detail_scroll = 0;
        self.loading = true;
        self.submit(Request::FetchEmail {
            id,
            purpose: FetchPurpose::Detail,
        });
    }

    fn mark_read(&mut self, id: u64) {
        if let Some(email) = self.emails.iter_mut().find(|e| e.id == id) {
            email.read = true;
        }
        self.submit(Request::UpdateFlags {
            id,
            update: FlagUpdate::Read(true),
            purpose: UpdatePurpose::MarkRead,
        });
    }

    pub fn detail_scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(3);
    }

    pub fn detail_scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(3);
    }

    pub fn open_compose(&mut self) {
        self.show(View::Compose);
        self.compose = ComposeState::default();
    }

    /// Reply to the email in the detail view; fields fill in once the
    /// original has been fetched
    pub fn reply(&mut self) {
        let Some(id) = self.detail.as_ref().map(|e| e.id) else {
            return;
        };
        self.open_compose();
        self.loading = true;
        self.submit(Request::FetchEmail {
            id,
            purpose: FetchPurpose::Reply,
        });
    }

    /// A send is in flight; survives leaving and reopening the compose view
    pub fn is_sending(&self) -> bool {
        self.pending_sends > 0
    }

    pub fn send(&mut self) {
        if self.is_sending() {
            tracing::debug!("send ignored, previous send still in flight");
            return;
        }
        self.pending_sends += 1;
        let draft = self.compose.draft();
        self.submit(Request::Send { draft });
    }

    /// Archive control of the selected row, if the listing shows one
    pub fn toggle_selected_archive(&mut self) {
        let control = self
            .list_state
            .selected()
            .and_then(|i| self.emails.get(i))
            .map(|e| EmailRow::new(e, self.mailbox, 0))
            .and_then(|row| row.archive_control.map(|_| row.id));
        if let Some(id) = control {
            self.toggle_archive(id);
        }
    }

    /// Archive control of the detail view, shown for the same mailboxes as
    /// the row control
    pub fn toggle_detail_archive(&mut self) {
        if !self.mailbox.allows_archiving() {
            return;
        }
        if let Some(id) = self.detail.as_ref().map(|e| e.id) {
            self.toggle_archive(id);
        }
    }

    /// Read the archived flag, flip it, and return to the inbox once the
    /// server has acknowledged the write
    pub fn toggle_archive(&mut self, id: u64) {
        self.submit(Request::FetchEmail {
            id,
            purpose: FetchPurpose::ToggleArchive,
        });
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Apply a finished request
    pub fn apply(&mut self, done: Completed) {
        let current = self.is_current(done.generation);

        match done.outcome {
            Outcome::Mailbox { mailbox, result } => {
                if !current || mailbox != self.mailbox {
                    tracing::debug!(%mailbox, generation = done.generation, "dropping stale listing");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(emails) => {
                        tracing::info!(%mailbox, count = emails.len(), "mailbox loaded");
                        self.emails = emails;
                        if !self.emails.is_empty() {
                            self.list_state.select(Some(0));
                        }
                    }
                    Err(e) => self.alerts.show(AlertKind::Error, e.to_string()),
                }
            }
            Outcome::Email {
                id,
                purpose: FetchPurpose::Detail,
                result,
            } => {
                if !current {
                    tracing::debug!(id, "dropping stale detail");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(email) => {
                        self.mark_read(email.id);
                        self.detail = Some(email);
                    }
                    Err(e) => self.alerts.show(AlertKind::Error, e.to_string()),
                }
            }
            Outcome::Email {
                id,
                purpose: FetchPurpose::Reply,
                result,
            } => {
                if !current {
                    tracing::debug!(id, "dropping stale reply prefill");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(email) => self.compose.merge_prefill(ComposeState::reply_to(&email)),
                    Err(e) => self.alerts.show(AlertKind::Error, e.to_string()),
                }
            }
            Outcome::Email {
                purpose: FetchPurpose::ToggleArchive,
                result,
                ..
            } => match result {
                // Reuse the key press generation so the reload only happens
                // if the user is still where they pressed the key.
                Ok(email) => self.submit_as(
                    done.generation,
                    Request::UpdateFlags {
                        id: email.id,
                        update: FlagUpdate::Archived(!email.archived),
                        purpose: UpdatePurpose::ToggleArchive,
                    },
                ),
                Err(e) => self.alerts.show(AlertKind::Error, e.to_string()),
            },
            Outcome::Updated {
                id,
                update,
                purpose,
                result,
            } => match (purpose, result) {
                (UpdatePurpose::MarkRead, Ok(())) => {}
                (UpdatePurpose::ToggleArchive, Ok(())) => {
                    tracing::info!(id, ?update, "archive flag updated");
                    if current {
                        self.load(Mailbox::Inbox);
                    }
                }
                (_, Err(e)) => {
                    tracing::warn!(id, ?update, error = %e, "flag update failed");
                    self.alerts.show(AlertKind::Error, e.to_string());
                }
            },
            Outcome::Sent { result } => {
                self.pending_sends = self.pending_sends.saturating_sub(1);
                match result {
                    Ok(message) => {
                        self.alerts.show(AlertKind::Success, message);
                        if current {
                            self.load(Mailbox::Inbox);
                        }
                    }
                    Err(e) => self.alerts.show(AlertKind::Error, e.to_string()),
                }
            }
        }
    }

    pub fn set_list_area(&mut self, area: Rect) {
        self.list_area = area;
    }

    /// Select the row under (x, y); true if a row was hit
    pub fn handle_click(&mut self, x: u16, y: u16) -> bool {
        let area = self.list_area;
        // The first row is the top border
        if x < area.x || x >= area.x + area.width || y <= area.y || y >= area.y + area.height {
            return false;
        }
        let visual_row = (y - area.y - 1) as usize;
        let row = visual_row + self.list_state.offset();
        if row < self.emails.len() {
            self.list_state.select(Some(row));
            return true;
        }
        false
    }
}
