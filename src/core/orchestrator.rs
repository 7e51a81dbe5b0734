//! Conversation orchestrator
//!
//! The Orchestrator is the only writer of conversation state. A submission:
//! 1. Appends the user turn
//! 2. Marks the conversation busy
//! 3. Sends the trimmed text and the web-search flag to the completion client
//! 4. Appends the assistant turn, or raises a notification on failure
//! 5. Clears the busy flag, whichever way the call ended
//!
//! Only the latest message is sent. Earlier turns stay local to the store.

use std::borrow::Borrow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::conversation::{MessageStore, Turn};
use crate::providers::CompletionClient;

use super::input::{InputController, Submission};
use super::notification::{Notification, NotificationText};

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Blank or whitespace-only text
    EmptyInput,
    /// A completion request is already outstanding
    AlreadyBusy,
}

/// Result of a submission
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Rejected { reason: Rejection },
    Answered { user: Turn, assistant: Turn },
    Failed { user: Turn, notification: Notification },
}

/// Read-only copy of the conversation for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    pub turns: Vec<Turn>,
    pub busy: bool,
    pub web_search_enabled: bool,
    pub draft: String,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Default)]
struct ConversationState {
    store: MessageStore,
    input: InputController,
    busy: bool,
    notifications: Vec<Notification>,
}

/// Clears the busy flag when dropped while still armed, which only happens
/// when the submission is abandoned mid-request. `finish` disarms it under
/// the same lock that clears busy, so a later submission's flag is never
/// touched.
struct BusyGuard<O: Borrow<Orchestrator>> {
    orchestrator: O,
    armed: bool,
}

impl<O: Borrow<Orchestrator>> BusyGuard<O> {
    fn new(orchestrator: O) -> Self {
        Self {
            orchestrator,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<O: Borrow<Orchestrator>> Drop for BusyGuard<O> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.borrow().state().busy = false;
        }
    }
}

struct InFlight<O: Borrow<Orchestrator>> {
    submission: Submission,
    user: Turn,
    busy: BusyGuard<O>,
}

pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    state: Mutex<ConversationState>,
    notification_text: NotificationText,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            state: Mutex::new(ConversationState::default()),
            notification_text: NotificationText::default(),
        }
    }

    /// Set the title and fallback body used for failure notifications
    pub fn with_notification_text(mut self, text: NotificationText) -> Self {
        self.notification_text = text;
        self
    }

    // Never held across an await.
    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit `text` using the current web-search toggle
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let started = {
            let mut state = self.state();
            let submission = Submission {
                text: text.trim().to_string(),
                web_search_enabled: state.input.web_search_enabled(),
            };
            self.begin(&mut state, submission)
                .map(|(submission, user)| InFlight {
                    submission,
                    user,
                    busy: BusyGuard::new(self),
                })
        };

        match started {
            Ok(in_flight) => self.finish(in_flight).await,
            Err(reason) => SubmitOutcome::Rejected { reason },
        }
    }

    /// Submit the current draft. The draft is cleared as soon as the request
    /// is dispatched; a rejected draft is left as it was.
    pub async fn submit_draft(&self) -> SubmitOutcome {
        let started = {
            let mut state = self.state();
            self.begin_draft(&mut state)
                .map(|(submission, user)| InFlight {
                    submission,
                    user,
                    busy: BusyGuard::new(self),
                })
        };

        match started {
            Ok(in_flight) => self.finish(in_flight).await,
            Err(reason) => SubmitOutcome::Rejected { reason },
        }
    }

    /// Dispatch the current draft and run its completion on a spawned task.
    ///
    /// The user turn, the busy flag and the cleared draft are all visible
    /// before this returns; the task only waits for the reply.
    pub fn dispatch_draft(self: &Arc<Self>) -> Result<JoinHandle<SubmitOutcome>, Rejection> {
        let in_flight = {
            let mut state = self.state();
            let (submission, user) = self.begin_draft(&mut state)?;
            InFlight {
                submission,
                user,
                busy: BusyGuard::new(self.clone()),
            }
        };

        let orchestrator = self.clone();
        Ok(tokio::spawn(async move { orchestrator.finish(in_flight).await }))
    }

    fn begin_draft(
        &self,
        state: &mut ConversationState,
    ) -> Result<(Submission, Turn), Rejection> {
        if state.busy {
            return Err(Rejection::AlreadyBusy);
        }
        match state.input.dispatch() {
            Some(submission) => self.begin(state, submission),
            None => Err(Rejection::EmptyInput),
        }
    }

    fn begin(
        &self,
        state: &mut ConversationState,
        submission: Submission,
    ) -> Result<(Submission, Turn), Rejection> {
        if submission.text.is_empty() {
            return Err(Rejection::EmptyInput);
        }
        if state.busy {
            tracing::debug!("Submission ignored, a completion is already outstanding");
            return Err(Rejection::AlreadyBusy);
        }
        if state.store.is_empty() {
            tracing::debug!("Conversation started");
        }

        let user = Turn::user(submission.text.clone(), submission.web_search_enabled);
        state.store.append(user.clone());
        state.busy = true;

        tracing::info!(
            turn = %user.id(),
            turns = state.store.len(),
            web_search = submission.web_search_enabled,
            "Submitting message"
        );

        Ok((submission, user))
    }

    async fn finish<O: Borrow<Orchestrator>>(&self, in_flight: InFlight<O>) -> SubmitOutcome {
        let InFlight {
            submission,
            user,
            mut busy,
        } = in_flight;

        let result = self
            .client
            .complete(&submission.text, submission.web_search_enabled)
            .await;

        let mut state = self.state();
        let outcome = match result {
            Ok(completion) => {
                let assistant = Turn::assistant(completion.reply, completion.used_web_search);
                state.store.append(assistant.clone());
                SubmitOutcome::Answered { user, assistant }
            }
            Err(e) => {
                tracing::warn!(turn = %user.id(), error = %e, "Completion failed");
                let notification = self.notification_text.for_error(&e);
                state.notifications.push(notification.clone());
                SubmitOutcome::Failed { user, notification }
            }
        };
        // Released under the same lock as the append so snapshots never show
        // a reply while still busy.
        state.busy = false;
        busy.disarm();
        drop(state);

        outcome
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.state().input.set_draft(text);
    }

    pub fn set_web_search(&self, enabled: bool) {
        self.state().input.set_web_search(enabled);
    }

    /// Flip the toggle and return the new value
    pub fn toggle_web_search(&self) -> bool {
        self.state().input.toggle_web_search()
    }

    /// Remove a notification. Returns false if it was not pending.
    pub fn dismiss_notification(&self, id: Uuid) -> bool {
        let mut state = self.state();
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        state.notifications.len() != before
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        let state = self.state();
        ConversationSnapshot {
            turns: state.store.all().cloned().collect(),
            busy: state.busy,
            web_search_enabled: state.input.web_search_enabled(),
            draft: state.input.draft().to_string(),
            notifications: state.notifications.clone(),
        }
    }
}
