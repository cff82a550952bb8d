//! Prompt submission pipeline.
//!
//! A [`ChatView`] turns a prompt into messages on the selected thread:
//!
//! 1. preconditions (signed in, thread selected, non-blank prompt) fail silently
//! 2. the user message is echoed immediately and never rolled back
//! 3. text answers stream into an assistant placeholder, flushed by
//!    [`FlushBuffer`](crate::stream::FlushBuffer) policy
//! 4. image answers are appended whole once the reply is in
//! 5. credits are deducted locally only after success
//!
//! One submission runs at a time per view; a second one while busy is
//! rejected, not queued.

mod busy;
mod state;

pub use busy::{BusyFlag, BusyGuard};
pub use state::SubmissionState;

use futures_util::StreamExt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ChatApi;
use crate::error::{ClientError, ClientResult, FetchError, StreamError, ValidationError};
use crate::models::{Message, MessageRequest, PromptMode};
use crate::notifications::Notifier;
use crate::registry::ChatRegistry;
use crate::session::SessionStore;
use crate::stream::TextAssembler;

/// The chat surface: draft input plus the submission pipeline.
pub struct ChatView {
    api: ChatApi,
    session: Arc<SessionStore>,
    registry: ChatRegistry,
    notifier: Notifier,
    busy: BusyFlag,
    draft: Mutex<String>,
    state_tx: watch::Sender<SubmissionState>,
    answer_tx: watch::Sender<Option<Message>>,
}

/// Everything one submission needs, captured before the first await.
struct Submission {
    token: String,
    thread_id: String,
    request: MessageRequest,
    _guard: BusyGuard,
}

impl ChatView {
    pub fn new(
        api: ChatApi,
        session: Arc<SessionStore>,
        registry: ChatRegistry,
        notifier: Notifier,
    ) -> Self {
        let (state_tx, _rx) = watch::channel(SubmissionState::Idle);
        let (answer_tx, _rx) = watch::channel(None);
        Self {
            api,
            session,
            registry,
            notifier,
            busy: BusyFlag::new(),
            draft: Mutex::new(String::new()),
            state_tx,
            answer_tx,
        }
    }

    pub fn registry(&self) -> &ChatRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn state(&self) -> SubmissionState {
        *self.state_tx.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SubmissionState> {
        self.state_tx.subscribe()
    }

    /// The in-progress answer as of the latest flush. `None` until the
    /// current submission has produced its placeholder.
    pub fn subscribe_answer(&self) -> watch::Receiver<Option<Message>> {
        self.answer_tx.subscribe()
    }

    pub fn draft(&self) -> String {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_draft(&self, text: &str) {
        *self.draft.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }

    fn clear_draft(&self) {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn set_state(&self, state: SubmissionState) {
        debug!("Submission state -> {}", state);
        self.state_tx.send_replace(state);
    }

    /// Submit whatever is in the draft.
    pub async fn submit_draft(&self, mode: PromptMode, publish: bool) -> ClientResult<Message> {
        let prompt = self.draft();
        self.submit(&prompt, mode, publish).await
    }

    /// Run one submission to completion.
    ///
    /// Returns the final assistant message. Validation failures return a
    /// silent [`ValidationError`] and change nothing; every other failure is
    /// also reported through the notifier.
    pub async fn submit(&self, prompt: &str, mode: PromptMode, publish: bool) -> ClientResult<Message> {
        let submission = self.begin(prompt, publish)?;

        info!(
            "Submitting {} prompt to thread {}",
            mode.as_str(),
            submission.thread_id
        );
        let result = match mode {
            PromptMode::Text => self.run_text(&submission).await,
            PromptMode::Image => self.run_image(&submission).await,
        };

        match result {
            Ok(message) => {
                self.apply_credit(mode);
                self.set_state(SubmissionState::Settled);
                Ok(message)
            }
            Err(err) => {
                self.fail(&err).await;
                Err(err)
            }
        }
    }

    /// Synchronous part of a submission: checks, busy flag, echo.
    fn begin(&self, prompt: &str, publish: bool) -> ClientResult<Submission> {
        let session = self.session.snapshot();
        let token = match (&session.token, &session.user) {
            (Some(token), Some(_)) => token.clone(),
            _ => return Err(ValidationError::NotAuthenticated.into()),
        };
        if self.registry.selected_id().is_none() {
            return Err(ValidationError::NoSelectedThread.into());
        }
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt.into());
        }

        let guard = self.busy.try_acquire().ok_or_else(|| {
            debug!("Rejected submission while busy");
            ValidationError::Busy
        })?;

        // State and draft are untouched until the echo lands
        let (thread_id, _) = self.echo_user_message(prompt).map_err(|err| {
            warn!("Could not echo prompt: {}", err);
            self.notifier.report(&err);
            err
        })?;

        self.set_state(SubmissionState::Submitting);
        self.answer_tx.send_replace(None);
        self.clear_draft();

        Ok(Submission {
            token,
            request: MessageRequest::new(thread_id.clone(), prompt, publish),
            thread_id,
            _guard: guard,
        })
    }

    /// Append the literal prompt to the selected thread. Returns the thread
    /// id and its new message count.
    pub fn echo_user_message(&self, prompt: &str) -> ClientResult<(String, usize)> {
        self.registry.append_to_selected(Message::user(prompt))
    }

    /// Deduct the cost of a successful submission.
    fn apply_credit(&self, mode: PromptMode) {
        match self.session.adjust_credits(-(mode.cost() as i64)) {
            Ok(balance) => debug!("Credits now {}", balance),
            Err(e) => warn!("Could not apply credit change: {}", e),
        }
    }

    async fn fail(&self, err: &ClientError) {
        self.set_state(SubmissionState::Failed);
        warn!("Submission failed: {}", err);
        self.notifier.report(err);

        if err.requires_reauth() {
            self.session.logout().await;
            self.registry.clear();
        }
        self.set_state(SubmissionState::Idle);
    }

    async fn run_image(&self, submission: &Submission) -> ClientResult<Message> {
        let reply = self
            .api
            .send_image(&submission.token, &submission.request)
            .await?;

        let Some(reference) = reply.image_reference() else {
            return Err(FetchError::InvalidResponse {
                message: reply
                    .message
                    .unwrap_or_else(|| "reply contained no image".to_string()),
            }
            .into());
        };

        let message = Message::image(reference);
        self.registry
            .append_message(&submission.thread_id, message.clone())?;
        self.answer_tx.send_replace(Some(message.clone()));
        info!("Image appended to thread {}", submission.thread_id);
        Ok(message)
    }

    async fn run_text(&self, submission: &Submission) -> ClientResult<Message> {
        let mut body = self
            .api
            .send_text(&submission.token, &submission.request)
            .await?;

        let mut answer = Message::assistant_placeholder();
        let expected_len = self
            .registry
            .append_message(&submission.thread_id, answer.clone())?;
        self.set_state(SubmissionState::StreamingText);

        let mut assembler = TextAssembler::new();
        let mut chunks = 0usize;

        while let Some(item) = body.next().await {
            let fed = item
                .map_err(|e| StreamError::ConnectionLost {
                    message: e.to_string(),
                })
                .and_then(|chunk| {
                    chunks += 1;
                    assembler.feed(&chunk)
                });

            match fed {
                Ok(Some(text)) => self.flush(submission, expected_len, &mut answer, &text)?,
                Ok(None) => {}
                Err(err) => {
                    if let Some(rest) = assembler.drain() {
                        self.flush(submission, expected_len, &mut answer, &rest)?;
                    }
                    return Err(err.into());
                }
            }
        }

        match assembler.finish() {
            Ok(Some(rest)) => self.flush(submission, expected_len, &mut answer, &rest)?,
            Ok(None) => {}
            Err(err) => {
                if let Some(rest) = assembler.drain() {
                    self.flush(submission, expected_len, &mut answer, &rest)?;
                }
                return Err(err.into());
            }
        }

        info!(
            "Stream finished after {} chunks ({} chars)",
            chunks,
            answer.content.chars().count()
        );
        Ok(answer)
    }

    /// Append flushed text to the placeholder and publish it.
    fn flush(
        &self,
        submission: &Submission,
        expected_len: usize,
        answer: &mut Message,
        text: &str,
    ) -> Result<(), StreamError> {
        answer.content.push_str(text);
        debug!("Flushing {} chars", text.chars().count());

        if self
            .registry
            .replace_last_message(&submission.thread_id, expected_len, answer.clone())
        {
            self.answer_tx.send_replace(Some(answer.clone()));
            Ok(())
        } else {
            Err(StreamError::PlaceholderLost {
                thread_id: submission.thread_id.clone(),
            })
        }
    }
}
