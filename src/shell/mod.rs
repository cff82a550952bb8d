//! Interactive line shell: login gate plus chat commands.
//!
//! The shell is a thin view over [`Services`]: every command maps onto one
//! session, registry or pipeline operation, and notifications are drained
//! and printed after each command.

mod command;
mod output;

pub use command::{Command, ThreadRef, HELP};
pub use output::Output;

use chrono::Utc;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info};

use crate::error::{ClientError, ClientResult, ValidationError};
use crate::models::{Credentials, PromptMode};
use crate::render::{render_message, render_thread, thread_list_line};
use crate::startup::Services;

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W: Write> {
    services: Services,
    out: Output<W>,
    mode: PromptMode,
    publish: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(services: Services, out: Output<W>) -> Self {
        Self {
            services,
            out,
            mode: PromptMode::Text,
            publish: false,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn mode(&self) -> PromptMode {
        self.mode
    }

    pub fn into_output(self) -> Output<W> {
        self.out
    }

    /// Read commands until `/quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.out.dim("Type /help for commands.")?;

        loop {
            self.flush_notifications()?;

            if !self.services.session.is_authenticated() && !self.login_gate(&mut lines).await? {
                break;
            }

            self.out.prompt(&self.prompt_label())?;
            let Some(line) = lines.next_line().await? else {
                break;
            };

            if self.execute(Command::parse(&line)).await? == Flow::Quit {
                break;
            }
        }

        self.flush_notifications()?;
        info!("Shell exited");
        Ok(())
    }

    fn prompt_label(&self) -> String {
        let chat = self
            .services
            .registry
            .selected()
            .map(|t| t.title())
            .unwrap_or_else(|| "no chat".to_string());
        format!("[{}] {}", self.mode.as_str(), chat)
    }

    /// Print and discard pending notifications.
    pub fn flush_notifications(&mut self) -> io::Result<()> {
        while let Ok(notification) = self.services.notifications.try_recv() {
            self.out.notification(&notification)?;
        }
        Ok(())
    }

    fn report(&self, err: &ClientError) {
        self.services.chat.notifier().report(err);
    }

    /// Sign in or register. Returns `false` when the user quits or input ends.
    async fn login_gate<R>(&mut self, lines: &mut Lines<R>) -> io::Result<bool>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            self.flush_notifications()?;
            self.out.plain("Sign in with [l]ogin or [r]egister, [q] to quit.")?;
            self.out.prompt("account")?;
            let Some(choice) = lines.next_line().await? else {
                return Ok(false);
            };

            let credentials = match choice.trim().to_lowercase().as_str() {
                "l" | "login" => {
                    let email = self.ask(lines, "email").await?;
                    let password = read_password().await?;
                    Credentials::login(email, password)
                }
                "r" | "register" => {
                    let name = self.ask(lines, "name").await?;
                    let email = self.ask(lines, "email").await?;
                    let password = read_password().await?;
                    let credentials = Credentials::register(name, email, password);
                    match self.services.session.register(&credentials).await {
                        Ok(message) => self.services.chat.notifier().success(
                            message.unwrap_or_else(|| "Account created".to_string()),
                        ),
                        Err(e) => {
                            self.report(&e);
                            continue;
                        }
                    }
                    credentials
                }
                "q" | "quit" | "/quit" => return Ok(false),
                _ => continue,
            };

            match self.services.session.authenticate(&credentials).await {
                Ok(session) => {
                    if let Some(user) = &session.user {
                        self.out.plain(&format!(
                            "Signed in as {} ({} credits).",
                            user.name, user.credit_balance
                        ))?;
                    }
                    self.services.load_threads().await;
                    return Ok(true);
                }
                Err(e) => self.report(&e),
            }
        }
    }

    async fn ask<R>(&mut self, lines: &mut Lines<R>, label: &str) -> io::Result<String>
    where
        R: AsyncBufRead + Unpin,
    {
        self.out.prompt(label)?;
        Ok(lines.next_line().await?.unwrap_or_default().trim().to_string())
    }

    /// Run one command.
    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        debug!("Shell command: {:?}", command);
        match command {
            Command::Prompt(text) => self.submit(&text).await?,
            Command::New => match self.services.registry.create_thread().await {
                Ok(_) => self.services.chat.notifier().success("New chat created"),
                Err(e) => self.report(&e),
            },
            Command::List => self.list(None)?,
            Command::Filter(query) => self.list(Some(&query))?,
            Command::Show => self.show()?,
            Command::Select(thread) => {
                match self
                    .resolve(&thread)
                    .and_then(|id| self.services.registry.select_thread(&id))
                {
                    Ok(()) => self.show()?,
                    Err(e) => self.report(&e),
                }
            }
            Command::Delete(thread) => {
                let result = match self.resolve(&thread) {
                    Ok(id) => self.services.registry.delete_thread(&id).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(()) => self.services.chat.notifier().success("Chat deleted"),
                    Err(e) => self.report(&e),
                }
            }
            Command::Reload => {
                if let Err(e) = self.services.registry.load_threads().await {
                    self.report(&e);
                } else {
                    self.list(None)?;
                }
            }
            Command::Mode(mode) => {
                self.mode = mode;
                self.out.dim(&format!(
                    "Mode: {} ({} credit{} per prompt)",
                    mode.as_str(),
                    mode.cost(),
                    if mode.cost() == 1 { "" } else { "s" }
                ))?;
            }
            Command::Publish(publish) => {
                self.publish = publish;
                self.out.dim(if publish {
                    "Generated images will be published"
                } else {
                    "Generated images stay private"
                })?;
            }
            Command::Theme => match self.services.session.toggle_theme().await {
                Ok(theme) => self.out.dim(&format!("Theme: {}", theme.as_str()))?,
                Err(e) => self.report(&e),
            },
            Command::Credits => {
                let credits = self.services.session.snapshot().credits().unwrap_or(0);
                self.out.plain(&format!("{} credits left", credits))?;
            }
            Command::Logout => {
                self.services.session.logout().await;
                self.services.registry.clear();
                self.out.dim("Signed out.")?;
            }
            Command::Help => self.out.plain(HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(message) => self.out.dim(&message)?,
        }
        self.flush_notifications()?;
        Ok(Flow::Continue)
    }

    /// Turn a list position or id into a thread id.
    fn resolve(&self, thread: &ThreadRef) -> ClientResult<String> {
        match thread {
            ThreadRef::Id(id) => Ok(id.clone()),
            ThreadRef::Index(n) => self
                .services
                .registry
                .threads()
                .get(n - 1)
                .map(|t| t.id.clone())
                .ok_or_else(|| ClientError::not_found(&n.to_string())),
        }
    }

    fn list(&mut self, query: Option<&str>) -> io::Result<()> {
        let registry = &self.services.registry;
        let threads = registry.threads();
        let selected = registry.selected_id();
        let theme = self.services.session.theme();
        let now = Utc::now();

        let matching: Vec<String> = match query {
            Some(q) => registry.filter_threads(q).into_iter().map(|t| t.id).collect(),
            None => threads.iter().map(|t| t.id.clone()).collect(),
        };

        let lines: Vec<_> = threads
            .iter()
            .enumerate()
            .filter(|(_, t)| matching.contains(&t.id))
            .map(|(i, t)| thread_list_line(i, t, selected.as_deref() == Some(t.id.as_str()), theme, now))
            .collect();

        if lines.is_empty() {
            self.out.dim(match query {
                Some(_) => "No matching chats.",
                None => "No chats yet. Start one with /new.",
            })
        } else {
            self.out.lines(&lines)
        }
    }

    fn show(&mut self) -> io::Result<()> {
        let Some(thread) = self.services.registry.selected() else {
            return self.out.dim("No chat selected.");
        };
        if thread.messages.is_empty() {
            return self.out.dim("Empty chat. Type a prompt to start.");
        }
        let session = self.services.session.snapshot();
        self.out
            .lines(&render_thread(&thread, session.user.as_ref(), session.theme))
    }

    /// Submit a prompt, printing text as it flushes.
    async fn submit(&mut self, text: &str) -> io::Result<()> {
        let chat = &self.services.chat;
        let out = &mut self.out;
        let mut answers = chat.subscribe_answer();
        let mut printed = 0usize;

        chat.set_draft(text);
        let submission = chat.submit_draft(self.mode, self.publish);
        tokio::pin!(submission);

        let result = loop {
            tokio::select! {
                result = &mut submission => break result,
                Ok(()) = answers.changed() => {
                    let answer = answers.borrow_and_update().clone();
                    if let Some(answer) = answer.filter(|a| !a.is_image) {
                        out.stream_text(&answer.content[printed..])?;
                        printed = answer.content.len();
                    }
                }
            }
        };

        // Last flush may land together with completion
        let answer = answers.borrow_and_update().clone();
        if let Some(answer) = answer.filter(|a| !a.is_image) {
            if answer.content.len() > printed {
                out.stream_text(&answer.content[printed..])?;
                printed = answer.content.len();
            }
        }
        if printed > 0 {
            out.stream_text("\n")?;
        }

        match result {
            Ok(message) if message.is_image => {
                let session = self.services.session.snapshot();
                self.out
                    .lines(&render_message(&message, session.user.as_ref(), session.theme))?;
            }
            Ok(_) => {}
            Err(ClientError::Validation(ValidationError::NoSelectedThread)) => {
                self.out.dim("No chat selected. Start one with /new.")?;
            }
            Err(ClientError::Validation(ValidationError::Busy)) => {
                self.out.dim("Still answering the previous prompt.")?;
            }
            // Other failures were already reported by the pipeline
            Err(_) => {}
        }
        Ok(())
    }
}

/// Read a password without echo.
async fn read_password() -> io::Result<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("password > "))
        .await
        .map_err(io::Error::other)?
}
