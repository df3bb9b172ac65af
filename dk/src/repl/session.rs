//! Shell session management

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::compose::{CustomDorkSpec, Operator, compose};
use crate::dispatch::SearchTarget;
use crate::render;
use crate::session::{LoadPhase, Outcome, SessionController};

/// Interactive shell session
pub struct ReplSession {
    controller: SessionController,
    target: SearchTarget,
    composer: CustomDorkSpec,
}

impl ReplSession {
    pub fn new(controller: SessionController, target: SearchTarget) -> Self {
        Self {
            controller,
            target,
            composer: CustomDorkSpec::default(),
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Operator values entered with `/compose`
    pub fn composer(&self) -> &CustomDorkSpec {
        &self.composer
    }

    /// Run the shell main loop
    pub async fn run(&mut self, category: Option<String>, subject: Option<String>) -> Result<()> {
        self.print_welcome();

        if let Some(subject) = subject {
            self.set_subject(&subject).await;
        }
        if let Some(id) = category {
            self.select(&id).await;
        }

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = self.prompt().await;
            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if self.handle_line(input).await == SlashResult::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Handle one line of input: slash command, or a new subject
    pub async fn handle_line(&mut self, input: &str) -> SlashResult {
        debug!(%input, "ReplSession::handle_line: called");
        if input.starts_with('/') {
            self.handle_slash_command(input).await
        } else {
            self.set_subject(input).await;
            SlashResult::Continue
        }
    }

    async fn prompt(&self) -> String {
        let episode = self.controller.snapshot().await;
        let name = episode.category.map(|c| c.id).unwrap_or("dk");
        match episode.target() {
            Some(subject) => format!("{} [{}]> ", name.bright_green(), subject),
            None => format!("{}> ", name.bright_green()),
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "dorkkit shell".bright_cyan().bold());
        println!("Type a subject, {} a category, {} for help", "/select".yellow(), "/help".yellow());
        println!();
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/categories" | "/ls" => self.print_categories(),
            "/select" | "/s" => self.select(rest).await,
            "/subject" => self.set_subject(rest).await,
            "/filter" | "/f" => {
                if rest.is_empty() {
                    self.controller.clear_filter().await;
                } else {
                    self.controller.set_filter(rest).await;
                }
                self.show().await;
            }
            "/clear-filter" => {
                self.controller.clear_filter().await;
                self.show().await;
            }
            "/retry" | "/r" => match self.controller.retry().await {
                Outcome::Ignored => println!("{}", "Nothing to retry.".dimmed()),
                Outcome::NeedsSubject => {
                    let prompt = self.controller.snapshot().await.category.map(|c| c.prompt).unwrap_or_default();
                    println!("{} {}", "!".yellow(), prompt);
                }
                _ => self.show().await,
            },
            "/show" => self.show().await,
            "/url" | "/u" => self.print_url(rest).await,
            "/compose" | "/c" => self.compose(rest),
            "/reset" => {
                self.controller.reset().await;
                println!("{}", "Session reset.".dimmed());
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:24} Show this help", "/help".yellow());
        println!("  {:24} List categories", "/categories".yellow());
        println!("  {:24} Select a category by id or number", "/select <id|n>".yellow());
        println!("  {:24} Set the subject (or just type it)", "/subject <text>".yellow());
        println!("  {:24} Filter results by keyword", "/filter <keyword>".yellow());
        println!("  {:24} Remove the filter", "/clear-filter".yellow());
        println!("  {:24} Retry a failed load", "/retry".yellow());
        println!("  {:24} Show the current results", "/show".yellow());
        println!("  {:24} Search URL for result n", "/url <n>".yellow());
        println!("  {:24} Set a custom dork operator", "/compose <op> <value>".yellow());
        println!("  {:24} Show or clear the custom dork", "/compose [clear]".yellow());
        println!("  {:24} Back to no category", "/reset".yellow());
        println!("  {:24} Exit the shell", "/quit".yellow());
        println!();
        let ops: Vec<&str> = Operator::ALL.iter().map(|op| op.name()).collect();
        println!("Compose operators: {}", ops.join(", ").dimmed());
        println!();
    }

    fn print_categories(&self) {
        for (i, category) in self.controller.catalog().all().iter().enumerate() {
            println!("{:>3}. {}", i + 1, render::category_line(category));
        }
    }

    async fn select(&mut self, arg: &str) {
        if arg.is_empty() {
            println!("Usage: {}", "/select <id|n>".yellow());
            return;
        }

        // Accept a 1-based position in the category list as well as an id
        let catalog = self.controller.catalog();
        let id = match arg.parse::<usize>() {
            Ok(n) if n >= 1 && n <= catalog.len() => catalog.all()[n - 1].id,
            _ => arg,
        };

        match self.controller.select(id).await {
            Ok(Outcome::NeedsSubject) => {
                let prompt = catalog.get(id).map(|c| c.prompt).unwrap_or_default();
                println!("{} {}", "!".yellow(), prompt);
            }
            Ok(_) => self.show().await,
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }

    async fn set_subject(&mut self, subject: &str) {
        match self.controller.set_subject(subject).await {
            Outcome::Applied | Outcome::Resubstituted => self.show().await,
            _ => {
                let episode = self.controller.snapshot().await;
                match (episode.category, episode.target()) {
                    (None, Some(_)) => println!("{}", "Subject set. Pick a category with /select.".dimmed()),
                    (_, None) => println!("{}", "Subject cleared.".dimmed()),
                    _ => {}
                }
            }
        }
    }

    async fn show(&self) {
        let episode = self.controller.snapshot().await;
        match episode.phase {
            LoadPhase::Idle => {
                println!("{}", "No category selected. Use /categories and /select.".dimmed());
            }
            LoadPhase::Loading => {
                let name = episode.category.map(|c| c.name).unwrap_or_default();
                println!("{} {}...", "Loading".dimmed(), name);
            }
            LoadPhase::Error => {
                let Some(e) = &episode.error else {
                    return;
                };
                println!("{} {}", "✗".red(), e);
                if e.is_retryable() {
                    println!("Type {} to try again", "/retry".yellow());
                } else {
                    println!("{}", "Retrying will not help; check the template source configuration.".dimmed());
                }
            }
            LoadPhase::Resolved => {
                let Some(set) = &episode.resolved else {
                    return;
                };
                let visible = episode.visible();
                println!();
                println!("{}", render::category_heading(&set.category, visible.len(), set.queries.len()));
                if !episode.keyword.is_empty() {
                    println!("{} {}", "filter:".dimmed(), episode.keyword);
                }
                if visible.is_empty() {
                    println!("{}", "No dorks match the filter.".dimmed());
                }
                for (i, query) in visible.iter().enumerate() {
                    println!("{}", render::query_block(i, query, None));
                }
                println!();
            }
        }
    }

    async fn print_url(&self, arg: &str) {
        let visible = self.controller.visible().await;
        let query = arg
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| visible.get(i));

        match query {
            Some(query) => match self.target.url_for(&query.query) {
                Ok(url) => println!("{}", url.blue().underline()),
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            None => println!("Usage: {} (1..={})", "/url <n>".yellow(), visible.len()),
        }
    }

    fn compose(&mut self, arg: &str) {
        if arg == "clear" {
            self.composer = CustomDorkSpec::default();
            println!("{}", "Custom dork cleared.".dimmed());
            return;
        }

        if !arg.is_empty() {
            let (name, value) = arg.split_once(char::is_whitespace).unwrap_or((arg, ""));
            let Some(op) = Operator::from_name(name) else {
                println!("{} Unknown operator: {}", "?".yellow(), name);
                return;
            };
            let value = value.trim();
            self.composer
                .set(op, if value.is_empty() { None } else { Some(value.to_string()) });
        }

        let query = compose(&self.composer);
        if query.is_empty() {
            println!("{}", "Custom dork is empty. Use /compose <op> <value>.".dimmed());
            return;
        }
        println!("{}", query.green());
        match self.target.url_for(&query) {
            Ok(url) => println!("{}", url.blue().underline()),
            Err(e) => println!("{} {}", "✗".red(), e),
        }
    }
}

/// Result of handling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashResult {
    Continue,
    Quit,
}
