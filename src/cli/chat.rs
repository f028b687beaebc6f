//! Interactive terminal front end.
//!
//! Same catalog and remote call as the HTTP front end. Feedback goes to a JSON
//! file and history lives only as long as the session. Failed remote calls
//! are shown in place of a response but are not added to history and do not
//! ask for feedback.

use anyhow::Result;
use chrono::Local;
use std::io::{self, BufRead, Write};
use tracing::warn;

use crate::cli::stats::render_stats;
use crate::config::Config;
use crate::llm::prompts::FunctionType;
use crate::llm::{factory, generate, prompts, LlmClient};
use crate::records::{validate_rating, NewFeedback};
use crate::store::{FeedbackFile, SessionHistory};
use crate::util::{title_case, truncate_chars};

const WIDE_RULE: &str =
    "================================================================================";
const RULE: &str = "============================================================";
const THIN_RULE: &str = "----------------------------------------";

const SUMMARY_TERMINATOR: &str = "END";
const FEEDBACK_EXCERPT_CHARS: usize = 100;
const HISTORY_QUERY_CHARS: usize = 60;

/// Start a session on stdin/stdout.
pub async fn run(config: &Config) -> Result<()> {
    let client = factory::create_client(config)?;
    let feedback = FeedbackFile::load(&config.cli.feedback_file);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut assistant = Assistant::new(client.as_ref(), feedback, stdin.lock(), stdout.lock());
    assistant.run().await
}

pub struct Assistant<'a, R, W> {
    client: &'a dyn LlmClient,
    feedback: FeedbackFile,
    history: SessionHistory,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Assistant<'a, R, W> {
    pub fn new(client: &'a dyn LlmClient, feedback: FeedbackFile, input: R, output: W) -> Self {
        Self {
            client,
            feedback,
            history: SessionHistory::new(),
            input,
            output,
        }
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn feedback(&self) -> &FeedbackFile {
        &self.feedback
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Menu loop. Returns when the user exits or input runs out.
    pub async fn run(&mut self) -> Result<()> {
        self.banner()?;

        loop {
            self.menu()?;
            let Some(choice) = self.ask("\nSelect function (1-6): ")? else {
                break;
            };

            let keep_going = match choice.trim() {
                "1" => self.single_line_mode(FunctionType::QuestionAnswering).await?,
                "2" => self.summarization_mode().await?,
                "3" => self.single_line_mode(FunctionType::CreativeGeneration).await?,
                "4" => {
                    render_stats(self.feedback.stats().as_ref(), &mut self.output)?;
                    true
                }
                "5" => {
                    self.show_history()?;
                    true
                }
                "6" => {
                    writeln!(self.output, "\nThank you for using the AI Assistant!")?;
                    writeln!(self.output, "Session data has been saved.")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid choice. Please select 1-6.")?;
                    true
                }
            };

            if !keep_going || self.ask("\nPress Enter to continue...")?.is_none() {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Prompt and read one line, without its line ending. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn banner(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{}", WIDE_RULE)?;
        writeln!(self.output, "AI ASSISTANT (Powered by Gemini)")?;
        writeln!(self.output, "{}", WIDE_RULE)?;
        writeln!(
            self.output,
            "Your personal AI assistant with advanced prompt engineering"
        )?;
        writeln!(self.output, "{}", WIDE_RULE)
    }

    fn menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nMAIN FUNCTIONS:")?;
        writeln!(
            self.output,
            "  1. Question Answering    - Get factual information and explanations"
        )?;
        writeln!(
            self.output,
            "  2. Text Summarization    - Summarize articles, documents, or content"
        )?;
        writeln!(
            self.output,
            "  3. Creative Generation   - Generate stories, essays, and creative content"
        )?;
        writeln!(self.output, "  4. Feedback Analytics    - View performance statistics")?;
        writeln!(self.output, "  5. Session History       - Review current session interactions")?;
        writeln!(self.output, "  6. Exit Assistant        - End session and save data")?;
        writeln!(self.output, "{}", &WIDE_RULE.replace('=', "-"))
    }

    /// Style id picked by number. `None` at end of input.
    fn choose_style(&mut self, function_type: FunctionType) -> Result<Option<&'static str>> {
        let styles = function_type.styles();

        writeln!(self.output, "\nSELECT RESPONSE STYLE:")?;
        for (i, style) in styles.iter().enumerate() {
            writeln!(self.output, "  {}. {}", i + 1, style.name)?;
        }

        loop {
            let Some(choice) = self.ask(&format!("\nChoose style (1-{}): ", styles.len()))? else {
                return Ok(None);
            };
            match choice.trim().parse::<usize>() {
                Ok(n) if (1..=styles.len()).contains(&n) => return Ok(Some(styles[n - 1].id)),
                _ => writeln!(self.output, "Invalid choice. Please select 1, 2, or 3.")?,
            }
        }
    }

    async fn single_line_mode(&mut self, function_type: FunctionType) -> Result<bool> {
        let (label, empty_message, heading) = match function_type {
            FunctionType::QuestionAnswering => (
                "What would you like to know? ",
                "Please enter a valid question.",
                "AI RESPONSE:",
            ),
            _ => (
                "Describe what you'd like me to create: ",
                "Please enter a valid creative request.",
                "CREATIVE CONTENT:",
            ),
        };

        writeln!(
            self.output,
            "\n{} MODE",
            function_type.display_name().to_uppercase()
        )?;
        writeln!(self.output, "{}", THIN_RULE)?;

        let Some(style) = self.choose_style(function_type)? else {
            return Ok(false);
        };
        let Some(query) = self.ask(&format!("\n{}", label))? else {
            return Ok(false);
        };
        let query = query.trim().to_string();
        if query.is_empty() {
            writeln!(self.output, "{}", empty_message)?;
            return Ok(true);
        }

        self.respond(function_type, style, &query, query.clone(), heading)
            .await
    }

    async fn summarization_mode(&mut self) -> Result<bool> {
        let function_type = FunctionType::TextSummarization;
        writeln!(self.output, "\nTEXT SUMMARIZATION MODE")?;
        writeln!(self.output, "{}", THIN_RULE)?;

        let Some(style) = self.choose_style(function_type)? else {
            return Ok(false);
        };

        writeln!(self.output, "\nEnter the text you want summarized:")?;
        writeln!(
            self.output,
            "(Type '{}' on a new line when finished)",
            SUMMARY_TERMINATOR
        )?;

        let mut lines = Vec::new();
        loop {
            let Some(line) = self.ask("")? else {
                return Ok(false);
            };
            if line.trim().eq_ignore_ascii_case(SUMMARY_TERMINATOR) {
                break;
            }
            lines.push(line);
        }

        let text = lines.join("\n").trim().to_string();
        if text.is_empty() {
            writeln!(self.output, "Please enter some text to summarize.")?;
            return Ok(true);
        }

        let excerpt = format!(
            "{}...",
            text.chars().take(FEEDBACK_EXCERPT_CHARS).collect::<String>()
        );
        self.respond(function_type, style, &text, excerpt, "SUMMARY:")
            .await
    }

    /// Call the model, show the result, record and collect feedback on success.
    async fn respond(
        &mut self,
        function_type: FunctionType,
        style: &str,
        query: &str,
        feedback_query: String,
        heading: &str,
    ) -> Result<bool> {
        writeln!(self.output, "\nProcessing your request...")?;
        self.output.flush()?;

        let prompt = prompts::resolve(function_type.as_str(), style, query);
        let generation = generate(self.client, &prompt).await;

        writeln!(self.output, "\n{}", RULE)?;
        writeln!(self.output, "{}", heading)?;
        writeln!(self.output, "{}", RULE)?;
        writeln!(self.output, "{}", generation.display_text())?;
        writeln!(self.output, "{}", RULE)?;

        match generation.outcome {
            Ok(content) => {
                self.history
                    .record(function_type.as_str(), style, query, &content);
                self.collect_feedback(function_type, &feedback_query, &content)
            }
            Err(_) => Ok(true),
        }
    }

    fn collect_feedback(
        &mut self,
        function_type: FunctionType,
        query: &str,
        response: &str,
    ) -> Result<bool> {
        writeln!(self.output, "\n{}", RULE)?;
        writeln!(self.output, "FEEDBACK COLLECTION")?;
        writeln!(self.output, "{}", RULE)?;

        let rating = loop {
            let Some(raw) = self.ask("Rate this response (1-5): ")? else {
                return Ok(false);
            };
            match raw.trim().parse::<i64>() {
                Ok(value) => match validate_rating(value) {
                    Ok(_) => break value,
                    Err(_) => writeln!(self.output, "Please enter a number between 1 and 5.")?,
                },
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        };

        let suggestions = self
            .ask("Any suggestions for improvement? (optional): ")?
            .unwrap_or_default();

        let entry = NewFeedback::new(
            function_type.as_str(),
            query,
            response,
            rating,
            suggestions.trim(),
        )?
        .into_entry(Local::now());

        if let Err(e) = self.feedback.append(entry) {
            warn!(
                "Could not save feedback to {}: {}",
                self.feedback.path().display(),
                e
            );
            writeln!(self.output, "Warning: Could not save feedback: {}", e)?;
        }

        writeln!(
            self.output,
            "Thank you for your feedback! (Rating: {}/5)",
            rating
        )?;
        Ok(true)
    }

    fn show_history(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nSESSION HISTORY")?;
        writeln!(self.output, "{}", RULE)?;

        if self.history.is_empty() {
            return writeln!(self.output, "No interactions in this session yet.");
        }

        for (i, entry) in self.history.entries().iter().enumerate() {
            writeln!(
                self.output,
                "\n{}. [{}] {} ({})",
                i + 1,
                entry.timestamp.format("%H:%M:%S"),
                title_case(&entry.function_type),
                entry.style
            )?;
            writeln!(
                self.output,
                "   Query: {}",
                truncate_chars(&entry.query, HISTORY_QUERY_CHARS)
            )?;
            writeln!(self.output, "{}", THIN_RULE)?;
        }
        Ok(())
    }
}
