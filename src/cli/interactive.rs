//! Event driven converter session: user commands and fetch completions are
//! handled on one task as they arrive.

use super::{ui, view};
use crate::core::{ConversionRequest, ConversionState, RateFetcher, RateSnapshot};
use anyhow::{Context, Result, anyhow};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

pub const HELP: &str = "\
Commands:
  from <CODE>     convert from this currency (fetches new rates)
  to <CODE>       convert into this currency
  amount <N>, <N> set the amount to convert
  swap            exchange the two currencies
  currencies      list the available currencies
  show            render the converter again
  help            show this message
  quit            leave the session";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Base(String),
    Target(String),
    Amount(String),
    Swap,
    Currencies,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.parse::<f64>().is_ok() {
            return Ok(Command::Amount(s.to_string()));
        }

        let (word, arg) = match s.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (s, ""),
        };
        let code = || {
            if arg.is_empty() {
                Err(anyhow!("Usage: {} <CODE>", word.to_lowercase()))
            } else {
                Ok(arg.to_ascii_uppercase())
            }
        };

        match word.to_lowercase().as_str() {
            "from" | "base" => Ok(Command::Base(code()?)),
            "to" | "target" => Ok(Command::Target(code()?)),
            "amount" => Ok(Command::Amount(arg.to_string())),
            "swap" => Ok(Command::Swap),
            "currencies" | "list" => Ok(Command::Currencies),
            "show" => Ok(Command::Show),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(anyhow!(
                "Unknown command: {s}. Type 'help' for a list of commands"
            )),
        }
    }
}

/// What the caller should do after a command was handled.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Render,
    Print(String),
    Quit,
}

pub struct Session {
    state: ConversionState,
    fetcher: Arc<dyn RateFetcher>,
    tx: mpsc::UnboundedSender<Result<RateSnapshot>>,
    rx: mpsc::UnboundedReceiver<Result<RateSnapshot>>,
}

impl Session {
    pub fn new(fetcher: Arc<dyn RateFetcher>, request: ConversionRequest) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Session {
            state: ConversionState::new(request),
            fetcher,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    /// Starts a fetch in the background. Earlier fetches keep running and
    /// their results are still applied when they land.
    pub fn request_fetch(&self, base: String) {
        debug!(%base, "Spawning rate fetch");
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch_snapshot(&base).await;
            // The receiver only goes away when the session ends.
            let _ = tx.send(result);
        });
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Base(code) => {
                if let Some(base) = self.state.set_base(&code) {
                    self.request_fetch(base);
                }
                Flow::Render
            }
            Command::Target(code) => {
                self.state.set_target(&code);
                Flow::Render
            }
            Command::Amount(text) => {
                self.state.set_amount_text(&text);
                Flow::Render
            }
            Command::Swap => {
                if let Some(base) = self.state.swap() {
                    self.request_fetch(base);
                }
                Flow::Render
            }
            Command::Currencies => Flow::Print(
                self.state
                    .snapshot()
                    .map(view::render_currencies)
                    .unwrap_or_else(|| "No rates loaded yet".to_string()),
            ),
            Command::Show => Flow::Render,
            Command::Help => Flow::Print(HELP.to_string()),
            Command::Quit => Flow::Quit,
        }
    }

    /// Waits for the next fetch to finish and applies it. Cancel safe: nothing
    /// awaits after the result is received.
    pub async fn next_completion(&mut self) {
        if let Some(result) = self.rx.recv().await {
            self.state.apply_fetch(result);
        }
    }

    fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "{}\n", view::render(&self.state))?;
        write!(out, "> ")?;
        out.flush()?;
        Ok(())
    }

    pub async fn run<R, W>(mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        info!("Starting converter session");
        self.request_fetch(self.state.request().base_currency.clone());
        self.render(out)?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read input")? else {
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => match self.handle(command) {
                            Flow::Render => self.render(out)?,
                            Flow::Print(text) => {
                                write!(out, "{text}\n> ")?;
                                out.flush()?;
                            }
                            Flow::Quit => break,
                        },
                        Err(e) => {
                            let message = ui::style_text(&e.to_string(), ui::StyleType::Error);
                            write!(out, "{message}\n> ")?;
                            out.flush()?;
                        }
                    }
                }
                () = self.next_completion() => self.render(out)?,
            }
        }

        info!("Converter session ended");
        Ok(())
    }
}
