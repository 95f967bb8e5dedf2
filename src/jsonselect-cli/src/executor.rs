//! Selector execution engine for the jsel CLI
//!
//! Loads the input documents, runs one selector over all of them through a
//! cached [`SelectorExecutor`] and prints the result in the requested mode.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use jsonselect::{Document, ExecutionStats, ParseError, Selection, SelectorExecutor, Text};
use serde_json::Value;

use crate::cli::OutputMode;
use crate::config::Config;
use crate::output::OutputWriter;

/// Main executor for jsel operations
pub struct Executor {
    config: Config,
    selectors: SelectorExecutor,
    writer: OutputWriter,
}

impl Executor {
    /// Create a new executor with the given configuration
    pub fn new(config: Config) -> Self {
        let selectors = SelectorExecutor::with_config(config.to_executor_config());
        let writer = OutputWriter::new(config.output.clone());
        Self {
            config,
            selectors,
            writer,
        }
    }

    /// The configuration this executor runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that `selector` parses
    pub fn validate_selector(&self, selector: &str) -> std::result::Result<(), ParseError> {
        self.selectors.validate(selector)
    }

    /// The parsed form of `selector` as pretty JSON
    pub fn explain_selector(&mut self, selector: &str) -> Result<String> {
        let parsed = self.selectors.compile(selector)?;
        Ok(serde_json::to_string_pretty(&*parsed)?)
    }

    /// Read every input file, or stdin when there are none
    pub fn load_documents(&self, files: &[PathBuf]) -> Result<Vec<Document>> {
        if files.is_empty() {
            return Ok(vec![self.read_from_stdin()?]);
        }
        files.iter().map(|path| self.read_input(path)).collect()
    }

    /// Read one input file
    pub fn read_input(&self, path: &Path) -> Result<Document> {
        Document::from_path(path).with_context(|| format!("Failed to load {}", path.display()))
    }

    fn read_from_stdin(&self) -> Result<Document> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            log::warn!("reading JSON from the terminal, end the input with Ctrl-D");
        }
        Document::from_reader(stdin.lock()).context("Failed to read JSON from stdin")
    }

    /// Run `selector` over `documents` in order and print the result.
    ///
    /// Returns the number of matches.
    pub fn execute<W: Write>(
        &mut self,
        selector: &str,
        mode: OutputMode,
        documents: &[Document],
        out: &mut W,
    ) -> Result<usize> {
        if mode == OutputMode::Ast {
            writeln!(out, "{}", self.explain_selector(selector)?)?;
            return Ok(0);
        }

        let matches = self.collect(selector, documents)?;
        let count = matches.len();

        #[cfg(feature = "profiling")]
        coz::progress!("selection_complete");

        match mode {
            OutputMode::Values => self.writer.write_values(out, matches)?,
            OutputMode::Count => writeln!(out, "{}", count)?,
            OutputMode::Text => match Selection::new(matches).text() {
                Text::Empty => {}
                text => writeln!(out, "{}", text)?,
            },
            OutputMode::Ast => {}
        }

        if let Some(stats) = self.selectors.stats() {
            log::info!(
                "{} matches, {} nodes visited, cache hit rate {:.2}, {:?}",
                stats.matches_returned,
                stats.nodes_visited,
                stats.cache_hit_rate(),
                stats.execution_time
            );
        }

        Ok(count)
    }

    fn collect<'d>(&mut self, selector: &str, documents: &'d [Document]) -> Result<Vec<&'d Value>> {
        let mut matches = Vec::new();
        for document in documents {
            if self.config.select.first_only {
                if let Some(found) = self.selectors.select_first(selector, document.root())? {
                    matches.push(found);
                    break;
                }
            } else {
                matches.extend(self.selectors.select(selector, document.root())?);
            }
        }
        Ok(matches)
    }

    /// Statistics, when the configuration asked for them
    pub fn stats(&self) -> Option<&ExecutionStats> {
        self.selectors.stats()
    }
}
