//! Quote streams replayed from JSON lines.
//!
//! Each non-blank line is one [`QuoteEvent`]:
//!
//! ```text
//! {"token_id":"p-yes","best_bid":"0.54","best_bid_size":100,"best_ask":"0.55","best_ask_size":120,"sequence":1}
//! ```

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use crate::domain::QuoteEvent;
use crate::error::Result;
use crate::runtime::QuoteStream;

type LineSource = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// A [`QuoteStream`] over a JSON-lines source.
pub struct ReplayStream {
    lines: LineSource,
    line_number: usize,
    finished: bool,
}

impl ReplayStream {
    /// Open a JSON-lines file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).await?;
        debug!(path = %path.as_ref().display(), "Opened quote replay file");
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Replay from any buffered reader.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let boxed: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: boxed.lines(),
            line_number: 0,
            finished: false,
        }
    }

    /// Line number of the last line read, starting at 1.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line_number
    }
}

#[async_trait]
impl QuoteStream for ReplayStream {
    async fn next_event(&mut self) -> Option<Result<QuoteEvent>> {
        while !self.finished {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    self.line_number += 1;
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(line).map_err(Into::into));
                }
                Ok(None) => self.finished = true,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
        None
    }

    fn source_name(&self) -> &'static str {
        "replay"
    }
}
