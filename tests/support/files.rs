use std::fs;
use std::path::PathBuf;

use rangearb::adapter::{Catalog, MarketRecord};
use rangearb::domain::{Market, QuoteEvent};
use tempfile::TempDir;

/// A temporary directory holding the input files of one test.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }

    /// Write markets as a catalog file.
    pub fn catalog(&self, markets: &[Market]) -> PathBuf {
        let catalog = Catalog {
            markets: markets.iter().map(record).collect(),
        };
        let json = serde_json::to_string_pretty(&catalog).expect("encode catalog");
        self.write("catalog.json", &json)
    }

    /// Write events as a JSON-lines quote file.
    pub fn quotes(&self, events: &[QuoteEvent]) -> PathBuf {
        let lines: Vec<String> = events
            .iter()
            .map(|e| serde_json::to_string(e).expect("encode event"))
            .collect();
        self.write("quotes.jsonl", &lines.join("\n"))
    }

    pub fn config(&self, contents: &str) -> PathBuf {
        self.write("config.toml", contents)
    }
}

fn record(market: &Market) -> MarketRecord {
    MarketRecord {
        condition_id: market.condition_id().clone(),
        question: market.question().to_string(),
        yes_token: market.yes_token().clone(),
        no_token: market.no_token().clone(),
        kind: market.kind(),
        lower: market.range().and_then(|r| r.lower()),
        upper: market.range().and_then(|r| r.upper()),
        parent: market.parent().cloned(),
    }
}
