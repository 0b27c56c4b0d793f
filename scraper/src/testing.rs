use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::time::Instant;

use crate::source::PageSource;

/// In-memory pages and lecture files.
#[derive(Default)]
pub struct StubSource {
    pages: HashMap<String, String>,
    files: HashSet<String>,
    broken: HashSet<String>,
    probed: Mutex<Vec<(String, Instant)>>,
}

impl StubSource {
    pub fn page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_owned(), body.into());
        self
    }

    pub fn file(mut self, url: &str) -> Self {
        self.files.insert(url.to_owned());
        self
    }

    /// Probing `url` fails as if the connection dropped.
    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_owned());
        self
    }

    pub fn probed(&self) -> Vec<String> {
        let probed = self.probed.lock().unwrap();
        probed.iter().map(|(url, _)| url.clone()).collect()
    }

    /// When each probe reached the source.
    pub fn probe_times(&self) -> Vec<Instant> {
        let probed = self.probed.lock().unwrap();
        probed.iter().map(|&(_, at)| at).collect()
    }
}

#[async_trait]
impl PageSource for StubSource {
    async fn get_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {url}"))
    }

    async fn exists(&self, url: &str) -> Result<bool> {
        self.probed
            .lock()
            .unwrap()
            .push((url.to_owned(), Instant::now()));
        if self.broken.contains(url) {
            return Err(anyhow!("connection reset: {url}"));
        }
        Ok(self.files.contains(url))
    }
}

/// A course table whose runs are separated by the `&nbsp;` delimiter cells.
pub fn course_page(runs: &[&[&str]]) -> String {
    let cells: String = runs
        .iter()
        .map(|run| {
            let mut row: String = run.iter().map(|token| format!("<td>{token}</td>")).collect();
            row.push_str("<td>&nbsp;\n</td>");
            row
        })
        .collect();

    format!(
        "<html><body><table><tr><td>header</td></tr>\
         <tr class=\"style1\">{cells}</tr></table></body></html>"
    )
}

/// A course table as the listing pages serve it: rows left open, so each
/// course nests in the previous one, and delimiters as bare text after the
/// last cell.
pub fn open_row_page(runs: &[&[&str]]) -> String {
    let rows: String = runs
        .iter()
        .map(|run| {
            let cells: String = run.iter().map(|token| format!("<td>{token}</td>")).collect();
            format!("<tr class=\"style1\">{cells}&nbsp;\n\t\t")
        })
        .collect();

    format!("<html><body><table><tr><td>header</td></tr>{rows}</table></body></html>")
}
