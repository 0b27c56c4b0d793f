use std::{borrow::Cow, sync::LazyLock};

use itertools::Itertools;
use regex::{Captures, Regex};
use select::{
    document::Document,
    predicate::{Attr, Class, Name, Predicate},
};
use serde::Serialize;

use crate::error::ParseError;

/// Text cells that close one course's run of tokens.
const ROW_DELIMITERS: [&str; 2] = ["\u{a0}\n\t\t", "\u{a0}\n"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub dept: String,
    pub code: String,
    pub lecture: String,
    pub title: String,
    pub prof: String,
    pub links: Vec<String>,
}

/// Token positions of each field within a course run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    pub dept: usize,
    pub code: usize,
    pub lecture: Option<usize>,
    pub title: usize,
    pub prof: usize,
}

impl FieldLayout {
    pub fn min_len(&self) -> usize {
        self.prof + 1
    }
}

/// Rows with more than 8 tokens carry an extra lecture-section column after
/// the course code, which pushes title and professor one cell to the right.
pub fn classify_row_shape(token_count: usize) -> FieldLayout {
    let offset = usize::from(token_count > 8);
    FieldLayout {
        dept: 1,
        code: 3,
        lecture: (offset == 1).then_some(4),
        title: 5 + offset,
        prof: 6 + offset,
    }
}

pub fn remove_non_alphanumeric(s: &str, preserve_space: bool) -> String {
    s.chars()
        .filter(|c| c.is_alphabetic() || c.is_numeric() || (preserve_space && c.is_whitespace()))
        .collect()
}

impl CourseRecord {
    /// Build a record without links from one run of table text.
    pub fn from_tokens(mut run: Vec<String>) -> Result<Self, ParseError> {
        if let Some(space) = run.iter().position(|token| token == " ") {
            run.remove(space);
        }

        let layout = classify_row_shape(run.len());
        if run.len() < layout.min_len() {
            return Err(ParseError::RowTooShort {
                len: run.len(),
                needed: layout.min_len(),
            });
        }

        Ok(CourseRecord {
            dept: run[layout.dept].clone(),
            code: remove_non_alphanumeric(&run[layout.code], false),
            lecture: layout
                .lecture
                .map(|index| run[index].clone())
                .unwrap_or_default(),
            title: remove_non_alphanumeric(&run[layout.title], true),
            prof: run[layout.prof].trim().to_owned(),
            links: Vec::new(),
        })
    }
}

/// Every text node under the first `<tr class="style1">`, cut into one run
/// per course.
///
/// The listing pages leave their rows open, so every course after the first
/// sits inside the first row, and the row delimiters are bare text between
/// cells. Table tags are rewritten to `<div>`s before parsing so that markup
/// keeps that shape instead of being rebuilt into sibling rows with the bare
/// text moved in front of the table.
pub fn token_runs(source: &str) -> Result<Vec<Vec<String>>, ParseError> {
    let document = Document::from(flatten_table_tags(source).as_ref());

    let row = document
        .find(
            Name("div")
                .and(Attr(TABLE_TAG_ATTR, "tr"))
                .and(Class("style1")),
        )
        .next()
        .ok_or(ParseError::RowNotFound)?;

    let tokens = row
        .descendants()
        .filter_map(|node| node.as_text())
        .map(str::to_owned)
        .collect();

    Ok(split_runs(tokens))
}

const TABLE_TAG_ATTR: &str = "data-table-tag";

fn flatten_table_tags(source: &str) -> Cow<'_, str> {
    static TABLE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)<(/?)(table|thead|tbody|tfoot|tr|th|td)\b").unwrap()
    });

    TABLE_TAG_RE.replace_all(source, |caps: &Captures| {
        if caps[1].is_empty() {
            format!("<div {TABLE_TAG_ATTR}=\"{}\"", caps[2].to_ascii_lowercase())
        } else {
            "</div".to_owned()
        }
    })
}

/// Tokens after the last delimiter do not form a run.
pub fn split_runs(tokens: Vec<String>) -> Vec<Vec<String>> {
    let delimiters = tokens
        .iter()
        .positions(|token| ROW_DELIMITERS.contains(&token.as_str()))
        .collect::<Vec<_>>();

    let mut start = 0;
    delimiters
        .into_iter()
        .map(|end| {
            let run = tokens[start..end].to_vec();
            start = end + 1;
            run
        })
        .collect()
}
