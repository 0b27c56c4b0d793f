use std::collections::BTreeMap;

use enum_iterator::all;
use itertools::Itertools;
use log::{debug, info, warn};
use select::{
    document::Document,
    predicate::{Attr, Name, Predicate},
};

use crate::{
    error::ScrapeError,
    semester::{Season, Semester},
    source::PageSource,
    Scraper,
};

const START_MARKER: &str = "UTSC Courses";
const END_MARKER: &str = "St. George Courses";

pub type SemesterLinks = BTreeMap<Semester, String>;

impl<S: PageSource> Scraper<S> {
    /// Map every semester listed on the participating-courses page to the
    /// page listing its web-optioned courses.
    pub async fn locate(&self) -> Result<SemesterLinks, ScrapeError> {
        let url = &self.config.listing_url;
        let page = self
            .source
            .get_text(url)
            .await
            .map_err(|e| ScrapeError::request(url, e))?;

        let links = semester_links_from_html(&page);
        info!("found {} semesters on {}", links.len(), url);
        Ok(links)
    }

    pub async fn semesters(&self) -> Result<Vec<Semester>, ScrapeError> {
        Ok(self.locate().await?.into_keys().collect())
    }

    /// The listing page for a semester, built from its year and session code
    /// rather than scraped.
    pub fn semester_listing_url(&self, semester: &Semester) -> String {
        format!(
            "{}?year={}&session={}",
            self.config.course_listing_base,
            semester.year,
            semester.season.code()
        )
    }
}

pub fn semester_links_from_html(page: &str) -> SemesterLinks {
    let mut links = SemesterLinks::new();

    let Some(tray) = utsc_tray(page) else {
        warn!("{START_MARKER:?} .. {END_MARKER:?} section not found");
        return links;
    };
    let tray = tray.to_lowercase();

    for (season, section) in season_sections(&tray) {
        let document = Document::from(section);

        for anchor in document.find(Name("a").and(Attr("href", ()))) {
            let Some(href) = anchor.attr("href") else {
                continue;
            };

            let text = anchor.text().replace(',', "");
            let Some(year) = trailing_chars(text.trim_end(), 4) else {
                debug!("skipping {season} anchor without text: {href}");
                continue;
            };

            if let Some(linked) = linked_season(href).filter(|&linked| linked != season) {
                warn!("{href} is listed under {season} but links to {linked}");
            }

            links.insert(Semester::new(year, season), href.to_owned());
        }
    }

    links
}

/// The part of the page between the UTSC and St. George headings.
fn utsc_tray(page: &str) -> Option<&str> {
    let start = page.find(START_MARKER)?;
    let end = page.find(END_MARKER)?;
    page.get(start..end)
}

/// Split the tray into one section per season.
///
/// Assumes the seasons are introduced in the order winter, summer, fall: each
/// section runs from the first mention of its season to the first mention of
/// the next one. A season that is never mentioned gets no section, and one
/// that is mentioned after its successor gets an empty one.
fn season_sections(tray: &str) -> Vec<(Season, &str)> {
    let starts: Vec<(Season, Option<usize>)> = all::<Season>()
        .map(|season| (season, tray.find(season.name())))
        .collect();

    starts
        .iter()
        .tuple_windows()
        .map(|(&current, &(_, next))| (current, next))
        .chain(starts.last().map(|&(season, start)| ((season, start), None)))
        .filter_map(|((season, start), next)| {
            let start = start?;
            let end = next.unwrap_or(tray.len());
            Some((season, tray.get(start..end).unwrap_or("")))
        })
        .collect()
}

/// The season a `courses.php` link asks for, from its `session=` code.
fn linked_season(href: &str) -> Option<Season> {
    let (_, query) = href.split_once('?')?;
    let code = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("session="))?;
    Season::from_code(code).ok()
}

fn trailing_chars(text: &str, n: usize) -> Option<&str> {
    if text.is_empty() {
        return None;
    }
    let start = text
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(index, _)| index);
    Some(&text[start..])
}
