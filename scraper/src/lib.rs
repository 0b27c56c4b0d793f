use std::collections::BTreeMap;

use anyhow::Result;
use log::{info, warn};

mod config;
mod error;
mod locate;
mod parse;
mod probe;
mod semester;
mod source;
#[cfg(test)]
mod testing;

pub use config::{AuthScope, Config, RequestKind};
pub use error::{ParseError, ScrapeError};
pub use locate::{semester_links_from_html, SemesterLinks};
pub use parse::{classify_row_shape, remove_non_alphanumeric, CourseRecord, FieldLayout};
pub use probe::{lecture_label, lecture_url};
pub use semester::{Season, Semester};
pub use source::{HttpSource, PageSource};

/// Courses read from one listing page.
///
/// Listing pages are scraped fail-soft: when a request fails partway
/// through, the courses built before the failure are kept and the failure is
/// reported alongside them.
#[derive(Debug, Default)]
pub struct CourseListing {
    pub courses: Vec<CourseRecord>,
    /// Rows that did not have enough cells to read a course from.
    pub skipped: usize,
    pub error: Option<ScrapeError>,
}

pub struct Scraper<S> {
    source: S,
    config: Config,
}

impl Scraper<HttpSource> {
    pub fn from_config(config: Config) -> Result<Self> {
        Ok(Self::new(HttpSource::new(&config)?, config))
    }
}

impl<S: PageSource> Scraper<S> {
    pub fn new(source: S, config: Config) -> Self {
        Self { source, config }
    }

    /// Read every course listed at `link`. Lecture links are probed only when
    /// a semester is given.
    pub async fn fetch_courses(&self, link: &str, semester: Option<&Semester>) -> CourseListing {
        let mut listing = CourseListing::default();

        if let Err(error) = self.fill_listing(link, semester, &mut listing).await {
            warn!(
                "{}: stopped after {} courses: {}",
                link,
                listing.courses.len(),
                error.chain()
            );
            listing.error = Some(error);
        }

        listing
    }

    async fn fill_listing(
        &self,
        link: &str,
        semester: Option<&Semester>,
        listing: &mut CourseListing,
    ) -> Result<(), ScrapeError> {
        let page = self
            .source
            .get_text(link)
            .await
            .map_err(|e| ScrapeError::request(link, e))?;

        for run in parse::token_runs(&page)? {
            match self.build_course(run, semester).await {
                Ok(course) => listing.courses.push(course),
                Err(ScrapeError::Parse(error)) => {
                    warn!("{}: skipping row: {}", link, error);
                    listing.skipped += 1;
                }
                Err(error) => return Err(error),
            }
        }

        Ok(())
    }

    pub async fn build_course(
        &self,
        run: Vec<String>,
        semester: Option<&Semester>,
    ) -> Result<CourseRecord, ScrapeError> {
        let mut course = CourseRecord::from_tokens(run)?;

        if let Some(semester) = semester {
            course.links = self.probe_links(&course.code, semester).await?;
        }

        Ok(course)
    }

    /// Courses of a single semester, read from its derived listing page.
    pub async fn scrape_semester(&self, semester: &Semester) -> CourseListing {
        let link = self.semester_listing_url(semester);
        self.fetch_courses(&link, self.probe_for(semester)).await
    }

    /// Every located semester with its web-optioned courses.
    pub async fn scrape_all(&self) -> Result<BTreeMap<Semester, Vec<CourseRecord>>, ScrapeError> {
        let mut semesters = BTreeMap::new();

        for (semester, link) in self.locate().await? {
            info!("scraping {} from {}", semester, link);
            let listing = self.fetch_courses(&link, self.probe_for(&semester)).await;
            info!("{}: {} courses", semester, listing.courses.len());
            semesters.insert(semester, listing.courses);
        }

        Ok(semesters)
    }

    fn probe_for<'a>(&self, semester: &'a Semester) -> Option<&'a Semester> {
        self.config.probe_links.then_some(semester)
    }
}
