use std::time::Duration;

use futures::{stream, StreamExt, TryStreamExt};
use log::debug;

use crate::{
    error::ScrapeError,
    semester::{Season, Semester},
    source::PageSource,
    Scraper,
};

/// Two-digit lecture number used in lecturecast paths.
pub fn lecture_label(lecture: u32) -> String {
    format!("{lecture:02}")
}

pub fn lecture_url(base: &str, code: &str, year: &str, season: Season, lecture: u32) -> String {
    let season = season.capitalized();
    let name = format!("{code}_Lecture_{}", lecture_label(lecture));
    format!("{base}/{year}_{season}/{code}/{name}/{name}.mp4")
}

impl<S: PageSource> Scraper<S> {
    /// Lecture videos of `code` that exist for `semester`, in lecture order.
    ///
    /// The lecture host is probed one URL at a time unless
    /// `probe_concurrency` says otherwise; it blocks clients that fire many
    /// requests at once, so keep any increase small and pair it with
    /// `probe_delay_ms`.
    pub async fn probe_links(
        &self,
        code: &str,
        semester: &Semester,
    ) -> Result<Vec<String>, ScrapeError> {
        let candidates = (1..=self.config.last_lecture).map(|lecture| {
            lecture_url(
                &self.config.lecture_base,
                code,
                &semester.year,
                semester.season,
                lecture,
            )
        });

        let delay = Duration::from_millis(self.config.probe_delay_ms);
        let found: Vec<Option<String>> = stream::iter(candidates)
            .map(|url| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let exists = self
                    .source
                    .exists(&url)
                    .await
                    .map_err(|e| ScrapeError::request(&url, e))?;
                debug!("{} {}", if exists { "found" } else { "missing" }, url);
                Ok::<_, ScrapeError>(exists.then_some(url))
            })
            .buffered(self.config.probe_concurrency.max(1))
            .try_collect()
            .await?;

        Ok(found.into_iter().flatten().collect())
    }
}
