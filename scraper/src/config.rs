use std::collections::BTreeMap;

use serde::Deserialize;

pub const PARTICIPATING_COURSES_URL: &str =
    "https://www.utsc.utoronto.ca/weboption/participating-courses";
pub const LECTURE_BASE_URL: &str = "https://lecturecast.utsc.utoronto.ca/lectures";
pub const COURSE_LISTING_URL: &str = "http://lecturecast.utsc.utoronto.ca/courses.php";

/// Which requests carry the configured auth headers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScope {
    /// Only the lecture existence probes.
    #[default]
    Probes,
    /// Page fetches as well as probes.
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestKind {
    Page,
    Probe,
}

impl AuthScope {
    pub fn covers(self, kind: RequestKind) -> bool {
        match self {
            Self::All => true,
            Self::Probes => kind == RequestKind::Probe,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listing_url: String,
    pub lecture_base: String,
    pub course_listing_base: String,
    /// Lectures 1 through `last_lecture` are probed for every course.
    pub last_lecture: u32,
    pub probe_links: bool,
    /// Probes in flight at once. Keep this low: the lecture host throttles
    /// clients that fan out.
    pub probe_concurrency: usize,
    pub probe_delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub auth_headers: BTreeMap<String, String>,
    pub auth_scope: AuthScope,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listing_url: PARTICIPATING_COURSES_URL.to_owned(),
            lecture_base: LECTURE_BASE_URL.to_owned(),
            course_listing_base: COURSE_LISTING_URL.to_owned(),
            last_lecture: 13,
            probe_links: true,
            probe_concurrency: 1,
            probe_delay_ms: 0,
            timeout_secs: 30,
            user_agent: concat!("weboption/", env!("CARGO_PKG_VERSION")).to_owned(),
            auth_headers: BTreeMap::new(),
            auth_scope: AuthScope::default(),
        }
    }
}
