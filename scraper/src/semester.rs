use std::{fmt, str::FromStr};

use enum_iterator::{all, Sequence};
use serde::{Serialize, Serializer};

use crate::error::ParseError;

/// Academic session, ordered as it falls within a calendar year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence)]
pub enum Season {
    Winter,
    Summer,
    Fall,
}

impl Season {
    /// Lowercase label, as found on the participating-courses page.
    pub fn name(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    /// Label used in lecturecast video paths.
    pub fn capitalized(self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }

    /// Session number used by `courses.php`.
    pub fn code(self) -> u32 {
        match self {
            Self::Winter => 1,
            Self::Summer => 5,
            Self::Fall => 9,
        }
    }

    pub(crate) fn from_code(code: &str) -> Result<Self, ParseError> {
        all::<Season>()
            .find(|season| season.code().to_string() == code.trim())
            .ok_or_else(|| ParseError::UnknownSessionCode(code.to_owned()))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Season {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all::<Season>()
            .find(|season| season.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::UnknownSeason(s.to_owned()))
    }
}

/// A year and season, keyed as `"<year> <season>"`.
///
/// The year is kept as the text scraped from the page; it is normally four
/// digits but nothing downstream relies on that.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semester {
    pub year: String,
    pub season: Season,
}

impl Semester {
    pub fn new(year: impl Into<String>, season: Season) -> Self {
        Self {
            year: year.into(),
            season,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.season)
    }
}

impl FromStr for Semester {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, season) = s
            .split_once(' ')
            .ok_or_else(|| ParseError::MalformedSemester(s.to_owned()))?;

        if year.is_empty() {
            return Err(ParseError::MalformedSemester(s.to_owned()));
        }

        Ok(Self::new(year, season.parse()?))
    }
}

impl Serialize for Semester {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_display() {
        let semester: Semester = "2022 winter".parse().unwrap();
        assert_eq!(semester, Semester::new("2022", Season::Winter));
        assert_eq!(semester.to_string(), "2022 winter");
    }

    #[test]
    fn season_is_case_insensitive() {
        let semester: Semester = "2021 FALL".parse().unwrap();
        assert_eq!(semester.season, Season::Fall);
        assert_eq!(semester.to_string(), "2021 fall");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(matches!(
            "2021fall".parse::<Semester>(),
            Err(ParseError::MalformedSemester(_))
        ));
        assert!(matches!(
            "2021 spring".parse::<Semester>(),
            Err(ParseError::UnknownSeason(_))
        ));
    }

    #[test]
    fn session_codes() {
        assert_eq!(Season::Winter.code(), 1);
        assert_eq!(Season::Summer.code(), 5);
        assert_eq!(Season::Fall.code(), 9);
        assert_eq!(Season::from_code("5").unwrap(), Season::Summer);
        assert!(Season::from_code("3").is_err());
    }

    #[test]
    fn semesters_sort_chronologically() {
        let mut semesters = vec![
            Semester::new("2021", Season::Fall),
            Semester::new("2022", Season::Winter),
            Semester::new("2021", Season::Winter),
            Semester::new("2021", Season::Summer),
        ];
        semesters.sort();

        let keys: Vec<String> = semesters.iter().map(Semester::to_string).collect();
        assert_eq!(
            keys,
            ["2021 winter", "2021 summer", "2021 fall", "2022 winter"]
        );
    }

    #[test]
    fn serializes_as_key() {
        let json = serde_json::to_string(&Semester::new("2020", Season::Summer)).unwrap();
        assert_eq!(json, "\"2020 summer\"");
    }
}
