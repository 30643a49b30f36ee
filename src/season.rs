//! Meteorological seasons used to group time steps.

use crate::errors::ClimError;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// A three-month meteorological season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Season {
    /// December, January, February
    #[value(name = "DJF")]
    Djf,
    /// March, April, May
    #[value(name = "MAM")]
    Mam,
    /// June, July, August
    #[value(name = "JJA")]
    Jja,
    /// September, October, November
    #[value(name = "SON")]
    Son,
}

impl Season {
    /// All seasons in calendar order, starting with DJF
    pub const ALL: [Season; 4] = [Season::Djf, Season::Mam, Season::Jja, Season::Son];

    /// Label as used on plots and in the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Djf => "DJF",
            Self::Mam => "MAM",
            Self::Jja => "JJA",
            Self::Son => "SON",
        }
    }

    /// Season containing a calendar month (1 = January).
    ///
    /// Returns `None` for month numbers outside 1..=12.
    #[must_use]
    pub const fn from_month(month: u32) -> Option<Self> {
        match month {
            12 | 1 | 2 => Some(Self::Djf),
            3..=5 => Some(Self::Mam),
            6..=8 => Some(Self::Jja),
            9..=11 => Some(Self::Son),
            _ => None,
        }
    }

    /// The three months of the season
    #[must_use]
    pub const fn months(self) -> [u32; 3] {
        match self {
            Self::Djf => [12, 1, 2],
            Self::Mam => [3, 4, 5],
            Self::Jja => [6, 7, 8],
            Self::Son => [9, 10, 11],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ClimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|season| season.as_str() == s)
            .ok_or_else(|| ClimError::InvalidSeason(s.to_string()))
    }
}
