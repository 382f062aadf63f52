use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Buy-in brackets offered as a catalog filter.
///
/// Each bracket excludes its lower bound and includes its upper one, so
/// every positive amount lands in exactly one bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuyinRange {
    #[default]
    All,
    UpTo500,
    From500To1000,
    From1000To5000,
    Above5000,
}

impl BuyinRange {
    pub const ALL_RANGES: [BuyinRange; 5] = [
        BuyinRange::All,
        BuyinRange::UpTo500,
        BuyinRange::From500To1000,
        BuyinRange::From1000To5000,
        BuyinRange::Above5000,
    ];

    fn bounds(self) -> Option<(f64, Option<f64>)> {
        match self {
            BuyinRange::All => None,
            BuyinRange::UpTo500 => Some((0.0, Some(500.0))),
            BuyinRange::From500To1000 => Some((500.0, Some(1000.0))),
            BuyinRange::From1000To5000 => Some((1000.0, Some(5000.0))),
            BuyinRange::Above5000 => Some((5000.0, None)),
        }
    }

    /// `All` admits everything; other ranges exclude unknown buy-ins.
    pub fn contains(self, amount: Option<f64>) -> bool {
        let Some((lower, upper)) = self.bounds() else {
            return true;
        };
        match amount {
            Some(amount) => amount > lower && upper.is_none_or(|upper| amount <= upper),
            None => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BuyinRange::All => "All Buy-ins",
            BuyinRange::UpTo500 => "$0-$500",
            BuyinRange::From500To1000 => "$500-$1,000",
            BuyinRange::From1000To5000 => "$1,000-$5,000",
            BuyinRange::Above5000 => "$5,000+",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            BuyinRange::All => "all",
            BuyinRange::UpTo500 => "0-500",
            BuyinRange::From500To1000 => "500-1000",
            BuyinRange::From1000To5000 => "1000-5000",
            BuyinRange::Above5000 => "5000+",
        }
    }
}

impl fmt::Display for BuyinRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuyinRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        match Self::ALL_RANGES
            .into_iter()
            .find(|range| range.key().eq_ignore_ascii_case(wanted) || range.label() == wanted)
        {
            Some(range) => Ok(range),
            None => bail!(
                "Unknown buy-in range '{}', expected one of: {}",
                s,
                Self::ALL_RANGES.map(BuyinRange::key).join(", ")
            ),
        }
    }
}
