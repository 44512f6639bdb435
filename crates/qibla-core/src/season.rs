//! Summer/winter selection for seasonal rules.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Which calendar months count as summer.
///
/// Cutover dates differ between venues and hemispheres, so this is data
/// rather than a fixed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeasonPolicy")]
pub struct SeasonPolicy {
    summer_months: BTreeSet<u32>,
}

#[derive(Deserialize)]
struct RawSeasonPolicy {
    summer_months: Vec<u32>,
}

impl SeasonPolicy {
    /// Creates a policy from month numbers (1 = January).
    pub fn new(summer_months: impl IntoIterator<Item = u32>) -> Result<Self, EngineError> {
        let summer_months = summer_months
            .into_iter()
            .map(|month| {
                if (1..=12).contains(&month) {
                    Ok(month)
                } else {
                    Err(EngineError::InvalidSeasonMonth { month })
                }
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { summer_months })
    }

    /// Southern-hemisphere summer: October through March.
    pub fn southern() -> Self {
        Self {
            summer_months: [10, 11, 12, 1, 2, 3].into_iter().collect(),
        }
    }

    /// Northern-hemisphere summer: April through September.
    pub fn northern() -> Self {
        Self {
            summer_months: (4..=9).collect(),
        }
    }

    pub fn is_summer(&self, date: NaiveDate) -> bool {
        self.summer_months.contains(&date.month())
    }

    /// Summer months in calendar order.
    pub fn summer_months(&self) -> impl Iterator<Item = u32> + '_ {
        self.summer_months.iter().copied()
    }
}

impl Default for SeasonPolicy {
    fn default() -> Self {
        Self::southern()
    }
}

impl TryFrom<RawSeasonPolicy> for SeasonPolicy {
    type Error = EngineError;

    fn try_from(raw: RawSeasonPolicy) -> Result<Self, Self::Error> {
        Self::new(raw.summer_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_is_southern_hemisphere() {
        let policy = SeasonPolicy::default();
        assert!(policy.is_summer(date(2025, 1, 15)));
        assert!(policy.is_summer(date(2025, 3, 31)));
        assert!(!policy.is_summer(date(2025, 4, 1)));
        assert!(!policy.is_summer(date(2025, 9, 30)));
        assert!(policy.is_summer(date(2025, 10, 1)));
        assert!(policy.is_summer(date(2025, 12, 25)));
    }

    #[test]
    fn test_northern_is_the_complement() {
        let north = SeasonPolicy::northern();
        let south = SeasonPolicy::southern();
        for month in 1..=12 {
            let d = date(2025, month, 1);
            assert_ne!(north.is_summer(d), south.is_summer(d), "month {month}");
        }
    }

    #[test]
    fn test_rejects_invalid_months() {
        assert_eq!(
            SeasonPolicy::new([6, 13]).unwrap_err(),
            EngineError::InvalidSeasonMonth { month: 13 }
        );
        assert!(SeasonPolicy::new([0]).is_err());
        assert!(SeasonPolicy::new([]).is_ok());
    }

    #[test]
    fn test_deserializes_and_validates() {
        let policy: SeasonPolicy = serde_json::from_str(r#"{"summer_months": [6, 7, 8]}"#).unwrap();
        assert_eq!(policy.summer_months().collect::<Vec<_>>(), vec![6, 7, 8]);
        assert!(serde_json::from_str::<SeasonPolicy>(r#"{"summer_months": [14]}"#).is_err());
    }
}
