//! Expiry status classification
//!
//! Maps an expiry timestamp onto a whole-day count and a user-facing label.
//! Two independent cut points drive everything downstream:
//!
//! ```text
//!   days < 0              → Expired        (urgency: expired)
//!   0 ≤ days ≤ urgent     → Expiring Soon  (urgency: urgent)
//!   urgent < days ≤ soon  → Fresh          (urgency: soon)
//!   days > soon           → Fresh          (urgency: fresh)
//! ```
//!
//! The tri-state label only looks at `urgent_days`; the urgency bucket used by
//! the dashboard and the assistant applies both thresholds.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Day thresholds for expiry classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpiryThresholds {
    /// Items at or below this many days left are "Expiring Soon"
    pub urgent_days: i64,

    /// Second tier used for dashboard and assistant bucketing
    pub soon_days: i64,
}

impl Default for ExpiryThresholds {
    fn default() -> Self {
        Self {
            urgent_days: 3,
            soon_days: 7,
        }
    }
}

impl ExpiryThresholds {
    /// Tri-state label for a day count
    pub fn status(&self, days_until_expiry: i64) -> ExpiryStatus {
        if days_until_expiry < 0 {
            ExpiryStatus::Expired
        } else if days_until_expiry <= self.urgent_days {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Fresh
        }
    }

    /// Urgency bucket for a day count
    pub fn urgency(&self, days_until_expiry: i64) -> Urgency {
        if days_until_expiry < 0 {
            Urgency::Expired
        } else if days_until_expiry <= self.urgent_days {
            Urgency::Urgent
        } else if days_until_expiry <= self.soon_days {
            Urgency::Soon
        } else {
            Urgency::Fresh
        }
    }

    /// Both thresholds non-negative and `urgent_days <= soon_days`
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.urgent_days < 0 || self.soon_days < 0 {
            return Err("expiry thresholds must not be negative".to_string());
        }
        if self.urgent_days > self.soon_days {
            return Err(format!(
                "urgent_days ({}) must not exceed soon_days ({})",
                self.urgent_days, self.soon_days
            ));
        }
        Ok(())
    }

    /// Not yet expired but inside the `soon_days` window
    pub fn is_expiring_soon(&self, days_until_expiry: i64) -> bool {
        (0..=self.soon_days).contains(&days_until_expiry)
    }
}

/// User-facing expiry label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryStatus {
    #[serde(rename = "Expired")]
    Expired,
    #[serde(rename = "Expiring Soon")]
    ExpiringSoon,
    #[serde(rename = "Fresh")]
    Fresh,
}

impl ExpiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Fresh => "Fresh",
        }
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExpiryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Expired" => Ok(Self::Expired),
            "Expiring Soon" => Ok(Self::ExpiringSoon),
            "Fresh" => Ok(Self::Fresh),
            other => Err(format!("unknown expiry status: {}", other)),
        }
    }
}

/// Three-tier urgency bucket (plus expired)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Expired,
    Urgent,
    Soon,
    Fresh,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            Self::Urgent => write!(f, "urgent"),
            Self::Soon => write!(f, "soon"),
            Self::Fresh => write!(f, "fresh"),
        }
    }
}

/// Derived expiry fields for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub status: ExpiryStatus,
    pub days_until_expiry: i64,
}

/// Whole days until `expiry`, rounded up. Negative once the date has passed.
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = expiry.signed_duration_since(now).num_milliseconds();
    let days = diff.div_euclid(MILLIS_PER_DAY);
    if diff.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}

/// Classify an expiry date relative to `now`
pub fn classify(
    expiry: DateTime<Utc>,
    now: DateTime<Utc>,
    thresholds: &ExpiryThresholds,
) -> Classification {
    let days = days_until_expiry(expiry, now);
    Classification {
        status: thresholds.status(days),
        days_until_expiry: days,
    }
}

/// Parse a client-supplied expiry date.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and bare
/// `YYYY-MM-DD`; the naive forms are read as UTC.
pub fn parse_expiry_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
