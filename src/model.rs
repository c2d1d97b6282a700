//! Directory record types.
//!
//! An [`Influencer`] is one entry in the directory. Records are created from a
//! [`NewInfluencer`] by [`crate::store::DirectoryStore::add`], which assigns the
//! id and the creation timestamp.
//!
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Picture reference used by the add form when the user supplies nothing else.
pub const DEFAULT_PICTURE: &str = "/placeholder-user.jpg";

/// Opaque, immutable record identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InfluencerId(String);

impl InfluencerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InfluencerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categorical rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Gold,
    Silver,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Gold, Tier::Silver];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(Tier::Gold),
            "silver" => Ok(Tier::Silver),
            other => Err(format!("unknown tier '{other}'")),
        }
    }
}

/// Social channel a record is associated with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Instagram,
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Instagram, Platform::YouTube];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::YouTube => "YouTube",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::YouTube),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Score in `[0, 100]`. Out-of-range input is clamped on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(100);

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Add a signed delta, staying within bounds.
    pub fn saturating_step(self, delta: i64) -> Self {
        Self::clamped(self.0 as i64 + delta)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directory entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Influencer {
    pub id: InfluencerId,
    pub name: String,
    pub profile_picture: String,
    pub tier: Tier,
    pub platforms: BTreeSet<Platform>,
    pub score: Score,
    pub date_added: DateTime<Utc>,
}

impl Influencer {
    /// Upper-cased first letter of each word of the name, used as avatar fallback.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Comma separated platform labels, or `-` when there are none.
    pub fn platforms_label(&self) -> String {
        if self.platforms.is_empty() {
            "-".to_string()
        } else {
            self.platforms
                .iter()
                .map(|p| p.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Date in the card format, e.g. `Mar 4, 2024`.
    pub fn date_label(&self) -> String {
        self.date_added.format("%b %-d, %Y").to_string()
    }
}

/// Input for creating a record: everything but the id and the creation date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInfluencer {
    pub name: String,
    pub profile_picture: String,
    pub tier: Tier,
    pub platforms: BTreeSet<Platform>,
    pub score: Score,
}

impl NewInfluencer {
    /// Attach identity and creation time.
    pub fn into_record(self, id: InfluencerId, date_added: DateTime<Utc>) -> Influencer {
        Influencer {
            id,
            name: self.name,
            profile_picture: self.profile_picture,
            tier: self.tier,
            platforms: self.platforms,
            score: self.score,
            date_added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(name: &str) -> Influencer {
        NewInfluencer {
            name: name.to_string(),
            profile_picture: DEFAULT_PICTURE.to_string(),
            tier: Tier::Gold,
            platforms: BTreeSet::new(),
            score: Score::clamped(10),
        }
        .into_record(
            InfluencerId::new("x"),
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(Score::clamped(-5).value(), 0);
        assert_eq!(Score::clamped(250).value(), 100);
        assert_eq!(Score::clamped(42).value(), 42);
        assert_eq!(Score::clamped(99).saturating_step(10), Score::MAX);
        assert_eq!(Score::clamped(3).saturating_step(-10), Score::MIN);
    }

    #[test]
    fn initials_skip_extra_whitespace() {
        assert_eq!(record("ada  lovelace").initials(), "AL");
        assert_eq!(record("   ").initials(), "");
    }

    #[test]
    fn labels() {
        let mut r = record("Anna");
        assert_eq!(r.platforms_label(), "-");
        r.platforms.insert(Platform::YouTube);
        r.platforms.insert(Platform::Instagram);
        assert_eq!(r.platforms_label(), "Instagram, YouTube");
        assert_eq!(r.date_label(), "Mar 4, 2024");
        assert_eq!("YOUTUBE".parse::<Platform>(), Ok(Platform::YouTube));
        assert!("tiktok".parse::<Platform>().is_err());
        assert_eq!(" silver ".parse::<Tier>(), Ok(Tier::Silver));
    }
}
