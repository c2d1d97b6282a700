//! Sample directory loaded at start-up unless `--empty` is given.
use chrono::{TimeZone, Utc};

use crate::model::{Influencer, InfluencerId, Platform, Score, Tier};

pub fn sample_influencers() -> Vec<Influencer> {
    use Platform::{Instagram, YouTube};
    let rows: [(&str, &str, Tier, &[Platform], i64, (i32, u32, u32)); 8] = [
        ("seed-1", "Anna Keller", Tier::Gold, &[Instagram, YouTube], 92, (2024, 1, 12)),
        ("seed-2", "Marcus Reid", Tier::Silver, &[YouTube], 67, (2024, 2, 3)),
        ("seed-3", "Diana Cruz", Tier::Gold, &[Instagram], 88, (2024, 2, 21)),
        ("seed-4", "Leo Tanaka", Tier::Silver, &[], 45, (2024, 3, 9)),
        ("seed-5", "Priya Nair", Tier::Gold, &[YouTube], 95, (2024, 3, 30)),
        ("seed-6", "Tom Becker", Tier::Silver, &[Instagram], 58, (2024, 4, 14)),
        ("seed-7", "Sofia Lindqvist", Tier::Silver, &[Instagram, YouTube], 73, (2024, 5, 2)),
        ("seed-8", "Jonah Adeyemi", Tier::Gold, &[Instagram], 81, (2024, 5, 27)),
    ];

    rows.iter()
        .filter_map(|(id, name, tier, platforms, score, (y, m, d))| {
            let date_added = Utc.with_ymd_and_hms(*y, *m, *d, 9, 30, 0).single()?;
            Some(Influencer {
                id: InfluencerId::new(*id),
                name: name.to_string(),
                profile_picture: format!("https://i.pravatar.cc/150?u={id}"),
                tier: *tier,
                platforms: platforms.iter().copied().collect(),
                score: Score::clamped(*score),
                date_added,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_ids_are_unique() {
        let records = sample_influencers();
        assert_eq!(records.len(), 8);
        let ids: HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), records.len());
    }
}
