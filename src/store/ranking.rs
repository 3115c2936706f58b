use std::cmp::Ordering;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, clear_key, load_list, new_entry_id, save_list};

pub const RANKING_KEY: &str = "ranking";
pub const MAX_RANKING_ENTRIES: usize = 10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub id: String,
    pub player_name: String,
    pub score: u32,
    pub category: String,
    pub date: DateTime<Utc>,
    pub questions_answered: usize,
    pub correct_answers: u32,
}

/// A finished run waiting to be placed on the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRankingEntry {
    pub player_name: String,
    pub score: u32,
    pub category: String,
    pub questions_answered: usize,
    pub correct_answers: u32,
}

/// Higher score first; equal scores keep the older entry ahead.
fn rank_order(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.score.cmp(&a.score).then(a.date.cmp(&b.date))
}

/// Top-10 leaderboard, sorted by score descending.
#[derive(Clone)]
pub struct Ranking {
    backend: Rc<dyn KeyValueStore>,
}

impl Ranking {
    pub fn new(backend: Rc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn load(&self) -> Vec<RankingEntry> {
        let mut ranking: Vec<RankingEntry> = load_list(self.backend.as_ref(), RANKING_KEY);
        ranking.sort_by(rank_order);
        ranking
    }

    pub fn is_top_score(&self, score: u32) -> bool {
        let ranking = self.load();
        if ranking.len() < MAX_RANKING_ENTRIES {
            return true;
        }
        ranking.last().is_none_or(|lowest| score > lowest.score)
    }

    /// Insert a run. Returns its 1-indexed position, or `None` when it did
    /// not make the table (which is then left untouched).
    pub fn add(&self, entry: NewRankingEntry) -> Option<usize> {
        let mut ranking = self.load();
        let id = new_entry_id();

        ranking.push(RankingEntry {
            id: id.clone(),
            player_name: entry.player_name,
            score: entry.score,
            category: entry.category,
            date: Utc::now(),
            questions_answered: entry.questions_answered,
            correct_answers: entry.correct_answers,
        });
        ranking.sort_by(rank_order);

        let position = ranking.iter().position(|e| e.id == id)? + 1;
        if position > MAX_RANKING_ENTRIES {
            return None;
        }

        ranking.truncate(MAX_RANKING_ENTRIES);
        save_list(self.backend.as_ref(), RANKING_KEY, &ranking);
        Some(position)
    }

    pub fn clear(&self) {
        clear_key(self.backend.as_ref(), RANKING_KEY);
    }
}

pub fn position_badge(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{n}"),
    }
}

/// Short relative age of a timestamp: "now", "5m ago", "3h ago", "2d ago",
/// then the calendar date.
pub fn relative_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(date);
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if mins < 1 {
        "now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        date.format("%d %b").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::store::memory::MemoryStore;

    fn ranking() -> Ranking {
        Ranking::new(Rc::new(MemoryStore::new()))
    }

    fn run(name: &str, score: u32) -> NewRankingEntry {
        NewRankingEntry {
            player_name: name.to_string(),
            score,
            category: "Math".to_string(),
            questions_answered: 9,
            correct_answers: score,
        }
    }

    fn full_table() -> Ranking {
        let r = ranking();
        for s in (1..=10).map(|i| i * 10) {
            assert!(r.add(run(&format!("p{s}"), s)).is_some());
        }
        r
    }

    #[test]
    fn any_score_is_top_when_table_not_full() {
        let r = ranking();
        assert!(r.is_top_score(0));
        r.add(run("a", 50));
        assert!(r.is_top_score(0));
    }

    #[test]
    fn full_table_requires_beating_the_minimum() {
        let r = full_table();
        assert_eq!(r.load().len(), 10);
        assert!(!r.is_top_score(10));
        assert!(r.is_top_score(11));
    }

    #[test]
    fn qualifying_entry_lands_at_rank_position() {
        let r = full_table();
        assert_eq!(r.add(run("new", 55)), Some(6));

        let table = r.load();
        assert_eq!(table.len(), 10);
        assert!(table.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(table[5].player_name, "new");
        assert!(table.iter().all(|e| e.score != 10));
    }

    #[test]
    fn non_qualifying_entry_leaves_table_unchanged() {
        let r = full_table();
        let before = r.load();
        assert_eq!(r.add(run("low", 5)), None);
        assert_eq!(r.load(), before);
    }

    #[test]
    fn tie_keeps_existing_entry_ahead() {
        let r = ranking();
        r.add(run("first", 40));
        assert_eq!(r.add(run("second", 40)), Some(2));
        let table = r.load();
        assert_eq!(table[0].player_name, "first");
    }

    #[test]
    fn tie_with_last_place_on_full_table_is_not_ranked() {
        let r = full_table();
        assert_eq!(r.add(run("tie", 10)), None);
    }

    #[test]
    fn clear_empties_table() {
        let r = full_table();
        r.clear();
        assert!(r.load().is_empty());
    }

    #[test]
    fn badges() {
        assert_eq!(position_badge(1), "🥇");
        assert_eq!(position_badge(3), "🥉");
        assert_eq!(position_badge(7), "#7");
    }

    #[test]
    fn relative_dates() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        assert_eq!(relative_date(now - Duration::seconds(30), now), "now");
        assert_eq!(relative_date(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_date(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_date(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_date(now - Duration::days(10), now), "10 Mar");
    }
}
