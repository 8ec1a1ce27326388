//! Achievement tracking — idempotent unlocks and the daily study streak.
//!
//! Unlock predicates are evaluated by callers at the relevant event
//! (battle win, correct answer, study session), never polled. Once a
//! key is unlocked it stays unlocked and re-triggering is a no-op.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::save;
use crate::state::{RunState, UiEvent};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AchievementId {
    FirstWin,
    StreakMaster,
    BossSlayer,
    GoldCollector,
    PerfectClear,
    FirstCorrect,
    Combo5,
    Combo10,
    Total100,
    DailyStreak3,
    DailyStreak7,
}

impl AchievementId {
    pub fn name(self) -> &'static str {
        match self {
            AchievementId::FirstWin => "First Victory",
            AchievementId::StreakMaster => "Streak Master",
            AchievementId::BossSlayer => "Boss Slayer",
            AchievementId::GoldCollector => "Gold Collector",
            AchievementId::PerfectClear => "Perfect Clear",
            AchievementId::FirstCorrect => "First Steps",
            AchievementId::Combo5 => "Warming Up",
            AchievementId::Combo10 => "On Fire",
            AchievementId::Total100 => "Hundred Down",
            AchievementId::DailyStreak3 => "Three-Day Habit",
            AchievementId::DailyStreak7 => "Full Week",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
    unlocked: BTreeSet<AchievementId>,
}

impl Achievements {
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    /// Returns true when the id was newly inserted.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        self.unlocked.insert(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }
}

/// Unlock `id` if it is still locked: emits one notification and saves.
/// Already-unlocked ids are a complete no-op. Returns whether the id
/// was newly unlocked.
pub fn check_achievement(state: &mut RunState, id: AchievementId) -> bool {
    if !state.achievements.unlock(id) {
        return false;
    }
    state.add_log(&format!("Achievement unlocked: {}", id.name()));
    state.emit(UiEvent::AchievementUnlocked(id));
    save::save_game(state);
    true
}

// ── Daily study streak ────────────────────────────────────────

/// Days since the civil epoch for an ISO `YYYY-MM-DD` date. Returns
/// `None` for anything that does not parse.
fn civil_day(date: &str) -> Option<i64> {
    let mut parts = date.splitn(3, '-');
    let y: i64 = parts.next()?.parse().ok()?;
    let m: u32 = parts.next()?.parse().ok()?;
    let d: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&m) || !(1..=31).contains(&d) {
        return None;
    }
    // Howard Hinnant's days_from_civil.
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (m as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    Some(era * 146097 + doe - 719468)
}

/// Record a study session on `today` (ISO date supplied by the host —
/// the engine never reads a clock). Consecutive days extend the streak,
/// a gap resets it to 1, repeat calls on the same day change nothing.
pub fn record_study_day(state: &mut RunState, today: &str) {
    let today_day = match civil_day(today) {
        Some(d) => d,
        None => return,
    };

    match state.last_study_date.as_deref().and_then(civil_day) {
        Some(last) if last == today_day => return,
        Some(last) if today_day - last == 1 => state.study_streak += 1,
        _ => state.study_streak = 1,
    }
    state.last_study_date = Some(today.to_string());

    if state.study_streak >= 3 {
        check_achievement(state, AchievementId::DailyStreak3);
    }
    if state.study_streak >= 7 {
        check_achievement(state, AchievementId::DailyStreak7);
    }
    save::save_game(state);
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentSet;

    fn fresh() -> RunState {
        RunState::new(ContentSet::builtin(), 42)
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut s = fresh();
        assert!(check_achievement(&mut s, AchievementId::FirstWin));
        let events_after_first = s.drain_events().len();
        assert_eq!(events_after_first, 1);

        assert!(!check_achievement(&mut s, AchievementId::FirstWin));
        assert!(s.drain_events().is_empty());
        assert_eq!(s.achievements.unlocked_count(), 1);
    }

    #[test]
    fn unlock_emits_notification() {
        let mut s = fresh();
        check_achievement(&mut s, AchievementId::BossSlayer);
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![UiEvent::AchievementUnlocked(AchievementId::BossSlayer)]
        );
    }

    #[test]
    fn civil_day_ordering() {
        let a = civil_day("2026-08-05").unwrap();
        let b = civil_day("2026-08-06").unwrap();
        assert_eq!(b - a, 1);
        // Month boundary.
        let c = civil_day("2026-08-31").unwrap();
        let d = civil_day("2026-09-01").unwrap();
        assert_eq!(d - c, 1);
        // Leap day.
        let e = civil_day("2028-02-28").unwrap();
        let f = civil_day("2028-02-29").unwrap();
        assert_eq!(f - e, 1);
    }

    #[test]
    fn civil_day_rejects_garbage() {
        assert!(civil_day("not a date").is_none());
        assert!(civil_day("2026-13-01").is_none());
        assert!(civil_day("").is_none());
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let mut s = fresh();
        record_study_day(&mut s, "2026-08-01");
        assert_eq!(s.study_streak, 1);
        record_study_day(&mut s, "2026-08-02");
        record_study_day(&mut s, "2026-08-03");
        assert_eq!(s.study_streak, 3);
        assert!(s.achievements.is_unlocked(AchievementId::DailyStreak3));
        assert!(!s.achievements.is_unlocked(AchievementId::DailyStreak7));
    }

    #[test]
    fn same_day_does_not_double_count() {
        let mut s = fresh();
        record_study_day(&mut s, "2026-08-01");
        record_study_day(&mut s, "2026-08-01");
        assert_eq!(s.study_streak, 1);
    }

    #[test]
    fn gap_resets_streak() {
        let mut s = fresh();
        record_study_day(&mut s, "2026-08-01");
        record_study_day(&mut s, "2026-08-02");
        record_study_day(&mut s, "2026-08-05");
        assert_eq!(s.study_streak, 1);
    }

    #[test]
    fn week_streak_unlocks_both() {
        let mut s = fresh();
        for day in 1..=7 {
            record_study_day(&mut s, &format!("2026-08-{:02}", day));
        }
        assert_eq!(s.study_streak, 7);
        assert!(s.achievements.is_unlocked(AchievementId::DailyStreak3));
        assert!(s.achievements.is_unlocked(AchievementId::DailyStreak7));
    }
}
