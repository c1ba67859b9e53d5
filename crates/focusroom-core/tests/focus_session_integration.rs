//! Integration tests for the focus session controller.
//!
//! Drives a full session through the public API with a manual clock, the
//! way a UI would: start, tick once per second, skip, switch phases, and
//! move across day boundaries.

use chrono::{Duration, Local, NaiveDate, TimeZone};
use focusroom_core::storage::STATS_KEY;
use focusroom_core::{
    Database, Event, FocusSession, KvStore, ManualClock, MemoryStore, NullSink, Phase, Settings,
};

fn clock() -> ManualClock {
    ManualClock::new(Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap())
}

fn session_with(clock: &ManualClock, settings: Settings) -> FocusSession<ManualClock> {
    let mut session = FocusSession::init(clock.clone(), MemoryStore::new(), NullSink, 1200);
    session.update_settings(settings);
    session
}

/// Start the current phase and tick until it completes, advancing the
/// clock one second per tick.
fn complete_phase(session: &mut FocusSession<ManualClock>, clock: &ManualClock) -> Vec<Event> {
    let mut events = session.start();
    loop {
        clock.advance(Duration::seconds(1));
        let produced = session.tick();
        let done = produced
            .iter()
            .any(|e| matches!(e, Event::PhaseCompleted { .. }));
        events.extend(produced);
        if done {
            return events;
        }
    }
}

#[test]
fn example_focus_runs_to_short_break() {
    let clock = clock();
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_every: 4,
            ..Settings::default()
        },
    );

    let mut ticks = 0;
    session.start();
    while session.timer_state().phase == Phase::Focus {
        clock.advance(Duration::seconds(1));
        session.tick();
        ticks += 1;
    }

    assert_eq!(ticks, 25 * 60);
    assert_eq!(session.log().len(), 1);
    let entry = session.log().last().unwrap();
    assert_eq!(entry.phase, Phase::Focus);
    assert!(entry.completed);
    assert_eq!(entry.minutes_completed, 25);
    assert_eq!(session.streak().completed_focus_today, 1);
    assert_eq!(session.streak().focus_minutes_today, 25);
    assert_eq!(session.timer_state().phase, Phase::ShortBreak);
    assert_eq!(session.timer_state().seconds_remaining, 300);
    assert_eq!(session.today_focus_minutes(), 25);
}

#[test]
fn example_fifth_skip_locks_and_routes_to_short_break() {
    let clock = clock();
    let mut session = session_with(&clock, Settings::default());
    for _ in 0..4 {
        session.skip();
        session.switch_phase(Phase::Focus);
    }
    session.start();
    clock.advance(Duration::minutes(20));

    let events = session.skip();
    assert!(events.contains(&Event::StreakLocked { skips_today: 5 }));
    assert_eq!(session.streak().skips_today, 5);
    assert!(session.streak().streak_locked_today);

    let entry = session.log().last().unwrap();
    assert_eq!(entry.phase, Phase::Focus);
    assert!(!entry.completed);
    assert!(entry.skipped);
    assert_eq!(entry.minutes_completed, 0);
    assert_eq!(session.timer_state().phase, Phase::ShortBreak);
}

#[test]
fn break_types_follow_the_cycle() {
    let clock = clock();
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 10,
            short_break_minutes: 2,
            long_break_minutes: 5,
            long_break_every: 4,
            auto_start_next: false,
        },
    );

    let mut breaks = Vec::new();
    for _ in 0..4 {
        complete_phase(&mut session, &clock);
        breaks.push(session.timer_state().phase);
        complete_phase(&mut session, &clock);
        assert_eq!(session.timer_state().phase, Phase::Focus);
    }
    assert_eq!(
        breaks,
        vec![Phase::ShortBreak, Phase::ShortBreak, Phase::ShortBreak, Phase::LongBreak]
    );
    assert_eq!(session.cycle_count(), 4);
}

#[test]
fn skip_after_three_cycles_is_still_short_break() {
    let clock = clock();
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 10,
            short_break_minutes: 2,
            ..Settings::default()
        },
    );
    for _ in 0..3 {
        complete_phase(&mut session, &clock);
        complete_phase(&mut session, &clock);
    }
    session.skip();
    assert_eq!(session.timer_state().phase, Phase::ShortBreak);
}

#[test]
fn streak_counts_consecutive_days_and_resets_after_gap() {
    let clock = clock();
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 10,
            ..Settings::default()
        },
    );

    for expected in 1..=3 {
        session.switch_phase(Phase::Focus);
        complete_phase(&mut session, &clock);
        // Second completion on the same day does not count again.
        session.switch_phase(Phase::Focus);
        complete_phase(&mut session, &clock);
        assert_eq!(session.streak().streak, expected);
        assert_eq!(session.streak().completed_focus_today, 2);
        clock.advance(Duration::days(1));
    }

    // Skip a whole day.
    clock.advance(Duration::days(1));
    session.switch_phase(Phase::Focus);
    complete_phase(&mut session, &clock);
    assert_eq!(session.streak().streak, 1);
    assert_eq!(session.streak().best_streak, 3);
}

#[test]
fn locked_day_does_not_advance_streak() {
    let clock = clock();
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 10,
            ..Settings::default()
        },
    );
    complete_phase(&mut session, &clock);
    clock.advance(Duration::days(1));

    for _ in 0..5 {
        session.switch_phase(Phase::Focus);
        session.skip();
    }
    session.switch_phase(Phase::Focus);
    let events = complete_phase(&mut session, &clock);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::StreakAdvanced { .. })));
    assert_eq!(session.streak().streak, 1);
    assert_eq!(session.streak().best_streak, 1);

    // The lock is gone the next day, and yesterday's completion did not
    // count, so the streak restarts.
    clock.advance(Duration::days(1));
    session.switch_phase(Phase::Focus);
    complete_phase(&mut session, &clock);
    assert_eq!(session.streak().streak, 1);
}

#[test]
fn rollover_resets_daily_counters_exactly_once() {
    let clock = clock();
    let mut session = session_with(&clock, Settings::default());
    session.skip();
    session.skip();
    clock.advance(Duration::days(1));

    let mut rollovers = 0;
    for _ in 0..3 {
        rollovers += session
            .skip()
            .iter()
            .filter(|e| matches!(e, Event::DailyRollover { .. }))
            .count();
    }
    assert_eq!(rollovers, 1);
    assert_eq!(session.streak().skips_today, 3);
    assert_eq!(
        session.streak().daily_key,
        NaiveDate::from_ymd_opt(2026, 3, 11)
    );
}

#[test]
fn week_series_and_histogram_reflect_completions() {
    let clock = clock();
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 10,
            ..Settings::default()
        },
    );
    complete_phase(&mut session, &clock);
    clock.advance(Duration::days(2));
    session.switch_phase(Phase::Focus);
    complete_phase(&mut session, &clock);

    let week = session.week_series();
    assert_eq!(week.len(), 7);
    assert_eq!(week[6].minutes, 10);
    assert_eq!(week[4].minutes, 10);
    assert_eq!(week[5].minutes, 0);
    assert_eq!(session.hourly_histogram()[9], 2);
}

#[test]
fn sqlite_store_round_trips_session_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focusroom.db");
    let clock = clock();

    {
        let db = Database::open_at(&path).unwrap();
        let mut session = FocusSession::init(clock.clone(), db, NullSink, 1200);
        session.skip();
        session.add_task("revise lecture 4").unwrap();
        session.teardown();
    }

    let db = Database::open_at(&path).unwrap();
    assert!(db.load(STATS_KEY).unwrap().is_some());
    let session = FocusSession::init(clock, db, NullSink, 1200);
    assert_eq!(session.streak().skips_today, 1);
    assert_eq!(session.log().len(), 1);
    assert_eq!(session.tasks().tasks()[0].text, "revise lecture 4");
    assert_eq!(session.timer_state().phase, Phase::ShortBreak);
}

#[test]
fn history_cap_evicts_oldest() {
    let clock = clock();
    let mut session = FocusSession::init(clock, MemoryStore::new(), NullSink, 3);
    let mut ids = Vec::new();
    for _ in 0..5 {
        session.skip();
        ids.push(session.log().last().unwrap().id.clone());
    }
    let kept: Vec<_> = session.log().entries().map(|e| e.id.clone()).collect();
    assert_eq!(kept, ids[2..].to_vec());
}

#[test]
fn focus_across_midnight_counts_for_the_day_it_ends() {
    let clock = ManualClock::new(Local.with_ymd_and_hms(2026, 3, 10, 23, 50, 0).unwrap());
    let mut session = session_with(
        &clock,
        Settings {
            focus_minutes: 25,
            ..Settings::default()
        },
    );
    let day_10 = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let day_11 = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

    let events = complete_phase(&mut session, &clock);

    let order: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::DailyRollover { date } => Some(format!("rollover {date}")),
            Event::PhaseCompleted { .. } => Some("completed".to_string()),
            Event::StreakAdvanced { streak, .. } => Some(format!("streak {streak}")),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec!["rollover 2026-03-11", "completed", "streak 1"]);

    let entry = session.log().last().unwrap();
    assert_eq!(entry.date_key, day_11);
    assert_eq!(session.hourly_histogram()[23], 1);
    assert_eq!(session.streak().focus_minutes_today, 25);
    assert_eq!(session.today_focus_minutes(), 25);
    assert_eq!(focusroom_core::stats::daily_focus_minutes(session.log(), day_10), 0);

    let week = session.week_series();
    let last = week.last().unwrap();
    assert_eq!(last.date, day_11);
    assert_eq!(last.minutes, 25);
    assert_eq!(week[5].date, day_10);
    assert_eq!(week[5].minutes, 0);
}
