//! Day-stepped snapshot harness.
//!
//! Steps a small world one in-game day at a time and captures selected state
//! after every step, then compares the report against a golden JSON file.

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use raised_beds_core::GameDay;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for a season worldtest.
#[derive(Debug, Clone)]
pub struct SeasonWorldtestConfig {
    /// Human-readable name (written into the snapshot report).
    pub name: String,
    /// Number of days to step.
    pub days: u32,
    /// Path to the golden JSON file.
    pub snapshot_path: PathBuf,
}

/// State captured at the start of a day.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonFrame<S> {
    /// Day counter.
    pub day: u32,
    /// Snapshot payload.
    pub snapshot: S,
}

#[derive(Debug, Clone, Serialize)]
struct SeasonReport<S> {
    name: String,
    frames: Vec<SeasonFrame<S>>,
}

/// Step `days` times from day 0, returning `days + 1` frames (including the
/// initial state).
pub fn collect_season_frames<State, Snapshot, StepFn, SnapFn>(
    days: u32,
    state: &mut State,
    mut step: StepFn,
    mut snapshot: SnapFn,
) -> Vec<SeasonFrame<Snapshot>>
where
    StepFn: FnMut(GameDay, &mut State),
    SnapFn: FnMut(GameDay, &State) -> Snapshot,
{
    let mut day = GameDay::ZERO;
    let mut frames = vec![SeasonFrame {
        day: day.0,
        snapshot: snapshot(day, state),
    }];
    for _ in 0..days {
        step(day, state);
        day = day.advance(1);
        frames.push(SeasonFrame {
            day: day.0,
            snapshot: snapshot(day, state),
        });
    }
    frames
}

/// Run a season worldtest and assert (or record) its snapshot.
pub fn run_season_worldtest<State, Snapshot, StepFn, SnapFn>(
    config: SeasonWorldtestConfig,
    mut state: State,
    step: StepFn,
    snapshot: SnapFn,
) -> Result<()>
where
    Snapshot: Serialize,
    StepFn: FnMut(GameDay, &mut State),
    SnapFn: FnMut(GameDay, &State) -> Snapshot,
{
    let frames = collect_season_frames(config.days, &mut state, step, snapshot);
    let report = SeasonReport {
        name: config.name,
        frames,
    };
    assert_json_snapshot(config.snapshot_path, &report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_include_initial_state() {
        let mut counter = 10u32;
        let frames = collect_season_frames(
            3,
            &mut counter,
            |_, value| *value -= 1,
            |day, value| (day.0, *value),
        );
        let values: Vec<(u32, u32)> = frames.iter().map(|f| f.snapshot).collect();
        assert_eq!(values, vec![(0, 10), (1, 9), (2, 8), (3, 7)]);
    }
}
