//! Property tests for the countdown and phase boundaries.

use proptest::prelude::*;
use roundbell_core::{Settings, TimerEngine};

fn settings(round: u32, brk: u32, rounds: u32) -> Settings {
    Settings {
        round_duration: round,
        break_duration: brk,
        rounds,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn n_ticks_subtract_n(round in 2u32..600, n_frac in 0.0f64..1.0) {
        let s = settings(round, 30, 3);
        let n = ((round - 1) as f64 * n_frac) as u32;
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        for _ in 0..n {
            prop_assert!(engine.tick(&s).is_none());
        }
        prop_assert_eq!(engine.state().remaining_time, round - n);
        prop_assert!(!engine.state().is_break);
    }

    #[test]
    fn full_workout_takes_expected_ticks(round in 1u32..20, brk in 0u32..10, rounds in 1u32..6) {
        let s = settings(round, brk, rounds);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);

        // a zero-length break still costs one tick
        let expected = round * rounds + brk.max(1) * (rounds - 1);
        let mut ticks = 0;
        while engine.should_tick() {
            engine.tick(&s);
            ticks += 1;
            prop_assert!(engine.state().current_round <= rounds);
            prop_assert!(engine.state().remaining_time <= round.max(brk));
        }
        prop_assert_eq!(ticks, expected);
        prop_assert_eq!(engine.state().current_round, rounds);
        prop_assert_eq!(engine.state().remaining_time, 0);
    }
}
