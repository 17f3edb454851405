// Scenario tests for the contiguous-run silence detector.
//
// The detector is a pure state machine fed one energy sample per tick, so
// these run without any timers or tasks.

use voxchat::capture::{SilenceDetector, SilenceVerdict};

/// Feed a sequence of samples and return the 1-based index of the tick on
/// which the timeout elapsed, if any.
fn first_elapsed_tick(detector: &mut SilenceDetector, samples: &[f32]) -> Option<usize> {
    for (i, &sample) in samples.iter().enumerate() {
        if detector.observe(sample) == SilenceVerdict::Elapsed {
            return Some(i + 1);
        }
    }
    None
}

#[test]
fn test_uninterrupted_silence_elapses_once_timeout_passes() {
    // threshold=0.01, timeout=1500ms, tick=100ms: run armed on tick 1,
    // 1500ms elapse on tick 16.
    let mut detector = SilenceDetector::new(0.01, 1500, 100);
    let samples = vec![0.001; 20];

    assert_eq!(first_elapsed_tick(&mut detector, &samples), Some(16));
}

#[test]
fn test_intervening_sound_restarts_the_run() {
    // 10 quiet ticks, one loud tick, 20 quiet ticks: the run armed on tick 1
    // is cancelled on tick 11; the fresh run armed on tick 12 elapses on
    // tick 27, not tick 25.
    let mut detector = SilenceDetector::new(0.01, 1500, 100);
    let mut samples = vec![0.001; 10];
    samples.push(0.5);
    samples.extend(vec![0.001; 20]);

    assert_eq!(first_elapsed_tick(&mut detector, &samples), Some(27));
}

#[test]
fn test_loud_audio_never_elapses() {
    let mut detector = SilenceDetector::new(0.01, 1500, 100);
    let samples = vec![0.2; 200];

    assert_eq!(first_elapsed_tick(&mut detector, &samples), None);
    assert!(!detector.silence_run_active());
}

#[test]
fn test_alternating_audio_never_elapses() {
    // Quiet stretches shorter than the timeout, each broken by sound.
    let mut detector = SilenceDetector::new(0.01, 500, 100);
    let mut samples = Vec::new();
    for _ in 0..20 {
        samples.extend(vec![0.001; 4]);
        samples.push(0.9);
    }

    assert_eq!(first_elapsed_tick(&mut detector, &samples), None);
}

#[test]
fn test_detector_reusable_after_elapse() {
    let mut detector = SilenceDetector::new(0.01, 300, 100);
    assert_eq!(first_elapsed_tick(&mut detector, &[0.001; 10]), Some(4));

    detector.reset();
    assert_eq!(first_elapsed_tick(&mut detector, &[0.001; 10]), Some(4));
}

#[test]
fn test_threshold_is_exclusive_on_the_quiet_side() {
    let mut detector = SilenceDetector::new(0.5, 200, 100);

    assert_eq!(detector.observe(0.499), SilenceVerdict::Quiet);
    assert_eq!(detector.observe(0.5), SilenceVerdict::Sound);
    assert_eq!(detector.observe(0.501), SilenceVerdict::Sound);
}
