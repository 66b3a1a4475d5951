//! End-to-end scenarios through the public session interface, plus
//! property tests for the saturating aggregator.

use gazetrace_attention_core::heatmap::saturate;
use gazetrace_attention_core::ImageSession;
use gazetrace_common::ScoringConfig;
use gazetrace_session_model::{
    ClickEvent, GazeTrace, PositionSample, RegionId, RegionOfInterest, TimeWindow,
};
use proptest::prelude::*;

fn region(id: u64, x: f64, y: f64, order: u32) -> RegionOfInterest {
    RegionOfInterest {
        id: RegionId(id),
        x,
        y,
        local_order: order,
    }
}

/// Three tight dwell samples at zoom 5 on region A, default constants:
/// heat is the decay sum of three full-weight kernel contributions and the
/// score is heat / 18, computable by hand.
#[test]
fn tight_dwell_scores_decay_sum_over_threshold() {
    let config = ScoringConfig::default();
    let mut session = ImageSession::new(
        200,
        200,
        vec![region(1, 50.0, 50.0, 0)],
        config,
    )
    .unwrap();

    let samples = vec![
        PositionSample::new(50.0, 50.0, 5, 0.0, (8.0, 8.0)),
        PositionSample::new(50.0, 50.0, 5, 1000.0, (8.0, 8.0)),
        PositionSample::new(50.0, 50.0, 5, 2000.0, (8.0, 8.0)),
    ];
    session.attach_trace("student", GazeTrace::new(samples).unwrap());

    let score = session.score("student", TimeWindow::ALL).unwrap().unwrap();

    // saturation cap = 1 / (1 - 0.95) = 20, threshold = 18.
    let heat = 1.0 + 0.95 + 0.95 * 0.95;
    let expected = heat / 18.0;
    assert!((score.overall - expected).abs() < 1e-9);
    assert_eq!(score.per_region.as_ref().unwrap().len(), 1);
    assert!((score.per_region.unwrap()[0] - expected).abs() < 1e-9);
}

/// Disambiguation scenario: one unresolved click, candidate
/// regions at distances 5 and 50 from the nearest sample — the near one
/// must win and then score 1.0.
#[test]
fn unresolved_click_resolves_to_nearest_region() {
    let mut session = ImageSession::new(
        1000,
        1000,
        vec![
            region(7, 13.0, 14.0, 0), // distance 5 from (10, 10)
            region(8, 40.0, 50.0, 1), // distance 50 from (10, 10)
        ],
        ScoringConfig::default(),
    )
    .unwrap();

    let samples = vec![
        PositionSample::new(10.0, 10.0, 5, 1000.0, (8.0, 8.0)),
        PositionSample::new(600.0, 600.0, 5, 50_000.0, (8.0, 8.0)),
    ];
    session.attach_trace("student", GazeTrace::new(samples).unwrap());
    session
        .attach_clicks(
            "student",
            vec![ClickEvent::unresolved(1200.0, "AnnotationSelect")],
        )
        .unwrap();

    let score = session.score("student", TimeWindow::ALL).unwrap().unwrap();
    let per_region = score.per_region.unwrap();
    assert_eq!(per_region[0], 1.0);
    assert!(per_region[1] < 1.0);
}

/// Scoring restricted to a sub-window sees only that window's evidence.
#[test]
fn window_restriction_changes_score() {
    let mut session = ImageSession::new(
        200,
        200,
        vec![region(1, 50.0, 50.0, 0)],
        ScoringConfig::default(),
    )
    .unwrap();

    let mut samples = Vec::new();
    // Early dwell on the region, later samples far away.
    for i in 0..5 {
        samples.push(PositionSample::new(50.0, 50.0, 5, i as f64 * 1000.0, (8.0, 8.0)));
    }
    for i in 5..10 {
        samples.push(PositionSample::new(180.0, 180.0, 5, i as f64 * 1000.0, (8.0, 8.0)));
    }
    session.attach_trace("student", GazeTrace::new(samples).unwrap());

    let early = session
        .score("student", TimeWindow::new(0.0, 4000.0))
        .unwrap()
        .unwrap();
    let late = session
        .score("student", TimeWindow::new(5000.0, 9000.0))
        .unwrap()
        .unwrap();

    assert!(early.overall > 0.0);
    assert_eq!(late.overall, 0.0);
}

#[test]
fn whole_image_scoring_without_regions() {
    let mut session =
        ImageSession::new(50, 50, vec![], ScoringConfig::default()).unwrap();

    let samples: Vec<_> = (0..30)
        .map(|i| PositionSample::new(25.0, 25.0, 5, i as f64 * 1000.0, (8.0, 8.0)))
        .collect();
    session.attach_trace("student", GazeTrace::new(samples).unwrap());

    let score = session.score("student", TimeWindow::ALL).unwrap().unwrap();
    assert!(score.per_region.is_none());
    assert!(score.overall > 0.0);
    assert!(score.overall <= 1.0);
}

proptest! {
    /// Saturation bound: the decay sum never exceeds `max(v) / (1 - r)`
    /// and, for unit-bounded contributions, never exceeds `1 / (1 - r)`.
    #[test]
    fn saturate_respects_cap(
        values in proptest::collection::vec(0.0f64..=1.0, 0..200),
        decay in 0.05f64..0.99,
    ) {
        let mut values = values;
        let total = saturate(&mut values, decay);
        prop_assert!(total <= 1.0 / (1.0 - decay) + 1e-9);
        prop_assert!(total >= 0.0);
    }

    /// Adding a contribution never decreases the saturated total.
    #[test]
    fn saturate_is_monotone_in_contributions(
        values in proptest::collection::vec(0.0f64..=1.0, 1..100),
        extra in 0.0f64..=1.0,
    ) {
        let mut base = values.clone();
        let before = saturate(&mut base, 0.95);

        let mut extended = values;
        extended.push(extra);
        let after = saturate(&mut extended, 0.95);

        prop_assert!(after + 1e-12 >= before);
    }

    /// Scores stay in [0, 1] for arbitrary dwell traces.
    #[test]
    fn score_stays_in_unit_interval(
        xs in proptest::collection::vec(0.0f64..200.0, 1..60),
        zoom in 4u8..=10,
    ) {
        let samples: Vec<_> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| PositionSample::new(x, x, zoom, i as f64 * 500.0, (8.0, 8.0)))
            .collect();

        let mut session = ImageSession::new(
            200,
            200,
            vec![region(1, 100.0, 100.0, 0)],
            ScoringConfig::default(),
        )
        .unwrap();
        session.attach_trace("student", GazeTrace::new(samples).unwrap());

        let score = session.score("student", TimeWindow::ALL).unwrap().unwrap();
        prop_assert!(score.overall >= 0.0);
        prop_assert!(score.overall <= 1.0);
    }
}
