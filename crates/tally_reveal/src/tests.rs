//! Engine scenarios
//!
//! End-to-end runs of the reveal engine against a static layout and a
//! recording presentation.

use std::time::Duration;

use proptest::prelude::*;
use tally_animation::Easing;

use crate::*;

const FRAME: Duration = Duration::from_millis(10);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn threshold(fraction: f32) -> ActivationThreshold {
    ActivationThreshold::new(fraction).unwrap()
}

/// 800px viewport over a 5000px page with cards near the top and one far down
fn page() -> StaticLayout {
    let mut layout = StaticLayout::new(Viewport::new(1280.0, 800.0));
    for i in 0..4 {
        layout.insert(
            format!("about/stat/{i}"),
            Rect::new(i as f32 * 300.0, 100.0, 280.0, 160.0),
        );
    }
    layout.insert("skills/headline", Rect::new(0.0, 1500.0, 800.0, 60.0));
    layout.insert("footer", Rect::new(0.0, 4800.0, 1280.0, 200.0));
    layout
}

fn stat_card(i: usize) -> RevealTarget {
    RevealTarget::new(
        format!("about/stat/{i}"),
        threshold(0.85),
        AnimationSpec::pop_in(0.8, ms(600), Easing::BackOut { overshoot: 1.7 }),
    )
}

fn headline() -> RevealTarget {
    RevealTarget::new(
        "skills/headline",
        threshold(0.8),
        AnimationSpec::fade_up(30.0, ms(800), Easing::EaseOutQuart),
    )
}

fn run(
    engine: &RevealEngine,
    layout: &StaticLayout,
    sink: &mut RecordingPresentation,
    frames: usize,
) -> Vec<RevealEvent> {
    (0..frames)
        .flat_map(|_| engine.tick(FRAME, layout, sink))
        .collect()
}

fn started_at(events: &[RevealEvent], element: &str) -> Option<Duration> {
    events.iter().find_map(|event| match event {
        RevealEvent::Started { element: e, at } if e.as_str() == element => Some(*at),
        _ => None,
    })
}

fn count_triggered(events: &[RevealEvent], element: &str) -> usize {
    events
        .iter()
        .filter(|e| {
            matches!(e, RevealEvent::Triggered { element: el, .. } if el.as_str() == element)
        })
        .count()
}

#[test]
fn test_counter_floors_then_snaps() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();

    let target = stat_card(1).with_counter(CounterSpec::new(98).suffix("%"));
    let key = view.register_one(&layout, target).unwrap().unwrap();

    // Trigger frame writes the start state, counter at zero
    run(&engine, &layout, &mut sink, 1);
    assert_eq!(engine.phase(key), Some(RevealPhase::Triggered));
    assert_eq!(sink.text("about/stat/1"), Some("0%"));
    assert_eq!(sink.property("about/stat/1", VisualProperty::Scale), Some(0.8));

    // 750ms into a 1.5s linear counter
    run(&engine, &layout, &mut sink, 75);
    assert_eq!(engine.counter(key).unwrap().display(), 49);
    assert_eq!(sink.text("about/stat/1"), Some("49%"));

    // Visual tween is done, the counter isn't, so the target hasn't settled
    assert_eq!(sink.property("about/stat/1", VisualProperty::Scale), Some(1.0));
    assert_eq!(engine.phase(key), Some(RevealPhase::Animating));

    let events = run(&engine, &layout, &mut sink, 75);
    assert_eq!(sink.text("about/stat/1"), Some("98%"));
    assert!(engine.is_fired(key));
    assert!(events.contains(&RevealEvent::Settled {
        element: "about/stat/1".into(),
        at: ms(1510),
    }));
}

#[test]
fn test_overshooting_counter_snaps_only_on_completion() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();

    let counter = CounterSpec::new(98).easing(Easing::BackOut { overshoot: 1.7 });
    let key = view
        .register_one(&layout, stat_card(2).with_counter(counter))
        .unwrap()
        .unwrap();

    // 1.2s into 1.5s, the curve is past 1
    run(&engine, &layout, &mut sink, 121);
    let state = engine.counter(key).unwrap();
    assert_eq!(state.display(), 97);
    assert!(!state.is_finished());
    assert_eq!(sink.text("about/stat/2"), Some("97"));
    assert!(!engine.is_fired(key));

    run(&engine, &layout, &mut sink, 30);
    assert_eq!(sink.text("about/stat/2"), Some("98"));
    assert!(engine.is_fired(key));
}

#[test]
fn test_stagger_gap_between_first_and_fourth_card() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();

    let group = view
        .register(&layout, (0..4).map(stat_card), StaggerConfig::from_millis(100))
        .unwrap();
    assert_eq!(group.registered(), 4);

    let events = run(&engine, &layout, &mut sink, 40);
    let first = started_at(&events, "about/stat/0").unwrap();
    let last = started_at(&events, "about/stat/3").unwrap();
    assert_eq!(last - first, ms(300));

    for i in 0..3 {
        let a = started_at(&events, &format!("about/stat/{i}")).unwrap();
        let b = started_at(&events, &format!("about/stat/{}", i + 1)).unwrap();
        assert_eq!(b - a, ms(100));
    }
}

#[test]
fn test_start_state_applied_during_delay() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();
    let group = view
        .register(&layout, (0..4).map(stat_card), StaggerConfig::from_millis(100))
        .unwrap();

    run(&engine, &layout, &mut sink, 5);
    let fourth = group.get(3).unwrap();
    assert_eq!(engine.phase(fourth), Some(RevealPhase::Triggered));
    assert_eq!(sink.property("about/stat/3", VisualProperty::Opacity), Some(0.0));
    assert_eq!(sink.property("about/stat/3", VisualProperty::Scale), Some(0.8));
}

#[test]
fn test_scrolling_back_never_refires() {
    let engine = RevealEngine::with_seed(1);
    let mut layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("skills").unwrap();
    let key = view.register_one(&layout, headline()).unwrap().unwrap();

    let mut events = run(&engine, &layout, &mut sink, 3);
    assert_eq!(engine.phase(key), Some(RevealPhase::Armed));

    layout.scroll_to(900.0);
    events.extend(run(&engine, &layout, &mut sink, 100));
    assert!(engine.is_fired(key));

    for scroll in [0.0, 900.0, 0.0, 2500.0, 900.0] {
        layout.scroll_to(scroll);
        events.extend(run(&engine, &layout, &mut sink, 20));
    }

    assert_eq!(count_triggered(&events, "skills/headline"), 1);
    assert_eq!(events.iter().filter(|e| e.is_settled()).count(), 1);
    assert_eq!(engine.phase(key), Some(RevealPhase::Settled));
    assert_eq!(
        sink.property("skills/headline", VisualProperty::TranslateY),
        Some(0.0)
    );
}

#[test]
fn test_reregistering_settled_target_keeps_it_settled() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();
    let key = view.register_one(&layout, stat_card(0)).unwrap().unwrap();

    run(&engine, &layout, &mut sink, 80);
    assert!(engine.is_fired(key));

    let again = view.register_one(&layout, stat_card(0)).unwrap().unwrap();
    assert_eq!(again, key);
    let events = run(&engine, &layout, &mut sink, 80);
    assert!(events.is_empty());
    assert!(engine.is_fired(key));
    assert_eq!(engine.target_count(), 1);
}

#[test]
fn test_reregistering_in_flight_target_does_not_restart() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();
    let key = view.register_one(&layout, stat_card(2)).unwrap().unwrap();

    run(&engine, &layout, &mut sink, 20);
    assert_eq!(engine.phase(key), Some(RevealPhase::Animating));
    assert_eq!(view.register_one(&layout, stat_card(2)).unwrap(), Some(key));

    // 600ms tween, triggered on frame 1: settles on frame 61
    let events = run(&engine, &layout, &mut sink, 41);
    assert_eq!(count_triggered(&events, "about/stat/2"), 0);
    assert!(engine.is_fired(key));
}

#[test]
fn test_unmount_cancels_everything() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();

    let view = engine.mount("about").unwrap();
    let group = view
        .register(
            &layout,
            (0..4).map(|i| stat_card(i).with_counter(CounterSpec::new(500).suffix("+"))),
            StaggerConfig::from_millis(100),
        )
        .unwrap();
    run(&engine, &layout, &mut sink, 10);
    assert_eq!(engine.active_tweens(), 8);

    drop(view);
    assert_eq!(engine.active_tweens(), 0);
    assert_eq!(engine.target_count(), 0);
    assert_eq!(engine.view_count(), 0);
    assert!(group.iter().all(|key| engine.phase(key).is_none()));

    let frozen = sink.text("about/stat/0").map(str::to_string);
    let events = run(&engine, &layout, &mut sink, 200);
    assert!(events.is_empty());
    assert_eq!(sink.text("about/stat/0").map(str::to_string), frozen);
}

#[test]
fn test_remount_rearms_targets() {
    let engine = RevealEngine::with_seed(1);
    let layout = page();
    let mut sink = RecordingPresentation::new();

    let view = engine.mount("about").unwrap();
    let first = view.register_one(&layout, stat_card(0)).unwrap().unwrap();
    run(&engine, &layout, &mut sink, 80);
    assert!(engine.is_fired(first));
    view.unmount();

    let view = engine.mount("about").unwrap();
    let second = view.register_one(&layout, stat_card(0)).unwrap().unwrap();
    assert_ne!(first, second);
    assert_eq!(engine.phase(second), Some(RevealPhase::Armed));
    let events = run(&engine, &layout, &mut sink, 80);
    assert_eq!(count_triggered(&events, "about/stat/0"), 1);
}

#[test]
fn test_missing_element_keeps_sibling_offsets() {
    let engine = RevealEngine::with_seed(1);
    let mut layout = page();
    layout.remove("about/stat/1");
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("about").unwrap();

    let group = view
        .register(&layout, (0..3).map(stat_card), StaggerConfig::from_millis(150))
        .unwrap();
    assert_eq!(group.len(), 3);
    assert_eq!(group.registered(), 2);
    assert!(group.get(1).is_none());

    let events = run(&engine, &layout, &mut sink, 40);
    let first = started_at(&events, "about/stat/0").unwrap();
    let third = started_at(&events, "about/stat/2").unwrap();
    assert_eq!(third - first, ms(300));
    assert!(sink.node("about/stat/1").is_none());
}

#[test]
fn test_particles_fade_out_and_leave_tree() {
    let engine = RevealEngine::with_seed(42);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("hero").unwrap();

    let config = ParticleConfig::default()
        .with_burst(5, ms(20))
        .with_lifetime(0.3..0.6);
    let spawner = view.start_particles("hero/backdrop", config).unwrap();

    let events = run(&engine, &layout, &mut sink, 100);
    let spawned = events
        .iter()
        .filter(|e| matches!(e, RevealEvent::ParticleSpawned { .. }))
        .count();
    assert!(spawned >= 5);
    assert!(sink.peak_particles() > 0);

    assert!(spawner.stop());
    assert!(!spawner.stop());
    assert!(!spawner.is_running());

    run(&engine, &layout, &mut sink, 100);
    assert_eq!(sink.particle_count(), 0);
    assert_eq!(engine.live_particles(), 0);
    assert_eq!(sink.removed_particles().len() as u64, sink.inserted_total());
    assert!(sink
        .removed_particles()
        .iter()
        .all(|(_, opacity)| *opacity == 0.0));
}

#[test]
fn test_unmount_removes_particles_next_frame() {
    let engine = RevealEngine::with_seed(7);
    let layout = page();
    let mut sink = RecordingPresentation::new();
    let view = engine.mount("hero").unwrap();
    let spawner = view
        .start_particles("hero/backdrop", ParticleConfig::default())
        .unwrap();

    run(&engine, &layout, &mut sink, 50);
    assert!(sink.particle_count() > 0);

    drop(view);
    assert!(!spawner.is_running());
    assert!(sink.particle_count() > 0);

    let events = engine.tick(FRAME, &layout, &mut sink);
    assert_eq!(sink.particle_count(), 0);
    assert!(events.is_empty());
    assert_eq!(engine.running_spawners(), 0);
}

#[test]
fn test_invalid_particle_config_is_rejected() {
    let engine = RevealEngine::with_seed(1);
    let view = engine.mount("hero").unwrap();
    let config = ParticleConfig::default().with_glyphs(Vec::<String>::new());
    assert!(matches!(
        view.start_particles("hero/backdrop", config),
        Err(RevealError::EmptyGlyphSet)
    ));
}

#[test]
fn test_shutdown_stops_engine() {
    let engine = RevealEngine::with_seed(1);
    let handle = engine.handle();
    let layout = page();
    let mut sink = RecordingPresentation::new();

    let view = engine.mount("about").unwrap();
    view.register(&layout, (0..4).map(stat_card), StaggerConfig::none())
        .unwrap();
    engine.shutdown();

    assert!(engine.is_shut_down());
    assert!(!handle.is_alive());
    assert!(matches!(handle.mount("late"), Err(RevealError::EngineShutDown)));
    assert!(engine.tick(FRAME, &layout, &mut sink).is_empty());

    // Dropping a scope after shutdown is a no-op
    drop(view);
}

#[test]
fn test_scope_outliving_engine() {
    let engine = RevealEngine::with_seed(1);
    let view = engine.mount("about").unwrap();
    drop(engine);

    let layout = page();
    assert!(matches!(
        view.register_one(&layout, stat_card(0)),
        Err(RevealError::EngineShutDown)
    ));
    drop(view);
}

proptest! {
    #[test]
    fn prop_targets_fire_at_most_once(
        scrolls in proptest::collection::vec((0.0f32..4200.0, 1usize..30), 1..20)
    ) {
        let engine = RevealEngine::with_seed(3);
        let mut layout = page();
        let mut sink = RecordingPresentation::new();
        let view = engine.mount("page").unwrap();
        let cards = (0..4).map(|i| stat_card(i).with_counter(CounterSpec::new(98)));
        view.register(&layout, cards, StaggerConfig::from_millis(100)).unwrap();
        view.register_one(&layout, headline()).unwrap();

        let mut events = Vec::new();
        for (scroll, frames) in scrolls {
            layout.scroll_to(scroll);
            for _ in 0..frames {
                events.extend(engine.tick(FRAME, &layout, &mut sink));
                for i in 0..4 {
                    if let Some(text) = sink.text(&format!("about/stat/{i}")) {
                        let shown: u32 = text.parse().unwrap();
                        prop_assert!(shown <= 98);
                    }
                }
            }
        }

        for element in ["about/stat/0", "about/stat/3", "skills/headline"] {
            prop_assert!(count_triggered(&events, element) <= 1);
            let settled = events
                .iter()
                .filter(|e| e.is_settled() && e.element().map(ElementId::as_str) == Some(element))
                .count();
            prop_assert!(settled <= 1);
        }
    }
}
