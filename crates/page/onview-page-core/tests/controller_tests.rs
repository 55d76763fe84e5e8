use onview_page_core::{
    Config, PageController, PageEvent, PageInputs, PageSpec, ScrollSample, UiCommand,
};
use onview_reveal_core::DomWrite;

fn load_page(name: &str) -> PageSpec {
    let json = onview_test_fixtures::pages::json(name).expect("fixture should load");
    PageSpec::from_json(&json).expect("fixture should parse")
}

fn style_writes<'a>(
    out: &'a onview_page_core::PageOutputs,
    target: &'a str,
) -> impl Iterator<Item = (&'a str, &'a str)> {
    out.writes.iter().filter_map(move |op| match &op.write {
        DomWrite::SetStyle { name, value } if op.target == target => {
            Some((name.as_str(), value.as_str()))
        }
        _ => None,
    })
}

fn text_of(out: &onview_page_core::PageOutputs, target: &str) -> Option<String> {
    out.writes.iter().rev().find_map(|op| match &op.write {
        DomWrite::SetText { text } if op.target == target => Some(text.clone()),
        _ => None,
    })
}

/// it should parse and validate every shipped page fixture
#[test]
fn fixtures_parse_and_validate() {
    let mut keys = onview_test_fixtures::pages::keys();
    keys.sort();
    assert_eq!(keys.len(), 4);
    for name in keys {
        let spec = load_page(&name);
        spec.validate_basic().expect("fixture should validate");
        PageController::build(&spec, Config::default()).expect("fixture should compile");
    }
}

/// it should hide the ring behind a full-circumference dash offset at init
/// and flip to the 65% offset after the settle ticks
#[test]
fn ring_offsets_match_the_circumference() {
    let spec = load_page("apple-illusion");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();

    // First tick flushes init writes: dasharray == dashoffset == 2*pi*82.
    let out = ctrl.update(0.0, PageInputs::default()).clone();
    let ring: Vec<(&str, &str)> = style_writes(&out, "emi/ring").collect();
    assert!(ring.contains(&("stroke-dasharray", "515.2")));
    assert!(ring.contains(&("stroke-dashoffset", "515.2")));

    // The ring element itself fires at 0.4 visibility.
    let out = ctrl
        .update(16.0, PageInputs::visible("emi/ring", 0.5))
        .clone();
    assert!(
        style_writes(&out, "emi/ring").next().is_none(),
        "delegated flip waits for the settle ticks"
    );
    // Readout counter starts at 0 on the fire tick.
    assert_eq!(text_of(&out, "emi/pct").as_deref(), Some("0"));

    ctrl.update(16.0, PageInputs::default());
    let out = ctrl.update(16.0, PageInputs::default()).clone();
    let ring: Vec<(&str, &str)> = style_writes(&out, "emi/ring").collect();
    // 515.2 - 0.65 * 515.2
    assert_eq!(ring, vec![("stroke-dashoffset", "180.3")]);
}

/// it should finish the paired readout on the exact target value
#[test]
fn ring_readout_reaches_exact_percent() {
    let spec = load_page("apple-illusion");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());
    ctrl.update(0.0, PageInputs::visible("emi/ring", 0.5));
    let out = ctrl.update(2200.0, PageInputs::default()).clone();
    assert_eq!(text_of(&out, "emi/pct").as_deref(), Some("65"));
}

/// it should request a chart build exactly once per container
#[test]
fn chart_build_is_lazy_and_once() {
    let spec = load_page("grocery-basket");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    let out = ctrl
        .update(16.0, PageInputs::visible("engagement-chart-area", 0.2))
        .clone();
    let built: Vec<_> = out
        .events
        .iter()
        .filter_map(|e| match e {
            PageEvent::ChartBuildRequested { target, chart } => Some((target.clone(), chart)),
            _ => None,
        })
        .collect();
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].0, "engagement-chart-area");
    assert_eq!(built[0].1.series.len(), 2);
    assert!((built[0].1.series[0].data[6].value - 35.4).abs() < 1e-6);

    // Scrolling the chart back into view must not rebuild it.
    let out = ctrl
        .update(16.0, PageInputs::visible("engagement-chart-area", 0.9))
        .clone();
    assert!(!out
        .events
        .iter()
        .any(|e| matches!(e, PageEvent::ChartBuildRequested { .. })));
}

/// it should keep exactly one tab panel active after repeated selects and
/// re-play the one-shots the panel contains
#[test]
fn tab_switch_is_idempotent_and_replays() {
    let spec = load_page("apple-illusion");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    for round in 0..2 {
        let out = ctrl
            .update(
                16.0,
                PageInputs::command(UiCommand::SelectTab {
                    group: "strategies".into(),
                    panel: 0,
                }),
            )
            .clone();
        let active_panels: Vec<_> = out
            .writes
            .iter()
            .filter(|op| {
                op.target.starts_with("tabs/panel")
                    && matches!(&op.write, DomWrite::AddClass { class } if class == "active")
            })
            .collect();
        assert_eq!(active_panels.len(), 1);
        assert_eq!(active_panels[0].target, "tabs/panel[0]");

        // The re-spawned h-bars re-assert their zero state on the same
        // tick, since the panel just became visible again.
        let zeroes: Vec<(&str, &str)> = style_writes(&out, "strategies/hb-fill[0]").collect();
        assert_eq!(zeroes, vec![("width", "0%")], "round {round}");
    }

    // After the settle ticks the fills flip to their terminal widths.
    let mut terminal = Vec::new();
    for _ in 0..3 {
        let out = ctrl.update(16.0, PageInputs::default()).clone();
        terminal.extend(
            style_writes(&out, "strategies/hb-fill[0]").map(|(_, v)| v.to_string()),
        );
    }
    assert!(terminal.iter().all(|v| v == "91%"));
    assert!(!terminal.is_empty());
}

/// it should schedule the five bar flips 130 ms apart after the container
/// fires at 20% visibility
#[test]
fn bar_chart_staggers_flips() {
    let spec = load_page("apple-illusion");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    let expected = ["40%", "62%", "75%", "88%", "97%"];
    let out = ctrl
        .update(0.0, PageInputs::visible("data/bc-bars", 0.25))
        .clone();
    let first: Vec<(&str, &str)> = style_writes(&out, "data/bc-bar[0]").collect();
    assert_eq!(first, vec![("height", expected[0])]);

    for (i, want) in expected.iter().enumerate().skip(1) {
        let out = ctrl.update(130.0, PageInputs::default()).clone();
        let target = format!("data/bc-bar[{i}]");
        let flips: Vec<(&str, &str)> = style_writes(&out, &target).collect();
        assert_eq!(flips, vec![("height", *want)], "bar {i} at {}ms", i * 130);
    }
}

/// it should render counters with decimals and suffix strings
#[test]
fn counter_formatting_follows_the_spec() {
    let spec = load_page("biscoff-launch");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());
    ctrl.update(0.0, PageInputs::visible("ch1/stat[1]", 0.4));
    let out = ctrl.update(1600.0, PageInputs::default()).clone();
    assert_eq!(text_of(&out, "ch1/stat[1]").as_deref(), Some("1.06B"));
}

/// it should stagger reveal cards by their pending index
#[test]
fn reveal_cards_stagger_in_order() {
    let spec = load_page("portfolio");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    // All four cards enter the viewport in the same tick.
    let inputs = PageInputs {
        visibility: (0..4)
            .map(|i| onview_page_core::VisibilitySample {
                target: format!("case-card[{i}]"),
                fraction: 0.2,
            })
            .collect(),
        ..PageInputs::default()
    };
    ctrl.update(0.0, inputs);

    // Flips land 80 ms apart, in index order.
    for i in 0..4 {
        let out = if i == 0 {
            ctrl.update(0.0, PageInputs::default()).clone()
        } else {
            ctrl.update(80.0, PageInputs::default()).clone()
        };
        let adds: Vec<_> = out
            .writes
            .iter()
            .filter(|op| matches!(&op.write, DomWrite::AddClass { class } if class == "is-visible"))
            .collect();
        assert_eq!(adds.len(), 1, "one card per 80ms step");
        assert_eq!(adds[0].target, format!("case-card[{i}]"));
    }
}

/// it should drive nav progress and emit ScrollRequested on link clicks
#[test]
fn nav_progress_and_smooth_scroll() {
    let spec = load_page("apple-illusion");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    let out = ctrl
        .update(
            16.0,
            PageInputs {
                scroll: Some(ScrollSample {
                    scroll_y: 2600.0,
                    viewport_h: 800.0,
                    doc_h: 6000.0,
                }),
                ..PageInputs::default()
            },
        )
        .clone();
    // 2600 / 5200 = 50%
    assert_eq!(text_of(&out, "nav/scroll-pct").as_deref(), Some("50%"));
    assert!(out
        .events
        .iter()
        .any(|e| matches!(e, PageEvent::SectionActivated { section } if section == "emi")));
    assert!(out.writes.iter().any(|op| op.target == "nav/link[2]"
        && matches!(&op.write, DomWrite::AddClass { .. })));

    let out = ctrl
        .update(
            16.0,
            PageInputs::command(UiCommand::NavClick {
                section: "data".into(),
            }),
        )
        .clone();
    assert!(out.events.iter().any(
        |e| matches!(e, PageEvent::ScrollRequested { target } if target == "section-data")
    ));
}

/// it should toggle the sticky nav both ways as the hero enters and leaves
#[test]
fn hero_toggle_is_continuous() {
    let spec = load_page("grocery-basket");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    let out = ctrl.update(16.0, PageInputs::visible("hero", 0.02)).clone();
    assert!(out.writes.iter().any(|op| op.target == "sticky-nav"
        && matches!(&op.write, DomWrite::AddClass { class } if class == "visible")));

    // Unlike the one-shots, scrolling back re-hides the bar.
    let out = ctrl.update(16.0, PageInputs::visible("hero", 0.8)).clone();
    assert!(out.writes.iter().any(|op| op.target == "sticky-nav"
        && matches!(&op.write, DomWrite::RemoveClass { class } if class == "visible")));
}

/// it should never replay a one-shot within a page lifetime, and replay
/// everything after an explicit reset
#[test]
fn reset_starts_a_new_lifetime() {
    let spec = load_page("portfolio");
    let mut ctrl = PageController::build(&spec, Config::default()).unwrap();
    ctrl.update(0.0, PageInputs::default());

    ctrl.update(0.0, PageInputs::visible("case-card[0]", 0.5));
    let out = ctrl.update(16.0, PageInputs::default()).clone();
    assert_eq!(out.writes.len(), 1);

    // Re-entering the viewport does nothing for the rest of the lifetime.
    ctrl.update(16.0, PageInputs::visible("case-card[0]", 1.0));
    let out = ctrl.update(16.0, PageInputs::default()).clone();
    assert!(out.writes.is_empty());

    ctrl.reset();
    assert_eq!(ctrl.pending_registrations(), 4);
    ctrl.update(0.0, PageInputs::visible("case-card[0]", 0.5));
    let out = ctrl.update(16.0, PageInputs::default()).clone();
    assert_eq!(out.writes.len(), 1);
}
