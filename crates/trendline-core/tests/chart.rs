// File: crates/trendline-core/tests/chart.rs
// Purpose: Chart lifecycle: construction errors, presets, drag, update, resize and teardown.

use chrono::{DateTime, Duration, TimeZone, Utc};
use trendline_core::{
    ChartConfig, ChartError, ChartEvent, MemoryContainer, MemoryStore, RangePreset, Record, TimeSeriesChart,
    Trend, ValueDomain, ViewWindow, WindowSource,
};

fn day(d: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(d)
}

fn records(n: i64, f: impl Fn(i64) -> f64) -> Vec<Record> {
    (0..n).map(|i| Record::new(day(i)).with("value", f(i))).collect()
}

/// 610px wide with default margins leaves a 540px plot.
fn chart_with(data: &[Record]) -> TimeSeriesChart<MemoryContainer> {
    TimeSeriesChart::create(MemoryContainer::new(610.0), data, ChartConfig::default()).expect("create chart")
}

#[test]
fn create_builds_surface_and_controls() {
    let chart = chart_with(&records(31, |i| i as f64));
    let doc = chart.document();
    let root = doc.root();
    assert_eq!(doc.select_all(root, "portfolio-graph").len(), 1);
    assert_eq!(doc.select_all(root, "timeframe-btn").len(), 6);
    assert_eq!(chart.active_presets(), vec![RangePreset::Max]);
    assert_eq!(chart.window(), ViewWindow::new(day(0), day(30)));
    assert_eq!(chart.window_source(), WindowSource::Preset);
    assert_eq!(chart.size().width, 610.0);
    assert_eq!(chart.size().height, 300.0);
    assert_eq!(chart.plot_rect().width(), 540.0);

    let markup = &chart.container().markup;
    assert!(markup.contains("class=\"portfolio-graph\""));
    assert!(markup.contains("clip-path=\"url(#clip)\""));
    assert!(markup.contains("data-range=\"1W\""));
    assert!(markup.contains("stroke=\"#28a745\""));
}

#[test]
fn create_replaces_prior_container_content() {
    let container = MemoryContainer::new(610.0).with_markup("<p>loading</p>");
    let chart = TimeSeriesChart::create(container, &records(3, |i| i as f64), ChartConfig::default()).unwrap();
    assert!(!chart.container().markup.contains("loading"));
    assert!(chart.container().clears >= 1);
    assert_eq!(chart.container().presents, 1);
}

#[test]
fn create_rejects_detached_container_and_bad_config() {
    let err = TimeSeriesChart::create(MemoryContainer::detached(), &[], ChartConfig::default()).err().unwrap();
    assert!(matches!(err, ChartError::RenderTargetUnavailable(_)));

    let cfg = ChartConfig { width: Some(60.0), ..ChartConfig::default() };
    let err = TimeSeriesChart::create(MemoryContainer::new(610.0), &[], cfg).err().unwrap();
    assert!(matches!(err, ChartError::Configuration(_)));

    // attached but too narrow for the margins
    let err = TimeSeriesChart::create(MemoryContainer::new(50.0), &[], ChartConfig::default()).err().unwrap();
    assert!(matches!(err, ChartError::Configuration(_)));
}

#[test]
fn create_rejects_records_without_any_value() {
    let bad: Vec<Record> = (0..3).map(|i| Record::new(day(i))).collect();
    let err = TimeSeriesChart::create(MemoryContainer::new(610.0), &bad, ChartConfig::default()).err().unwrap();
    assert!(matches!(err, ChartError::InvalidSeries(_)));
}

#[test]
fn malformed_records_are_skipped_and_price_is_a_fallback() {
    let mut data = records(5, |i| i as f64);
    data.push(Record::new(day(5)));
    data.push(Record::new(day(6)).with("price", 9.0));
    let chart = chart_with(&data);
    assert_eq!(chart.series().len(), 6);
    assert_eq!(chart.series().last().map(|p| p.value), Some(9.0));
}

#[test]
fn unmeasured_container_falls_back_to_default_width() {
    let chart =
        TimeSeriesChart::create(MemoryContainer::new(0.0), &records(3, |i| i as f64), ChartConfig::default()).unwrap();
    assert_eq!(chart.size().width, 600.0);
}

#[test]
fn empty_series_draws_axes_over_placeholder() {
    let mut chart = chart_with(&[]);
    assert_eq!(chart.window(), ViewWindow::placeholder());
    assert_eq!(chart.window_source(), WindowSource::Placeholder);
    assert_eq!(chart.value_domain(), ValueDomain::unit());
    let nodes = chart.surface().unwrap();
    assert_eq!(chart.document().attr(nodes.line, "d"), None);
    assert!(!chart.document().select_all(nodes.x_axis, "tick").is_empty());
    assert!(!chart.document().select_all(nodes.y_axis, "tick").is_empty());

    // first real data resolves the preset window
    chart.update(&records(31, |i| i as f64)).unwrap();
    assert_eq!(chart.window(), ViewWindow::new(day(0), day(30)));
    assert_eq!(chart.window_source(), WindowSource::Preset);
    assert!(chart.document().attr(nodes.line, "d").is_some());
}

#[test]
fn single_point_renders_without_degenerate_math() {
    let chart = chart_with(&records(1, |_| 42.0));
    assert_eq!(chart.window().span_ms(), 0);
    let d = chart.document().attr(chart.surface().unwrap().line, "d").unwrap().to_string();
    assert!(d.starts_with('M') && d.ends_with('Z'));
    assert!(!d.contains("NaN") && !d.contains("inf"));
    assert!(chart.y_ticks().iter().any(|t| t.label == "42.0"));

    let huge = chart_with(&records(3, |_| 1.0e17));
    let d = huge.document().attr(huge.surface().unwrap().line, "d").unwrap().to_string();
    assert!(!d.contains("NaN") && !d.contains("inf"), "{d}");
}

#[test]
fn axis_labels_follow_window_and_value_range() {
    let chart = chart_with(&records(31, |i| i as f64));
    let x: Vec<String> = chart.x_ticks().into_iter().map(|t| t.label).collect();
    assert_eq!(x, vec!["Jan 07", "Jan 14", "Jan 21", "Jan 28"]);
    let y: Vec<String> = chart.y_ticks().into_iter().map(|t| t.label).collect();
    assert_eq!(y, vec!["0", "5", "10", "15", "20", "25", "30"]);

    let y_axis = chart.surface().unwrap().y_axis;
    assert!(chart.document().select(y_axis, "domain").is_none());
    let x_axis = chart.surface().unwrap().x_axis;
    assert!(chart.document().select(x_axis, "domain").is_some());
}

#[test]
fn select_preset_updates_window_and_active_button() {
    let mut chart = chart_with(&records(60, |i| i as f64));
    chart.select_preset(RangePreset::OneWeek).unwrap();
    assert_eq!(chart.preset(), RangePreset::OneWeek);
    assert_eq!(chart.window(), ViewWindow::new(day(52), day(59)));
    assert_eq!(chart.active_presets(), vec![RangePreset::OneWeek]);
    assert!((chart.value_domain().min - (52.0 - 0.14)).abs() < 1e-9);

    let x: Vec<String> = chart.x_ticks().into_iter().map(|t| t.label).collect();
    assert!(x.iter().all(|l| l.contains(':')), "week window labels carry a clock: {x:?}");
}

#[test]
fn drag_pans_window_and_recolours_line() {
    // dips for 10 days then recovers to just below the start
    let data = records(31, |i| if i <= 10 { 100.0 - i as f64 } else { 90.0 + 0.4 * (i - 10) as f64 });
    let mut chart = chart_with(&data);
    assert_eq!(chart.trend(), Trend::Loss);

    chart.handle_drag_start(300.0);
    chart.handle_drag_move(354.0);
    let (start, end) = chart.x_domain();
    let shift = (day(0) - start).num_milliseconds();
    assert!((shift - Duration::days(3).num_milliseconds()).abs() <= 1, "shift {shift}");
    assert_eq!((end - start).num_days(), 30);
    assert_eq!(chart.window_source(), WindowSource::Pan);
    // visible data now ends on day 27 at 96.8, still below 100
    assert_eq!(chart.trend(), Trend::Loss);

    // moves are measured from the drag start, not cumulative
    chart.handle_drag_move(300.0 - 135.0);
    assert_eq!(chart.x_domain().0, day(0) + Duration::hours(180));
    assert_eq!(chart.trend(), Trend::Gain);
    let line = chart.surface().unwrap().line;
    assert_eq!(chart.document().attr(line, "stroke"), Some("#28a745"));

    chart.handle_drag_end();
    assert!(!chart.is_dragging());
    assert_eq!(chart.preset(), RangePreset::Max);
}

#[test]
fn drag_move_without_start_is_ignored() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    let before = chart.window();
    let presents = chart.container().presents;
    chart.handle_drag_move(400.0);
    assert_eq!(chart.window(), before);
    assert_eq!(chart.container().presents, presents);
}

#[test]
fn render_pass_cancels_active_drag() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    chart.handle_drag_start(100.0);
    chart.select_preset(RangePreset::OneWeek).unwrap();
    assert!(!chart.is_dragging());
    let w = chart.window();
    chart.handle_drag_move(200.0);
    assert_eq!(chart.window(), w);
}

#[test]
fn update_keeps_window_and_preset() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    chart.select_preset(RangePreset::OneWeek).unwrap();
    let window = chart.window();

    chart.update(&records(45, |i| 2.0 * i as f64)).unwrap();
    assert_eq!(chart.window(), window);
    assert_eq!(chart.preset(), RangePreset::OneWeek);
    assert_eq!(chart.series().len(), 45);
    // values inside the unchanged window are now doubled
    assert!((chart.value_domain().max - (60.0 + 0.28)).abs() < 1e-9);

    chart.update(&records(45, |i| 100.0 - i as f64)).unwrap();
    assert_eq!(chart.trend(), Trend::Loss);
    let line = chart.surface().unwrap().line;
    assert_eq!(chart.document().attr(line, "stroke"), Some("#dc3545"));
}

#[test]
fn update_after_pan_keeps_panned_domain() {
    let mut chart = chart_with(&records(60, |i| i as f64));
    chart.handle_drag_start(300.0);
    chart.handle_drag_move(354.0);
    chart.handle_drag_end();
    let panned = chart.x_domain();
    assert_eq!(chart.window_source(), WindowSource::Pan);

    chart.update(&records(90, |i| 3.0 * i as f64)).unwrap();
    assert_eq!(chart.x_domain(), panned);
    assert_eq!(chart.window_source(), WindowSource::Pan);
    assert_eq!(chart.series().len(), 90);
}

#[test]
fn oversized_drag_moves_do_not_panic() {
    let mut chart = chart_with(&records(3650, |i| 100.0 + (i % 50) as f64));
    let span = chart.window().span_ms();
    for dx in [1.0e9, -1.0e9, 1.0e30, -1.0e30] {
        chart.handle_drag_start(300.0);
        chart.handle_drag_move(300.0 + dx);
        chart.handle_drag_end();
        assert_eq!(chart.window().span_ms(), span, "dx {dx}");
        assert_eq!(chart.window_source(), WindowSource::Pan);
        let line = chart.surface().unwrap().line;
        let d = chart.document().attr(line, "d").unwrap_or_default();
        assert!(!d.contains("NaN"), "dx {dx}");
    }
}

#[test]
fn update_with_nothing_usable_leaves_state_untouched() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    let bad = vec![Record::new(day(40))];
    assert!(matches!(chart.update(&bad), Err(ChartError::InvalidSeries(_))));
    assert_eq!(chart.series().len(), 31);
}

#[test]
fn surface_nodes_survive_every_interaction() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    let nodes = chart.surface().unwrap();
    let root = chart.document().root();

    chart.handle_drag_start(10.0);
    chart.handle_drag_move(80.0);
    chart.handle_drag_end();
    chart.update(&records(40, |i| i as f64)).unwrap();
    chart.select_preset(RangePreset::OneMonth).unwrap();
    chart.render().unwrap();

    assert_eq!(chart.surface(), Some(nodes));
    let doc = chart.document();
    assert_eq!(doc.select_all(root, "portfolio-graph"), vec![nodes.svg]);
    assert_eq!(doc.select_all(root, "line-group"), vec![nodes.line_group]);
    assert_eq!(doc.select_tag(nodes.line_group, "path"), vec![nodes.line]);
    assert_eq!(doc.select_all(root, "timeframe-toggles").len(), 1);
}

#[test]
fn hidden_controls_skip_toolbar() {
    let cfg = ChartConfig { show_timeframe_controls: false, ..ChartConfig::default() };
    let chart = TimeSeriesChart::create(MemoryContainer::new(610.0), &records(5, |i| i as f64), cfg).unwrap();
    assert!(chart.surface().unwrap().buttons.is_none());
    assert!(!chart.container().markup.contains("timeframe-toggles"));
    assert!(chart.active_presets().is_empty());
}

#[test]
fn resize_only_rerenders_when_enabled() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    chart.container_mut().set_width(800.0);
    chart.handle_resize().unwrap();
    assert_eq!(chart.size().width, 610.0);

    let cfg = ChartConfig { resize_on_window: true, ..ChartConfig::default() };
    let mut chart = TimeSeriesChart::create(MemoryContainer::new(610.0), &records(31, |i| i as f64), cfg).unwrap();
    assert!(chart.container().resize_subscribed);
    chart.container_mut().set_width(800.0);
    chart.dispatch(ChartEvent::Resize).unwrap();
    assert_eq!(chart.size().width, 800.0);
    assert_eq!(chart.size().height, 300.0);
    let svg = chart.surface().unwrap().svg;
    assert_eq!(chart.document().attr(svg, "width"), Some("800"));

    let container = chart.destroy();
    assert!(!container.resize_subscribed);
    assert!(container.markup.is_empty());
}

#[test]
fn dispatch_routes_events_in_order() {
    let mut chart = chart_with(&records(31, |i| i as f64));
    for ev in [
        ChartEvent::PresetClicked(RangePreset::OneWeek),
        ChartEvent::DragStart { x: 300.0 },
        ChartEvent::DragMove { x: 300.0 - 54.0 },
        ChartEvent::DragEnd,
    ] {
        chart.dispatch(ev).unwrap();
    }
    assert_eq!(chart.preset(), RangePreset::OneWeek);
    assert!(chart.x_domain().1 > day(30));
    assert!(!chart.is_dragging());
}

#[test]
fn refresh_from_store_applies_known_keys_only() {
    let mut store = MemoryStore::new();
    store.put("AAPL", records(10, |i| 150.0 + i as f64));
    let mut chart = chart_with(&records(3, |i| i as f64));

    assert!(chart.refresh_from(&store, "AAPL").unwrap());
    assert_eq!(chart.series().len(), 10);
    assert!(!chart.refresh_from(&store, "MSFT").unwrap());
    assert_eq!(chart.series().len(), 10);

    store.push("AAPL", Record::new(day(10)).with("value", 1.0));
    chart.refresh_from(&store, "AAPL").unwrap();
    assert_eq!(chart.series().len(), 11);
    assert_eq!(store.keys().collect::<Vec<_>>(), vec!["AAPL"]);
}

#[test]
fn custom_y_key_selects_field() {
    let data: Vec<Record> = (0..5).map(|i| Record::new(day(i)).with("close", 10.0 * i as f64).with("value", -1.0)).collect();
    let cfg = ChartConfig { y_key: Some("close".into()), ..ChartConfig::default() };
    let chart = TimeSeriesChart::create(MemoryContainer::new(610.0), &data, cfg).unwrap();
    assert_eq!(chart.series().last().map(|p| p.value), Some(40.0));
}

#[test]
fn three_point_max_window_pads_and_gains() {
    let data = vec![
        Record::new(day(0)).with("value", 100.0),
        Record::new(day(1)).with("value", 90.0),
        Record::new(day(2)).with("value", 110.0),
    ];
    let chart = chart_with(&data);
    assert_eq!(chart.x_domain(), (day(0), day(2)));
    let d = chart.value_domain();
    assert!((d.min - 89.6).abs() < 1e-9 && (d.max - 110.4).abs() < 1e-9, "{d:?}");
    assert_eq!(chart.trend(), Trend::Gain);
}

#[test]
fn reselecting_a_preset_is_idempotent() {
    let mut chart = chart_with(&records(400, |i| (i as f64 * 0.1).sin()));
    chart.select_preset(RangePreset::SixMonths).unwrap();
    let first = chart.window();
    chart.select_preset(RangePreset::SixMonths).unwrap();
    assert_eq!(chart.window(), first);
    assert_eq!(chart.active_presets(), vec![RangePreset::SixMonths]);
    assert_eq!(first.span_ms(), 180 * 86_400_000);
}
