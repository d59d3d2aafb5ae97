// File: crates/trendline-core/tests/scales.rs
// Purpose: Linear/time scale mapping, tick generation and label formats.

use chrono::{TimeZone, Utc};
use trendline_core::format::{format_grouped, precision_for_step, TimeLabel, ValueFormatter};
use trendline_core::preset::MS_PER_DAY;
use trendline_core::scale::{nice, tick_interval, ticks, LinearScale, TimeScale, TimeUnit};

#[test]
fn linear_ticks_land_on_round_steps() {
    assert_eq!(ticks(0.0, 10.0, 6), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    assert_eq!(ticks(-0.6, 30.6, 6), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
    assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    assert_eq!(ticks(3.0, 3.0, 6), vec![3.0]);
    assert!(ticks(0.0, 1.0, 0).is_empty());
}

#[test]
fn nice_rounds_outward() {
    assert_eq!(nice(0.3, 9.7, 10.0), (0.0, 10.0));
    assert_eq!(nice(10.0, 12.0, 10.0), (10.0, 12.0));
}

#[test]
fn linear_scale_inverts_range_and_widens_flat_domain() {
    let s = LinearScale::new((0.0, 100.0), (260.0, 20.0));
    assert_eq!(s.to_px(0.0), 260.0);
    assert_eq!(s.to_px(100.0), 20.0);
    assert!((s.from_px(140.0) - 50.0).abs() < 1e-9);

    let flat = LinearScale::new((5.0, 5.0), (100.0, 0.0));
    assert_eq!((flat.d0, flat.d1), (4.5, 5.5));
    assert!((flat.to_px(5.0) - 50.0).abs() < 1e-9);

    for v in [1.0e16, -3.0e17, 1.0e300] {
        let big = LinearScale::new((v, v), (100.0, 0.0));
        assert!(big.d1 > big.d0, "{v}");
        assert!((big.to_px(v) - 50.0).abs() < 1.0, "{v}");
    }
}

#[test]
fn time_scale_maps_endpoints_and_centres_single_instant() {
    let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
    let s = TimeScale::new(a, b, (50.0, 590.0));
    assert_eq!(s.to_px(a), 50.0);
    assert_eq!(s.to_px(b), 590.0);
    assert_eq!(s.from_px(590.0), b);

    let single = TimeScale::new(a, a, (0.0, 100.0));
    assert!((single.to_px(a) - 50.0).abs() < 1e-9);
}

#[test]
fn time_interval_picks_the_closest_calendar_step() {
    let day = MS_PER_DAY;
    // 4h target sits between 3h and 6h, closer to 3h
    assert_eq!(tick_interval(0, day, 6), (TimeUnit::Hour, 3));
    // 5 days: closer to one week than two days
    assert_eq!(tick_interval(0, 30 * day, 6), (TimeUnit::Week, 1));
    assert_eq!(tick_interval(0, 365 * day, 6), (TimeUnit::Month, 3));
}

#[test]
fn day_window_ticks_every_three_hours() {
    let a = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
    let s = TimeScale::new(a, b, (0.0, 100.0));
    let t = s.ticks(6);
    assert_eq!(t.len(), 9);
    assert_eq!(t.first(), Some(&a));
    assert_eq!(t.last(), Some(&b));
}

#[test]
fn month_window_ticks_fall_on_sundays() {
    let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
    let t = TimeScale::new(a, b, (0.0, 100.0)).ticks(6);
    let days: Vec<u32> = t.iter().map(|d| d.format("%d").to_string().parse().unwrap()).collect();
    assert_eq!(days, vec![7, 14, 21, 28]);
}

#[test]
fn time_label_switches_on_exclusive_bounds() {
    assert_eq!(TimeLabel::for_span(MS_PER_DAY - 1), TimeLabel::Clock);
    assert_eq!(TimeLabel::for_span(MS_PER_DAY), TimeLabel::DayClock);
    assert_eq!(TimeLabel::for_span(30 * MS_PER_DAY - 1), TimeLabel::DayClock);
    assert_eq!(TimeLabel::for_span(30 * MS_PER_DAY), TimeLabel::Day);

    let t = Utc.with_ymd_and_hms(2024, 4, 14, 14, 30, 0).unwrap();
    assert_eq!(TimeLabel::Clock.format(t), "14:30");
    assert_eq!(TimeLabel::DayClock.format(t), "Apr 14 14:30");
    assert_eq!(TimeLabel::Day.format(t), "Apr 14");
}

#[test]
fn value_labels_group_thousands_and_use_step_precision() {
    assert_eq!(precision_for_step(5.0), 0);
    assert_eq!(precision_for_step(0.2), 1);
    assert_eq!(precision_for_step(0.05), 2);
    assert_eq!(format_grouped(1234567.0, 0), "1,234,567");
    assert_eq!(format_grouped(-1500.0, 0), "\u{2212}1,500");

    let f = ValueFormatter::for_step(0.5);
    assert_eq!(f.precision(), 1);
    assert_eq!(f.format(12.0), "12.0");
}
