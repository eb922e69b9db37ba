mod common;

use almanac::{
    almanac_errors::AlmanacError,
    astrometry::EventKind,
    jpl_ephem::naif::naif_ids::PlanetaryBary,
    labels::{COMPASS_POINTS, PHASE_NAMES},
    report::{future_elongations, target_block, write_report},
};
use common::{context, moon, planet, sirius, sun, MockSky};
use regex::Regex;

#[test]
fn test_moon_block() {
    let block = target_block(&MockSky::new(), &context(), &moon()).unwrap();
    let expected = "Moon (above horizon)\n\
                    Azimuth: 131deg 02' 44.5\" (SE)\n\
                    Altitude: 27deg 50' 04.9\"\n\
                    Elongation: 151deg 21' 39.6\"\n\
                    Phase: 151.8 (Waxing Gibbous)\n\
                    Fri 18 09:00 CDT - set at 311deg 02' 44.5\" (NW)\n\
                    Fri 18 18:30 CDT - rise at 93deg 32' 44.5\" (E)\n\
                    \n";
    assert_eq!(block, expected);
}

#[test]
fn test_moon_block_has_one_phase_line_and_events_inside_window() {
    let block = target_block(&MockSky::new(), &context(), &moon()).unwrap();

    let phase = Regex::new(r"^Phase: \d+\.\d \((.+)\)$").unwrap();
    let phase_lines: Vec<&str> = block.lines().filter(|l| l.starts_with("Phase")).collect();
    assert_eq!(phase_lines.len(), 1);
    let captures = phase.captures(phase_lines[0]).unwrap();
    assert!(PHASE_NAMES.contains(&&captures[1]));

    let event = Regex::new(r"^\w{3} \d{2} \d{2}:\d{2} \w+ - (rise|set) at .+ \((\w+)\)$").unwrap();
    let events: Vec<_> = block.lines().filter_map(|l| event.captures(l)).collect();
    assert_eq!(events.len(), 2);
    for captures in events {
        assert!(COMPASS_POINTS.contains(&&captures[2]));
    }
    assert!(!block.contains("Future Elongation"));
}

#[test]
fn test_sun_block_has_no_elongation() {
    let block = target_block(&MockSky::new(), &context(), &sun()).unwrap();
    assert!(block.starts_with("Sun (above horizon)\n"));
    assert!(!block.contains("Elongation"));
    assert!(!block.contains("Phase"));
    assert!(block.contains("- rise at"));
    assert!(block.ends_with("\n\n"));
}

#[test]
fn test_planet_block() {
    let block = target_block(&MockSky::new(), &context(), &planet("Mars", PlanetaryBary::Mars)).unwrap();
    let lines: Vec<&str> = block.lines().collect();
    assert_eq!(lines[0], "Mars (above horizon)");
    assert_eq!(lines[3], "Elongation: 47deg 15' 00.0\"");
    assert_eq!(
        lines[4],
        "Future Elongation by Week: [73, 99, 124, 150, 176, 22, 48, 74, 100, 126, 152, 178]"
    );
    assert!(!block.contains("Phase"));
    assert!(!block.contains("Max altitude"));
}

#[test]
fn test_empty_events_below_horizon() {
    let mut sky = MockSky::new();
    sky.altitudes.insert("Neptune".to_string(), -12.5);
    let block = target_block(&sky, &context(), &planet("Neptune", PlanetaryBary::Neptune)).unwrap();
    let lines: Vec<&str> = block.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Neptune (below horizon)");
    assert!(lines[1].starts_with("Elongation: "));
    assert!(lines[2].starts_with("Future Elongation by Week: ["));
    assert_eq!(lines[3], "");
}

#[test]
fn test_star_block() {
    let block = target_block(&MockSky::new(), &context(), &sirius()).unwrap();
    let lines: Vec<&str> = block.lines().collect();
    assert_eq!(lines[0], "Sirius (above horizon)");
    assert_eq!(lines[1], "Max altitude tonight: 63 degrees at Thu 17 23:00 CDT");
    assert!(lines[2].starts_with("Azimuth: "));
    assert!(lines[4].starts_with("Elongation: "));
    assert!(lines[5].starts_with("Future Elongation by Month: "));
    assert!(!block.contains("Phase"));
}

#[test]
fn test_future_elongation_samples() {
    let context = context();
    let samples = future_elongations(&MockSky::new(), &sirius(), &context.window, 30.0).unwrap();
    assert_eq!(samples.len(), 12);
    assert_eq!(samples[0].instant, context.window.sample_after_start(1, 30.0));
    assert_eq!(samples[0].degrees, 29);
    assert!(samples.iter().all(|s| (0..=180).contains(&s.degrees)));
}

#[test]
fn test_events_outside_window_are_dropped() {
    let mut sky = MockSky::new();
    sky.events.insert(
        "Jupiter".to_string(),
        vec![(0.0, EventKind::Rise), (6.0, EventKind::Set), (24.0, EventKind::Rise)],
    );
    let block = target_block(&sky, &context(), &planet("Jupiter", PlanetaryBary::Jupiter)).unwrap();
    assert_eq!(block.matches(" at ").count(), 1);
    assert!(block.contains("- set at"));
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let targets = [sun(), moon(), planet("Mars", PlanetaryBary::Mars), sirius()];
    let run = || {
        let mut out = Vec::new();
        write_report(&MockSky::new(), &context(), &targets, &mut out).unwrap();
        out
    };
    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn test_failing_target_is_fatal_by_default() {
    let mut sky = MockSky::new();
    sky.failing.push("Mars".to_string());
    let targets = [sun(), planet("Mars", PlanetaryBary::Mars), moon()];

    let mut out = Vec::new();
    assert_eq!(
        write_report(&sky, &context(), &targets, &mut out),
        Err(AlmanacError::EphemerisBodyNotFound(999))
    );
}

#[test]
fn test_failing_target_is_skipped_on_request() {
    let mut sky = MockSky::new();
    sky.failing.push("Mars".to_string());
    let targets = [sun(), planet("Mars", PlanetaryBary::Mars), moon()];
    let mut context = context();
    context.report.skip_failed_targets = true;

    let mut out = Vec::new();
    let written = write_report(&sky, &context, &targets, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(written, 2);
    assert!(text.starts_with("Sun "));
    assert!(text.contains("\nMoon "));
    assert!(!text.contains("Mars"));
}
