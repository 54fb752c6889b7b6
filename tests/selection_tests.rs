// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for preview and picture size selection

use cropcam::{Resolution, select_picture_size, select_preview_size};

fn sizes(list: &[(u32, u32)]) -> Vec<Resolution> {
    list.iter().map(|&(w, h)| Resolution::new(w, h)).collect()
}

/// Sizes a typical phone sensor reports, in device order
fn phone_sizes() -> Vec<Resolution> {
    sizes(&[
        (1920, 1080),
        (1440, 1080),
        (1280, 960),
        (1280, 720),
        (960, 720),
        (800, 480),
        (720, 480),
        (640, 480),
        (352, 288),
        (320, 240),
        (176, 144),
    ])
}

#[test]
fn test_exact_match_scenario() {
    let supported = sizes(&[(640, 480), (1280, 720), (1920, 1080)]);
    assert_eq!(
        select_preview_size(&supported, 1280, 720),
        Some(Resolution::new(1280, 720))
    );
}

#[test]
fn test_unique_ratio_match_is_selected() {
    let supported = phone_sizes();
    // 4:3 target at 1000 high: 1280x960 is the only 4:3 size 40 px away
    assert_eq!(
        select_preview_size(&supported, 1333, 1000),
        Some(Resolution::new(1280, 960))
    );
}

#[test]
fn test_preview_is_always_a_member() {
    let supported = phone_sizes();
    for (w, h) in [(1, 1), (1080, 1920), (1920, 1080), (4000, 3000), (123, 4567)] {
        let chosen = select_preview_size(&supported, w, h).unwrap();
        assert!(supported.contains(&chosen), "{} not offered", chosen);
    }
}

#[test]
fn test_picture_distance_is_minimal() {
    let supported = phone_sizes();
    for (w, h) in [(1080, 1920), (1920, 1080), (600, 600), (5000, 100)] {
        let chosen = select_picture_size(&supported, w, h).unwrap();
        let distance =
            |r: &Resolution| r.width.abs_diff(w) as u64 + r.height.abs_diff(h) as u64;
        let best = supported.iter().map(distance).min().unwrap();
        assert_eq!(distance(&chosen), best, "{}x{} chose {}", w, h, chosen);
    }
}

#[test]
fn test_empty_list() {
    assert_eq!(select_preview_size(&[], 1280, 720), None);
    assert_eq!(select_picture_size(&[], 1280, 720), None);
}
