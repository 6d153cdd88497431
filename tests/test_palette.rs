//! Palette assignment tests.

use property_explorer::config::NEUTRAL_COLOR;
use property_explorer::palette::{hue_degrees, hue_distance, min_hue_separation};
use property_explorer::{HueSeed, Palette};

fn labels(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Series {}", i)).collect()
}

#[test]
fn first_label_takes_the_seed_hue() {
    let assignment = Palette::assign(&["Subiaco"], HueSeed::new(0.5));
    let color = assignment.get("Subiaco").unwrap();
    assert!((color.hue - 180.0).abs() < 1e-9);
    assert_eq!(color.saturation, 70);
    assert_eq!(color.lightness, 50);
    assert_eq!(assignment.color_for("Subiaco"), "hsl(180.0, 70%, 50%)");
}

#[test]
fn hues_follow_golden_ratio_steps() {
    let seed = HueSeed::new(0.0);
    assert!((hue_degrees(seed, 1) - 222.492_235_9).abs() < 1e-6);
    assert!((hue_degrees(seed, 2) - 84.984_471_8).abs() < 1e-6);
}

#[test]
fn seeds_wrap_into_unit_interval() {
    assert_eq!(HueSeed::new(1.25).fraction(), HueSeed::new(0.25).fraction());
    assert!((HueSeed::new(-0.25).fraction() - 0.75).abs() < 1e-12);
    assert_eq!(HueSeed::new(f64::NAN).fraction(), 0.0);
    let random = HueSeed::random().fraction();
    assert!((0.0..1.0).contains(&random));
}

#[test]
fn distinct_labels_stay_apart_for_every_seed() {
    for n in 2..=20 {
        let bound = min_hue_separation(n);
        for seed in [0.0, 0.13, 0.5, 0.77, 0.999] {
            let assignment = Palette::assign(&labels(n), HueSeed::new(seed));
            let hues: Vec<f64> = assignment
                .labels()
                .iter()
                .map(|l| assignment.get(l).unwrap().hue)
                .collect();
            for i in 0..hues.len() {
                for j in (i + 1)..hues.len() {
                    assert!(hue_distance(hues[i], hues[j]) + 1e-9 >= bound);
                }
            }
        }
    }
}

#[test]
fn separation_bound_is_usable_for_twenty_series() {
    assert!(min_hue_separation(20) > 12.0);
    assert!(min_hue_separation(2) > 137.0);
    assert_eq!(min_hue_separation(1), 360.0);
}

#[test]
fn repeated_labels_share_one_color() {
    let assignment = Palette::assign(&["Subiaco", "Cottesloe", "Subiaco"], HueSeed::new(0.1));
    assert_eq!(assignment.len(), 2);
    assert_eq!(assignment.labels(), &["Subiaco", "Cottesloe"]);
}

#[test]
fn unknown_label_gets_neutral_color() {
    let assignment = Palette::assign(&["Subiaco"], HueSeed::new(0.1));
    assert_eq!(assignment.color_for("Nowhere"), NEUTRAL_COLOR);
    assert!(assignment.get("Nowhere").is_none());

    let empty = Palette::assign::<&str>(&[], HueSeed::new(0.1));
    assert!(empty.is_empty());
    assert_eq!(empty.color_for("Subiaco"), NEUTRAL_COLOR);
}

#[test]
fn hue_distance_takes_the_short_way_round() {
    assert!((hue_distance(350.0, 10.0) - 20.0).abs() < 1e-9);
    assert!((hue_distance(10.0, 350.0) - 20.0).abs() < 1e-9);
    assert!((hue_distance(0.0, 180.0) - 180.0).abs() < 1e-9);
}

#[test]
fn tiny_negative_seed_stays_below_one_turn() {
    let seed = HueSeed::new(-1e-20);
    assert!((0.0..1.0).contains(&seed.fraction()));
    for index in 0..20 {
        let hue = hue_degrees(seed, index);
        assert!((0.0..360.0).contains(&hue), "hue {hue} at index {index}");
    }
    let assignment = Palette::assign(&["Subiaco"], seed);
    assert_eq!(assignment.color_for("Subiaco"), "hsl(0.0, 70%, 50%)");
}
