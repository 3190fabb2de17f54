//! Property tests for the ANSI/width utilities and colorizers.

use proptest::prelude::*;
use ptree_core::options::{ColorMode, DisplayOptions};
use ptree_core::render::color::rainbow_paint;
use ptree_core::render::{strip_ansi, truncate_ansi, truncate_plain, visible_width};
use ptree_core::render::{Colorizer, Palette, Role};

fn field_colorizer() -> Colorizer {
    let opts = DisplayOptions {
        color_mode: ColorMode::Field,
        is_tty: true,
        ..Default::default()
    };
    Colorizer::new(&opts, Palette::detect(8))
}

proptest! {
    // Escape-free printable input; the colorizers are the only source
    // of escape bytes in these properties.
    #[test]
    fn prop_truncate_ansi_respects_width(s in "[ -~]{0,200}", max in 0usize..120) {
        let cut = truncate_ansi(&s, max);
        prop_assert!(visible_width(&cut) <= max.max(3));
    }

    #[test]
    fn prop_truncate_ansi_idempotent(s in "[ -~]{0,200}", max in 0usize..120) {
        let once = truncate_ansi(&s, max);
        prop_assert_eq!(truncate_ansi(&once, max), once);
    }

    #[test]
    fn prop_truncate_plain_respects_width(s in "[ -~]{0,200}", max in 0usize..120) {
        prop_assert!(visible_width(&truncate_plain(&s, max)) <= max.max(3));
    }

    #[test]
    fn prop_truncate_short_strings_unchanged(s in "[ -~]{0,40}") {
        prop_assert_eq!(truncate_ansi(&s, 200), s.clone());
        prop_assert_eq!(truncate_plain(&s, 200), s);
    }

    #[test]
    fn prop_strip_after_paint_round_trips(s in "[ -~]{0,80}") {
        let c = field_colorizer();
        for role in [Role::Owner, Role::Command, Role::Cpu, Role::Age, Role::Args] {
            prop_assert_eq!(strip_ansi(&c.paint(role, &s)), s.clone());
        }
    }

    #[test]
    fn prop_rainbow_preserves_text(s in "[ -~]{0,80}") {
        prop_assert_eq!(strip_ansi(&rainbow_paint(&s)), s.clone());
    }

    #[test]
    fn prop_painted_truncation_still_bounded(s in "[ -~]{0,200}", max in 4usize..100) {
        let c = field_colorizer();
        let painted = c.paint(Role::Command, &s);
        let cut = truncate_ansi(&painted, max);
        prop_assert!(visible_width(&cut) <= max);
    }

    #[test]
    fn prop_strip_is_idempotent(s in "[ -~]{0,80}") {
        let painted = field_colorizer().paint(Role::Owner, &s);
        let stripped = strip_ansi(&painted);
        prop_assert_eq!(strip_ansi(&stripped), stripped);
    }
}
