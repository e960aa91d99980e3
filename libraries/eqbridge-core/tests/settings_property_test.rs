//! Property-based tests for the settings string format

use eqbridge_core::{EqError, EqualizerSettings};
use proptest::prelude::*;

fn arbitrary_settings() -> impl Strategy<Value = EqualizerSettings> {
    (
        proptest::option::of(0u16..20),
        prop::collection::vec(-1500i16..=1500, 0..32),
    )
        .prop_map(|(current_preset, band_levels)| EqualizerSettings {
            current_preset,
            band_levels,
        })
}

proptest! {
    /// Property: any settings value survives its own text form
    #[test]
    fn text_form_is_lossless(settings in arbitrary_settings()) {
        let text = settings.to_string();
        let parsed: EqualizerSettings = text.parse().unwrap();
        prop_assert_eq!(parsed, settings);
    }

    /// Property: dropping the last band entry is always detected
    #[test]
    fn truncated_strings_are_rejected(settings in arbitrary_settings()) {
        prop_assume!(settings.band_count() > 0);
        let text = settings.to_string();
        let truncated = &text[..text.rfind(';').unwrap()];
        let result = truncated.parse::<EqualizerSettings>();
        prop_assert!(matches!(result, Err(EqError::InvalidSettings(_))));
    }
}
