//! Software-backed equalizer handles

use crate::effects::{AudioEffect, BandLayout, EqualizerPreset};
use crate::registry::{EffectRegistry, SharedRegistry};
use eqbridge_core::{EqError, EqualizerEffect, EqualizerFactory, EqualizerSettings, Result, SessionId};

/// Control handle for one registry slot
///
/// Dropping the handle releases the slot.
pub struct SoftwareEqualizer {
    id: u64,
    session: SessionId,
    registry: SharedRegistry,
    released: bool,
}

impl SoftwareEqualizer {
    /// Registry id of this effect
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether `release()` has run
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.registry
            .with_equalizer(self.id, |eq| eq.band_count())
            .unwrap_or(0)
    }

    /// Set one band level in millibels
    pub fn set_band_level(&mut self, band: usize, level_mb: i16) -> Result<()> {
        self.live(|eq| eq.set_band_level(band, level_mb))?
    }

    /// Load a preset curve
    pub fn use_preset(&mut self, preset: EqualizerPreset) -> Result<()> {
        self.live(|eq| eq.use_preset(preset))
    }

    fn live<R>(&self, f: impl FnOnce(&mut crate::effects::BandEqualizer) -> R) -> Result<R> {
        if self.released {
            return Err(EqError::effect_operation(format!(
                "equalizer {} already released",
                self.id
            )));
        }
        self.registry
            .with_equalizer(self.id, f)
            .ok_or_else(|| EqError::effect_operation(format!("equalizer {} not found", self.id)))
    }
}

impl EqualizerEffect for SoftwareEqualizer {
    fn session_id(&self) -> SessionId {
        self.session
    }

    fn set_properties(&mut self, settings: &EqualizerSettings) -> Result<()> {
        self.live(|eq| eq.apply_settings(settings))?
    }

    fn properties(&self) -> EqualizerSettings {
        self.registry
            .with_equalizer(self.id, |eq| eq.settings())
            .unwrap_or_default()
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.live(|eq| eq.set_enabled(enabled))
    }

    fn is_enabled(&self) -> bool {
        !self.released
            && self
                .registry
                .with_equalizer(self.id, |eq| eq.is_enabled())
                .unwrap_or(false)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.registry.with_equalizer(self.id, |eq| eq.set_enabled(false));
        self.registry.release(self.id);
        self.released = true;
    }
}

impl Drop for SoftwareEqualizer {
    fn drop(&mut self) {
        self.release();
    }
}

/// Hands out [`SoftwareEqualizer`]s backed by a shared registry
pub struct SoftwareEqualizerFactory {
    registry: SharedRegistry,
    layout: BandLayout,
}

impl SoftwareEqualizerFactory {
    /// Create a factory with its own registry
    pub fn new(layout: BandLayout, max_instances: usize) -> Self {
        Self::with_registry(EffectRegistry::shared(max_instances), layout)
    }

    /// Create a factory over an existing registry
    pub fn with_registry(registry: SharedRegistry, layout: BandLayout) -> Self {
        Self { registry, layout }
    }

    /// Registry used by the audio path
    pub fn registry(&self) -> SharedRegistry {
        SharedRegistry::clone(&self.registry)
    }

    /// Band layout of created equalizers
    pub fn layout(&self) -> BandLayout {
        self.layout
    }
}

impl EqualizerFactory for SoftwareEqualizerFactory {
    fn create(&mut self, priority: i32, session: SessionId) -> Result<Box<dyn EqualizerEffect>> {
        let id = self.registry.acquire(session, priority, self.layout)?;
        Ok(Box::new(SoftwareEqualizer {
            id,
            session,
            registry: self.registry(),
            released: false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_lifecycle() {
        let mut factory = SoftwareEqualizerFactory::new(BandLayout::Five, 2);
        let registry = factory.registry();

        let mut eq = factory.create(0, SessionId::new(11)).unwrap();
        assert_eq!(eq.session_id(), SessionId::new(11));
        assert!(!eq.is_enabled());

        eq.set_properties(&EqualizerSettings::preset(9, vec![500, 300, -100, 300, 500]))
            .unwrap();
        eq.set_enabled(true).unwrap();
        assert!(eq.is_enabled());
        assert_eq!(eq.properties().current_preset, Some(9));
        assert_eq!(registry.session_count(SessionId::new(11)), 1);

        eq.release();
        assert!(!eq.is_enabled());
        assert_eq!(registry.active_count(), 0);

        // Second release is a no-op
        eq.release();
        assert!(eq.set_enabled(true).is_err());
        assert!(eq.set_properties(&EqualizerSettings::default()).is_err());
    }

    #[test]
    fn test_drop_frees_slot() {
        let mut factory = SoftwareEqualizerFactory::new(BandLayout::Ten, 1);
        let registry = factory.registry();

        {
            let _eq = factory.create(0, SessionId::new(3)).unwrap();
            assert!(factory.create(0, SessionId::new(4)).is_err());
        }

        assert_eq!(registry.active_count(), 0);
        assert!(factory.create(0, SessionId::new(4)).is_ok());
    }
}
