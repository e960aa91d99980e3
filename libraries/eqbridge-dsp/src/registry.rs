//! Per-session effect registry
//!
//! Control handles ([`crate::SoftwareEqualizer`]) and the audio path share one
//! registry. Handles mutate their slot; the audio callback runs every enabled
//! equalizer attached to the session it is rendering.

use crate::effects::{AudioEffect, BandEqualizer, BandLayout};
use eqbridge_core::{EqError, Result, SessionId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Registry shared between control handles and the audio thread
pub type SharedRegistry = Arc<EffectRegistry>;

struct Slot {
    session: SessionId,
    priority: i32,
    equalizer: BandEqualizer,
}

struct RegistryState {
    next_id: u64,
    slots: BTreeMap<u64, Slot>,
    /// Effect ids in processing order: descending priority, then allocation order
    order: Vec<u64>,
}

/// Live equalizers keyed by effect id
pub struct EffectRegistry {
    max_instances: usize,
    state: Mutex<RegistryState>,
}

impl EffectRegistry {
    /// Create a registry that holds at most `max_instances` live effects
    pub fn new(max_instances: usize) -> Self {
        Self {
            max_instances,
            state: Mutex::new(RegistryState {
                next_id: 1,
                slots: BTreeMap::new(),
                order: Vec::with_capacity(max_instances),
            }),
        }
    }

    /// Create a shared registry
    pub fn shared(max_instances: usize) -> SharedRegistry {
        Arc::new(Self::new(max_instances))
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate a flat, disabled equalizer for `session`
    ///
    /// # Errors
    /// Returns `EffectUnavailable` for the sentinel session or when the
    /// registry is full.
    pub fn acquire(&self, session: SessionId, priority: i32, layout: BandLayout) -> Result<u64> {
        if session.is_none() {
            return Err(EqError::effect_unavailable(session, "no audio session"));
        }

        let mut state = self.lock();
        if state.slots.len() >= self.max_instances {
            return Err(EqError::effect_unavailable(
                session,
                format!("all {} equalizer instances in use", self.max_instances),
            ));
        }

        let RegistryState {
            next_id,
            slots,
            order,
        } = &mut *state;

        let id = *next_id;
        *next_id += 1;

        // Ids only grow, so equal priorities stay in allocation order
        let position = order.partition_point(|other| {
            slots
                .get(other)
                .is_some_and(|slot| slot.priority >= priority)
        });
        order.insert(position, id);
        slots.insert(
            id,
            Slot {
                session,
                priority,
                equalizer: BandEqualizer::new(layout),
            },
        );

        tracing::debug!("Allocated equalizer {} for session {}", id, session);
        Ok(id)
    }

    /// Free an effect; returns false if it was already gone
    pub fn release(&self, id: u64) -> bool {
        let mut state = self.lock();
        let removed = state.slots.remove(&id).is_some();
        state.order.retain(|&other| other != id);
        drop(state);
        if removed {
            tracing::debug!("Freed equalizer {}", id);
        }
        removed
    }

    /// Run `f` against a live effect
    pub fn with_equalizer<R>(&self, id: u64, f: impl FnOnce(&mut BandEqualizer) -> R) -> Option<R> {
        self.lock().slots.get_mut(&id).map(|slot| f(&mut slot.equalizer))
    }

    /// Session an effect is attached to
    pub fn session_of(&self, id: u64) -> Option<SessionId> {
        self.lock().slots.get(&id).map(|slot| slot.session)
    }

    /// Number of live effects
    pub fn active_count(&self) -> usize {
        self.lock().slots.len()
    }

    /// Number of live effects attached to `session`
    pub fn session_count(&self, session: SessionId) -> usize {
        self.lock()
            .slots
            .values()
            .filter(|slot| slot.session == session)
            .count()
    }

    /// Apply every enabled equalizer of `session` to an interleaved stereo buffer
    ///
    /// Effects run in descending priority, then allocation order. The order
    /// is kept up to date by `acquire`/`release`; this path does not allocate.
    pub fn process(&self, session: SessionId, buffer: &mut [f32], sample_rate: u32) {
        let mut state = self.lock();
        let RegistryState { slots, order, .. } = &mut *state;

        for id in &*order {
            if let Some(slot) = slots.get_mut(id) {
                if slot.session == session && slot.equalizer.is_enabled() {
                    slot.equalizer.process(buffer, sample_rate);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EqualizerPreset;

    #[test]
    fn test_capacity_is_enforced() {
        let registry = EffectRegistry::new(2);
        let a = registry.acquire(SessionId::new(1), 0, BandLayout::Five).unwrap();
        registry.acquire(SessionId::new(2), 0, BandLayout::Five).unwrap();

        let err = registry
            .acquire(SessionId::new(3), 0, BandLayout::Five)
            .unwrap_err();
        assert!(matches!(err, EqError::EffectUnavailable { .. }));

        assert!(registry.release(a));
        assert!(registry.acquire(SessionId::new(3), 0, BandLayout::Five).is_ok());
    }

    #[test]
    fn test_sentinel_session_rejected() {
        let registry = EffectRegistry::new(4);
        assert!(registry.acquire(SessionId::NONE, 0, BandLayout::Five).is_err());
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let registry = EffectRegistry::new(4);
        let id = registry.acquire(SessionId::new(5), 0, BandLayout::Five).unwrap();

        assert!(registry.release(id));
        assert!(!registry.release(id));
        assert_eq!(registry.session_of(id), None);
    }

    #[test]
    fn test_processing_order_follows_priority() {
        let registry = EffectRegistry::new(8);
        let session = SessionId::new(4);

        let low = registry.acquire(session, -1, BandLayout::Five).unwrap();
        let high = registry.acquire(session, 5, BandLayout::Five).unwrap();
        let mid_a = registry.acquire(session, 0, BandLayout::Five).unwrap();
        let mid_b = registry.acquire(session, 0, BandLayout::Five).unwrap();
        assert_eq!(registry.lock().order, vec![high, mid_a, mid_b, low]);

        registry.release(mid_a);
        let top = registry.acquire(session, 9, BandLayout::Five).unwrap();
        let mid_c = registry.acquire(session, 0, BandLayout::Five).unwrap();
        assert_eq!(registry.lock().order, vec![top, high, mid_b, mid_c, low]);

        for id in [top, high, mid_b, mid_c, low] {
            registry.release(id);
        }
        assert!(registry.lock().order.is_empty());
    }

    #[test]
    fn test_processing_order_capacity_is_preallocated() {
        let registry = EffectRegistry::new(3);
        let capacity = registry.lock().order.capacity();

        for session in 1..=3 {
            registry.acquire(SessionId::new(session), session, BandLayout::Five).unwrap();
        }
        assert_eq!(registry.lock().order.capacity(), capacity);
    }

    #[test]
    fn test_process_only_touches_matching_session() {
        let registry = EffectRegistry::new(4);
        let id = registry.acquire(SessionId::new(5), 0, BandLayout::Five).unwrap();
        registry.with_equalizer(id, |eq| {
            eq.use_preset(EqualizerPreset::HeavyMetal);
            eq.set_enabled(true);
        });

        let mut other = crate::effects::tests::generate_sine(910.0, 44100, 0.05);
        let original = other.clone();
        registry.process(SessionId::new(6), &mut other, 44100);
        assert_eq!(other, original);

        let mut ours = original.clone();
        registry.process(SessionId::new(5), &mut ours, 44100);
        assert_ne!(ours, original);
    }
}
