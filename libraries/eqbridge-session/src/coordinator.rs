//! Equalizer session coordinator - core state machine
//!
//! Decides, on every audio session change, whether the in-process ("custom")
//! equalizer or the platform's system equalizer is attached, and migrates
//! between the two when the host changes configuration.
//!
//! # Threading
//!
//! All methods run on the engine's callback thread. Session events arrive
//! serially through the event queue; hosts on other threads go through a
//! [`ConfigHandle`], which queues configuration changes for the same thread.
//!
//! The queue itself is unbounded so engine lifecycle events are never
//! dropped. Only host configuration changes are capped, at
//! `event_queue_capacity` pending between drains.

use crate::{
    config::{CoordinatorConfig, SystemEqualizerPolicy},
    notify::{EqualizerNotification, NotificationSink},
};
use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use eqbridge_core::{
    BindingMode, CoordinatorEvent, EqError, EqualizerConfig, EqualizerEffect, EqualizerFactory,
    EqualizerSettings, PlaybackEngine, Result, SessionEvent, SessionEventSender, SessionId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Equalizer currently attached to a session
///
/// Holding at most one of these is what keeps the two modes exclusive.
enum Binding {
    Custom(Box<dyn EqualizerEffect>),
    System(SessionId),
}

impl Binding {
    fn mode(&self) -> BindingMode {
        match self {
            Self::Custom(_) => BindingMode::Custom,
            Self::System(_) => BindingMode::System,
        }
    }
}

/// Host-side handle for changing equalizer configuration
///
/// Queues the change for the coordinator's thread; it takes effect on the
/// next [`EqualizerCoordinator::process_pending_events`].
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    tx: Sender<CoordinatorEvent>,
    pending: Arc<AtomicUsize>,
    capacity: usize,
}

impl ConfigHandle {
    /// Request a configuration change
    ///
    /// # Errors
    /// Fails with `EventQueue` when `event_queue_capacity` changes are already
    /// pending or the coordinator is gone. Session events are unaffected.
    pub fn set_equalizer_settings(
        &self,
        enabled: bool,
        settings: Option<EqualizerSettings>,
    ) -> Result<()> {
        self.pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.capacity).then_some(n + 1)
            })
            .map_err(|_| EqError::event_queue("too many configuration changes pending"))?;

        let event = CoordinatorEvent::ConfigChanged(EqualizerConfig::new(enabled, settings));
        self.tx.try_send(event).map_err(|e| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            match e {
                TrySendError::Full(_) => EqError::event_queue("coordinator event queue full"),
                TrySendError::Disconnected(_) => EqError::event_queue("coordinator dropped"),
            }
        })
    }
}

/// Binds equalizers to the audio sessions of one playback engine
pub struct EqualizerCoordinator {
    engine: Option<Box<dyn PlaybackEngine>>,
    factory: Box<dyn EqualizerFactory>,
    sink: Box<dyn NotificationSink>,
    settings: CoordinatorConfig,

    config: EqualizerConfig,
    /// Whether the host has supplied a configuration yet
    configured: bool,

    binding: Option<Binding>,
    last_session: SessionId,

    events_tx: Sender<CoordinatorEvent>,
    events_rx: Receiver<CoordinatorEvent>,
    /// Host configuration changes sitting in the queue
    pending_config: Arc<AtomicUsize>,
}

impl EqualizerCoordinator {
    /// Create a coordinator and register it with the engine
    ///
    /// The engine's session listener is installed here, once.
    pub fn new(
        engine: impl PlaybackEngine + 'static,
        factory: impl EqualizerFactory + 'static,
        sink: impl NotificationSink + 'static,
        settings: CoordinatorConfig,
    ) -> Result<Self> {
        settings.validate()?;

        let (events_tx, events_rx) = unbounded();

        let mut engine: Box<dyn PlaybackEngine> = Box::new(engine);
        engine.subscribe_session_events(SessionEventSender::new(events_tx.clone()));

        tracing::debug!(
            "Equalizer coordinator ready for {} ({:?})",
            settings.package_id,
            settings.system_equalizer
        );

        Ok(Self {
            engine: Some(engine),
            factory: Box::new(factory),
            sink: Box::new(sink),
            settings,
            config: EqualizerConfig::default(),
            configured: false,
            binding: None,
            last_session: SessionId::NONE,
            events_tx,
            events_rx,
            pending_config: Arc::new(AtomicUsize::new(0)),
        })
    }

    // ===== Session lifecycle =====

    /// Audio rendering started on `session`
    ///
    /// Notifies the host, then binds an equalizer according to the current
    /// configuration. The sentinel session is ignored.
    pub fn on_session_created(&mut self, session: SessionId) -> Result<()> {
        if session.is_none() {
            tracing::debug!("Ignoring session event without an audio session");
            return Ok(());
        }

        if self.engine.is_none() {
            tracing::debug!("Engine released, ignoring session {}", session);
            return Ok(());
        }

        self.sink
            .notify(EqualizerNotification::AudioSessionId { session_id: session });

        // Engines may start a new session without disabling the previous one
        if self.binding.is_some() {
            tracing::debug!(
                "Session {} replaces {} without audio disable, unbinding first",
                session,
                self.last_session
            );
            self.unbind();
        }

        self.last_session = session;

        match self.resolved_mode() {
            BindingMode::System => {
                self.bind_system(session);
                Ok(())
            }
            BindingMode::Custom => self.bind_custom(session),
        }
    }

    /// Audio rendering stopped
    ///
    /// Unbinds whatever was attached to the last session. Repeated calls are
    /// no-ops.
    pub fn on_session_destroyed(&mut self) {
        if self.last_session.is_none() {
            tracing::debug!("Audio disabled before any session was created");
            return;
        }

        if self.binding.is_none() {
            tracing::debug!("Session {} has no equalizer bound", self.last_session);
            return;
        }

        self.unbind();
    }

    // ===== Configuration =====

    /// Replace the equalizer configuration
    ///
    /// A change is re-evaluated against the active session when the enabled
    /// flag flips or when the equalizer was already enabled. Otherwise, or
    /// when no session is active, the configuration is stored and applies
    /// from the next session on.
    pub fn set_config(&mut self, enabled: bool, settings: Option<EqualizerSettings>) -> Result<()> {
        let invalidate = self.config.enabled != enabled || self.config.enabled;
        let was_system = self.current_mode() == BindingMode::System;

        self.config = EqualizerConfig::new(enabled, settings);
        self.configured = true;

        if !invalidate {
            tracing::debug!("Equalizer configuration stored for the next session");
            return Ok(());
        }

        self.update_binding(enabled, was_system)
    }

    /// Handle used by other threads to queue configuration changes
    pub fn config_handle(&self) -> ConfigHandle {
        ConfigHandle {
            tx: self.events_tx.clone(),
            pending: Arc::clone(&self.pending_config),
            capacity: self.settings.event_queue_capacity,
        }
    }

    // ===== Equalizer access =====

    /// Live in-process equalizer, binding one if needed
    ///
    /// Forces a custom binding on the engine's current session regardless of
    /// the configured mode, without changing the configuration. Returns
    /// `Ok(None)` when the engine has no active session.
    pub fn equalizer(&mut self) -> Result<Option<&mut dyn EqualizerEffect>> {
        if self.engine.is_none() {
            return Err(EqError::EngineReleased);
        }

        if !matches!(self.binding, Some(Binding::Custom(_))) {
            tracing::info!("Initializing equalizer...");
            self.update_binding(true, true)?;
        }

        Ok(match &mut self.binding {
            Some(Binding::Custom(handle)) => Some(handle.as_mut()),
            _ => None,
        })
    }

    /// Release the in-process equalizer, if any
    ///
    /// A system binding is left untouched. Safe to call repeatedly.
    pub fn destroy_equalizer(&mut self) {
        match self.binding.take() {
            Some(Binding::Custom(handle)) => Self::release_handle(handle),
            other => self.binding = other,
        }
    }

    /// Tear down: release the in-process equalizer and the engine
    ///
    /// Idempotent.
    pub fn release(&mut self) {
        self.destroy_equalizer();

        if let Some(mut engine) = self.engine.take() {
            engine.release();
            tracing::info!("Released playback engine");
        }
    }

    // ===== Event queue =====

    /// Dispatch one queued event
    pub fn handle_event(&mut self, event: CoordinatorEvent) -> Result<()> {
        match event {
            CoordinatorEvent::Session(SessionEvent::SessionIdChanged(session)) => {
                self.on_session_created(session)
            }
            CoordinatorEvent::Session(SessionEvent::AudioDisabled) => {
                self.on_session_destroyed();
                Ok(())
            }
            CoordinatorEvent::ConfigChanged(config) => {
                self.set_config(config.enabled, config.settings)
            }
        }
    }

    /// Drain queued events in order
    ///
    /// Stops at the first failing event and returns its error; later events
    /// stay queued. Returns the number of events handled.
    pub fn process_pending_events(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if matches!(event, CoordinatorEvent::ConfigChanged(_)) {
                let _ = self
                    .pending_config
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
            }
            self.handle_event(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    // ===== Introspection =====

    /// Mode of the active binding, if any
    pub fn binding_mode(&self) -> Option<BindingMode> {
        self.binding.as_ref().map(Binding::mode)
    }

    /// Mode the next session will bind with
    pub fn resolved_mode(&self) -> BindingMode {
        if self.is_using_system_equalizer() {
            BindingMode::System
        } else {
            BindingMode::Custom
        }
    }

    /// Session of an open system equalizer binding
    pub fn system_session(&self) -> Option<SessionId> {
        match self.binding {
            Some(Binding::System(session)) => Some(session),
            _ => None,
        }
    }

    /// Whether an in-process equalizer is bound
    pub fn has_equalizer(&self) -> bool {
        matches!(self.binding, Some(Binding::Custom(_)))
    }

    /// Most recent session reported by the engine
    pub fn last_session_id(&self) -> SessionId {
        self.last_session
    }

    /// Current host configuration
    pub fn config(&self) -> &EqualizerConfig {
        &self.config
    }

    /// Coordinator settings
    pub fn settings(&self) -> &CoordinatorConfig {
        &self.settings
    }

    /// Whether `release()` has run
    pub fn is_released(&self) -> bool {
        self.engine.is_none()
    }

    // ===== Binding internals =====

    fn is_using_system_equalizer(&self) -> bool {
        match self.settings.system_equalizer {
            SystemEqualizerPolicy::PowerOnDefault => !self.configured,
            SystemEqualizerPolicy::WhenDisabled => {
                self.config.settings.is_none() || !self.config.enabled
            }
        }
    }

    fn current_mode(&self) -> BindingMode {
        self.binding_mode().unwrap_or_else(|| self.resolved_mode())
    }

    fn engine_session(&self) -> SessionId {
        self.engine
            .as_ref()
            .map_or(SessionId::NONE, |engine| engine.audio_session_id())
    }

    fn update_binding(&mut self, use_custom: bool, was_system: bool) -> Result<()> {
        let session = self.engine_session();
        tracing::info!("Updating equalizer binding, audio session {}", session);

        if session.is_none() {
            // Nothing is bound; the next session picks up the configuration
            return Ok(());
        }

        if use_custom {
            if !was_system {
                if let Some(Binding::Custom(handle)) = &mut self.binding {
                    // Custom -> custom
                    if let Some(settings) = &self.config.settings {
                        handle.set_properties(settings)?;
                    }
                    tracing::debug!("Applied equalizer settings in place");
                    return Ok(());
                }
            }

            // System -> custom
            self.unbind();
            self.bind_custom(session)
        } else {
            // Custom -> system; nothing to do for system -> system
            if !was_system {
                self.unbind();
                self.bind_system(session);
            }
            Ok(())
        }
    }

    fn bind_custom(&mut self, session: SessionId) -> Result<()> {
        let mut handle = self.factory.create(self.settings.effect_priority, session)?;

        let prepared = match &self.config.settings {
            Some(settings) => handle.set_properties(settings),
            None => Ok(()),
        }
        .and_then(|()| handle.set_enabled(true));

        if let Err(e) = prepared {
            handle.release();
            return Err(e);
        }

        tracing::info!("Bound in-process equalizer to session {}", session);
        self.binding = Some(Binding::Custom(handle));
        Ok(())
    }

    fn bind_system(&mut self, session: SessionId) {
        self.sink
            .notify(EqualizerNotification::OpenAudioEffectControlSession {
                session_id: session,
                package_id: self.settings.package_id.clone(),
            });
        tracing::info!("Opened system equalizer session {}", session);
        self.binding = Some(Binding::System(session));
    }

    fn unbind(&mut self) {
        match self.binding.take() {
            Some(Binding::Custom(handle)) => Self::release_handle(handle),
            Some(Binding::System(session)) => {
                self.sink
                    .notify(EqualizerNotification::CloseAudioEffectControlSession {
                        session_id: session,
                        package_id: self.settings.package_id.clone(),
                    });
                tracing::info!("Closed system equalizer session {}", session);
            }
            None => {}
        }
    }

    fn release_handle(mut handle: Box<dyn EqualizerEffect>) {
        tracing::info!("Destroying equalizer for session {}", handle.session_id());
        if let Err(e) = handle.set_enabled(false) {
            tracing::debug!("Disabling equalizer before release failed: {}", e);
        }
        handle.release();
    }
}

impl Drop for EqualizerCoordinator {
    fn drop(&mut self) {
        self.destroy_equalizer();
    }
}
