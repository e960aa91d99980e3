//! Shared test fakes for coordinator tests
//!
//! Fakes record everything into shared logs so tests can inspect what the
//! coordinator did after handing ownership away.

#![allow(dead_code)]

use eqbridge_core::{
    EqError, EqualizerEffect, EqualizerFactory, EqualizerSettings, PlaybackEngine, Result,
    SessionEventSender, SessionId,
};
use eqbridge_session::{CoordinatorConfig, EqualizerCoordinator, EqualizerNotification};
use std::sync::{Arc, Mutex};

// ===== Engine =====

#[derive(Default)]
pub struct EngineState {
    pub session: SessionId,
    pub events: Option<SessionEventSender>,
    pub subscriptions: usize,
    pub releases: usize,
}

/// Engine whose session id the test controls
#[derive(Clone, Default)]
pub struct TestEngine(pub Arc<Mutex<EngineState>>);

impl TestEngine {
    pub fn set_session(&self, session: i32) {
        self.0.lock().unwrap().session = SessionId::new(session);
    }

    pub fn events(&self) -> SessionEventSender {
        self.0.lock().unwrap().events.clone().expect("not subscribed")
    }

    pub fn releases(&self) -> usize {
        self.0.lock().unwrap().releases
    }
}

impl PlaybackEngine for TestEngine {
    fn audio_session_id(&self) -> SessionId {
        self.0.lock().unwrap().session
    }

    fn subscribe_session_events(&mut self, events: SessionEventSender) {
        let mut state = self.0.lock().unwrap();
        state.events = Some(events);
        state.subscriptions += 1;
    }

    fn release(&mut self) {
        self.0.lock().unwrap().releases += 1;
    }
}

// ===== Effects =====

/// What happened to the effects handed out by [`TestFactory`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectOp {
    Created { handle: usize, session: SessionId },
    Applied { handle: usize, settings: EqualizerSettings },
    Enabled { handle: usize, enabled: bool },
    Released { handle: usize },
}

#[derive(Default)]
pub struct EffectLog {
    pub ops: Vec<EffectOp>,
    pub live: Vec<usize>,
    pub next_handle: usize,
    pub fail_create: bool,
    pub reject_settings: bool,
}

pub struct TestEffect {
    handle: usize,
    session: SessionId,
    enabled: bool,
    released: bool,
    settings: EqualizerSettings,
    log: Arc<Mutex<EffectLog>>,
}

impl EqualizerEffect for TestEffect {
    fn session_id(&self) -> SessionId {
        self.session
    }

    fn set_properties(&mut self, settings: &EqualizerSettings) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.reject_settings {
            return Err(EqError::invalid_settings("rejected by test"));
        }
        self.settings = settings.clone();
        log.ops.push(EffectOp::Applied {
            handle: self.handle,
            settings: settings.clone(),
        });
        Ok(())
    }

    fn properties(&self) -> EqualizerSettings {
        self.settings.clone()
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        if self.released {
            return Err(EqError::effect_operation("released"));
        }
        self.enabled = enabled;
        self.log.lock().unwrap().ops.push(EffectOp::Enabled {
            handle: self.handle,
            enabled,
        });
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.enabled = false;
        let mut log = self.log.lock().unwrap();
        log.live.retain(|h| *h != self.handle);
        log.ops.push(EffectOp::Released {
            handle: self.handle,
        });
    }
}

#[derive(Clone, Default)]
pub struct TestFactory(pub Arc<Mutex<EffectLog>>);

impl TestFactory {
    pub fn ops(&self) -> Vec<EffectOp> {
        self.0.lock().unwrap().ops.clone()
    }

    pub fn live(&self) -> Vec<usize> {
        self.0.lock().unwrap().live.clone()
    }

    pub fn clear_ops(&self) {
        self.0.lock().unwrap().ops.clear();
    }

    pub fn fail_create(&self, fail: bool) {
        self.0.lock().unwrap().fail_create = fail;
    }

    pub fn reject_settings(&self, reject: bool) {
        self.0.lock().unwrap().reject_settings = reject;
    }
}

impl EqualizerFactory for TestFactory {
    fn create(&mut self, _priority: i32, session: SessionId) -> Result<Box<dyn EqualizerEffect>> {
        let mut log = self.0.lock().unwrap();
        if log.fail_create {
            return Err(EqError::effect_unavailable(session, "exhausted"));
        }

        let handle = log.next_handle;
        log.next_handle += 1;
        log.live.push(handle);
        log.ops.push(EffectOp::Created { handle, session });

        Ok(Box::new(TestEffect {
            handle,
            session,
            enabled: false,
            released: false,
            settings: EqualizerSettings::default(),
            log: Arc::clone(&self.0),
        }))
    }
}

// ===== Harness =====

pub const PACKAGE: &str = "com.example.player";

pub struct Harness {
    pub coordinator: EqualizerCoordinator,
    pub engine: TestEngine,
    pub factory: TestFactory,
    pub notes: Arc<Mutex<Vec<EqualizerNotification>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::for_package(PACKAGE))
    }

    pub fn with_config(config: CoordinatorConfig) -> Self {
        let engine = TestEngine::default();
        let factory = TestFactory::default();
        let notes = Arc::new(Mutex::new(Vec::new()));
        let sink_notes = Arc::clone(&notes);

        let coordinator = EqualizerCoordinator::new(
            engine.clone(),
            factory.clone(),
            move |n: EqualizerNotification| sink_notes.lock().unwrap().push(n),
            config,
        )
        .unwrap();

        Self {
            coordinator,
            engine,
            factory,
            notes,
        }
    }

    /// Engine starts rendering on `session` and reports it
    pub fn start_session(&mut self, session: i32) -> Result<()> {
        self.engine.set_session(session);
        self.coordinator.on_session_created(SessionId::new(session))
    }

    /// Engine stops rendering
    pub fn stop_session(&mut self) {
        self.engine.set_session(0);
        self.coordinator.on_session_destroyed();
    }

    pub fn take_notes(&self) -> Vec<EqualizerNotification> {
        std::mem::take(&mut *self.notes.lock().unwrap())
    }
}

pub fn settings_a() -> EqualizerSettings {
    EqualizerSettings::custom(vec![300, 0, 0, 0, 300])
}

pub fn settings_b() -> EqualizerSettings {
    EqualizerSettings::preset(9, vec![500, 300, -100, 300, 500])
}

pub fn open(session: i32) -> EqualizerNotification {
    EqualizerNotification::OpenAudioEffectControlSession {
        session_id: SessionId::new(session),
        package_id: PACKAGE.to_string(),
    }
}

pub fn close(session: i32) -> EqualizerNotification {
    EqualizerNotification::CloseAudioEffectControlSession {
        session_id: SessionId::new(session),
        package_id: PACKAGE.to_string(),
    }
}

pub fn session_id(session: i32) -> EqualizerNotification {
    EqualizerNotification::AudioSessionId {
        session_id: SessionId::new(session),
    }
}
