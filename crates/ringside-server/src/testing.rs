//! Shared fakes for unit tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ringside::{
    AssistantConfigurator, CallEvent, CallRecord, CallStatusSource, Dialer, DomainError,
    EventPublisher, Persona, PhoneNumber, PlacedCall, ProviderCallStatus, ProviderError,
    ProviderStatus,
};

use crate::adapters::broadcast::wire_names;
use crate::adapters::BroadcastPublisher;
use crate::application::DEFAULT_POLL_DELAY;
use crate::auth::ApiKeyAuth;
use crate::{assemble_state, AppState};

pub fn record(id: &str) -> CallRecord {
    CallRecord::new(
        id,
        PhoneNumber::parse("+15551234567").unwrap(),
        Persona::named("Alex"),
        "asst-1",
    )
}

/// Application state around a fake provider, without authentication
pub fn app_state(provider: std::sync::Arc<FakeVoiceProvider>) -> AppState {
    assemble_state(
        provider,
        BroadcastPublisher::new(64),
        DEFAULT_POLL_DELAY,
        None,
        ApiKeyAuth::default(),
    )
}

/// Publisher that keeps every event in memory
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<CallEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<CallEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Wire names the recorded events would be published under
    pub fn wire_names(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .flat_map(|e| wire_names(e).iter().copied())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: CallEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Scripted voice provider
#[derive(Default)]
pub struct FakeVoiceProvider {
    next_call: AtomicUsize,
    fail_create: Mutex<Option<ProviderError>>,
    fail_update: Mutex<Option<ProviderError>>,
    fail_place: Mutex<Option<ProviderError>>,
    fail_number: Mutex<Option<ProviderError>>,
    fail_status: Mutex<Option<ProviderError>>,
    statuses: Mutex<HashMap<String, ProviderCallStatus>>,
    pub prompt_updates: Mutex<Vec<(String, String)>>,
    pub placed: Mutex<Vec<(String, String, String)>>,
    pub status_fetches: AtomicUsize,
    pub number_lookups: AtomicUsize,
    pub assistants_created: AtomicUsize,
}

impl FakeVoiceProvider {
    pub fn failing_create(error: ProviderError) -> Self {
        let provider = Self::default();
        *provider.fail_create.lock().unwrap() = Some(error);
        provider
    }

    pub fn set_status(&self, call_id: &str, status: &str, ended_reason: Option<&str>) {
        self.statuses.lock().unwrap().insert(
            call_id.to_string(),
            ProviderCallStatus {
                status: ProviderStatus::from(status),
                ended_reason: ended_reason.map(str::to_string),
            },
        );
    }

    pub fn fail_update(&self, error: ProviderError) {
        *self.fail_update.lock().unwrap() = Some(error);
    }

    pub fn fail_place(&self, error: ProviderError) {
        *self.fail_place.lock().unwrap() = Some(error);
    }

    pub fn fail_number(&self, error: ProviderError) {
        *self.fail_number.lock().unwrap() = Some(error);
    }

    pub fn created(&self) -> usize {
        self.assistants_created.load(Ordering::SeqCst)
    }

    pub fn fail_status(&self, error: ProviderError) {
        *self.fail_status.lock().unwrap() = Some(error);
    }

    pub fn fetches(&self) -> usize {
        self.status_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssistantConfigurator for FakeVoiceProvider {
    async fn create_assistant(
        &self,
        persona: &Persona,
        _destination: &PhoneNumber,
    ) -> Result<String, DomainError> {
        if let Some(error) = self.fail_create.lock().unwrap().clone() {
            return Err(error.into());
        }
        self.assistants_created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("asst-{}", persona.display_name().to_lowercase()))
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        persona: &Persona,
    ) -> Result<(), DomainError> {
        if let Some(error) = self.fail_update.lock().unwrap().clone() {
            return Err(error.into());
        }
        self.prompt_updates
            .lock()
            .unwrap()
            .push((assistant_id.to_string(), persona.update_prompt()));
        Ok(())
    }
}

#[async_trait]
impl Dialer for FakeVoiceProvider {
    async fn place_call(
        &self,
        assistant_id: &str,
        phone_number_id: &str,
        destination: &PhoneNumber,
    ) -> Result<PlacedCall, DomainError> {
        if let Some(error) = self.fail_place.lock().unwrap().clone() {
            return Err(error.into());
        }
        let n = self.next_call.fetch_add(1, Ordering::SeqCst) + 1;
        self.placed.lock().unwrap().push((
            assistant_id.to_string(),
            phone_number_id.to_string(),
            destination.to_string(),
        ));
        Ok(PlacedCall {
            call_id: format!("call-{n}"),
            listen_url: Some(format!("wss://monitor/call-{n}/listen")),
            control_url: None,
        })
    }

    async fn default_phone_number_id(&self) -> Result<String, DomainError> {
        self.number_lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_number.lock().unwrap().clone() {
            return Err(error.into());
        }
        Ok("pn-default".to_string())
    }
}

#[async_trait]
impl CallStatusSource for FakeVoiceProvider {
    async fn fetch_status(&self, call_id: &str) -> Result<ProviderCallStatus, DomainError> {
        self.status_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_status.lock().unwrap().clone() {
            return Err(error.into());
        }
        self.statuses
            .lock()
            .unwrap()
            .get(call_id)
            .cloned()
            .ok_or_else(|| {
                ProviderError::new(format!("no such call {call_id}"))
                    .with_status(404)
                    .into()
            })
    }
}
