//! Call Orchestrator (Use Case)
//!
//! Public entry point for placing calls. Assistant construction and
//! dialling are delegated to the provider; nothing is stored until both
//! succeed.

use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

use ringside::{
    AssistantConfigurator, CallRecord, CallRepository, DomainError, Dialer, Persona, PhoneNumber,
    ProviderStatus, Reconciliation,
};

use super::{CallSessionService, FallbackPoller};

/// Result of an out-of-band status check
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub record: CallRecord,
    pub provider_status: ProviderStatus,
    pub reconciliation: Reconciliation,
}

/// Application service for the call lifecycle
pub struct CallOrchestrator<R: CallRepository> {
    sessions: Arc<CallSessionService<R>>,
    poller: FallbackPoller<R>,
    assistants: Arc<dyn AssistantConfigurator>,
    dialer: Arc<dyn Dialer>,
    phone_number_id: OnceCell<String>,
    /// Held across the provider patch and the local write so the stored
    /// persona always matches the prompt the assistant last received
    persona_lock: Mutex<()>,
}

impl<R: CallRepository + 'static> CallOrchestrator<R> {
    pub fn new(
        sessions: Arc<CallSessionService<R>>,
        poller: FallbackPoller<R>,
        assistants: Arc<dyn AssistantConfigurator>,
        dialer: Arc<dyn Dialer>,
    ) -> Self {
        Self {
            sessions,
            poller,
            assistants,
            dialer,
            phone_number_id: OnceCell::new(),
            persona_lock: Mutex::new(()),
        }
    }

    /// Dial from a fixed provider number instead of discovering one
    pub fn with_phone_number_id(self, phone_number_id: Option<String>) -> Self {
        Self {
            phone_number_id: OnceCell::new_with(phone_number_id),
            ..self
        }
    }

    pub fn sessions(&self) -> &Arc<CallSessionService<R>> {
        &self.sessions
    }

    async fn resolve_phone_number_id(&self) -> Result<&str, DomainError> {
        let id = self
            .phone_number_id
            .get_or_try_init(|| self.dialer.default_phone_number_id())
            .await?;
        Ok(id.as_str())
    }

    /// Create the assistant, place the call, register it and schedule the
    /// fallback poll. Provider failures surface unchanged and leave no
    /// record behind.
    pub async fn initiate_call(
        &self,
        phone_number: &str,
        persona: Persona,
    ) -> Result<CallRecord, DomainError> {
        let destination = PhoneNumber::parse(phone_number)?;
        // Before the assistant exists, so a missing number orphans nothing
        let phone_number_id = self.resolve_phone_number_id().await?;

        let assistant_id = self
            .assistants
            .create_assistant(&persona, &destination)
            .await?;
        let placed = self
            .dialer
            .place_call(&assistant_id, phone_number_id, &destination)
            .await?;

        let record = CallRecord::new(placed.call_id, destination, persona, assistant_id)
            .with_monitor(placed.listen_url, placed.control_url);

        self.sessions.register(record.clone()).await?;
        self.poller.schedule(record.id.clone());

        Ok(record)
    }

    /// Push a new persona to the provider, then store and announce it.
    /// A rejected patch leaves the stored persona untouched.
    pub async fn update_persona(
        &self,
        call_id: &str,
        persona: Persona,
    ) -> Result<CallRecord, DomainError> {
        let _guard = self.persona_lock.lock().await;
        let current = self.sessions.get(call_id).await?;

        self.assistants
            .update_assistant(&current.assistant_id, &persona)
            .await?;

        self.sessions.replace_persona(call_id, persona).await
    }

    /// Ask the provider for the call's status right now
    pub async fn refresh(&self, call_id: &str) -> Result<RefreshOutcome, DomainError> {
        // 404 before touching the provider
        self.sessions.get(call_id).await?;

        let (reported, reconciliation) = self.poller.poll_now(call_id).await?;
        let record = self.sessions.get(call_id).await?;

        Ok(RefreshOutcome {
            record,
            provider_status: reported.status,
            reconciliation,
        })
    }

    pub async fn get(&self, call_id: &str) -> Result<CallRecord, DomainError> {
        self.sessions.get(call_id).await
    }

    pub async fn list(&self) -> Result<Vec<CallRecord>, DomainError> {
        self.sessions.list().await
    }
}
