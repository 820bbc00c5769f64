//! Submission pipeline for the ticket form.
//!
//! A [`Submission`] is the command object (validate, build, send); a
//! [`SubmissionController`] owns the transports and configuration and drives
//! one submission against a [`Page`], recording every state it passes
//! through.

use crate::page::Page;
use crate::response::extract_payment_link;
use crate::transport::{Beacon, Transport, TransportResponse};
use chrono::{DateTime, Utc};
use ingresso_core::rules::{
    rejection_message, validate_form, DeliveryPolicy, RedirectPolicy, SuccessCriterion,
};
use ingresso_core::{CoreError, FormField, FormInput, NormalizedPayload, TicketCatalog, ValidatedForm};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use url::Url;

pub const BUSY_LABEL: &str = "Aguarde...";

const GONE_STATUS: u16 = 410;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    Rejected,
    Building,
    Sending,
    Delivered,
    FallbackSending,
    Redirecting,
    Halted,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub endpoint: Url,
    pub policy: DeliveryPolicy,
    pub thank_you: String,
    pub open_payment_link: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryFailure {
    Timeout { timeout_ms: u64 },
    Transport { message: String },
    Rejected { status: u16 },
    MissingPaymentLink,
    Encode { message: String },
}

impl DeliveryFailure {
    /// Whether the request may never have reached the remote side, which is
    /// when the fallback beacon is worth sending.
    pub fn is_transport_level(&self) -> bool {
        matches!(
            self,
            DeliveryFailure::Timeout { .. } | DeliveryFailure::Transport { .. }
        )
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            DeliveryFailure::Timeout { .. } => {
                "Tempo esgotado ao conectar com o servidor. Tente novamente."
            }
            DeliveryFailure::Transport { .. } | DeliveryFailure::Encode { .. } => {
                "Erro ao conectar com o servidor. Tente novamente."
            }
            DeliveryFailure::Rejected { status } if *status == GONE_STATUS => {
                "Erro: webhook inválido/expirado (410). Gere um novo webhook e atualize a configuração."
            }
            DeliveryFailure::Rejected { .. } => "Erro na criação do pagamento. Tente novamente.",
            DeliveryFailure::MissingPaymentLink => {
                "Erro ao gerar link de pagamento. Entre em contato com o suporte"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// A field check failed; nothing was sent.
    Rejected {
        field: Option<FormField>,
        message: String,
    },
    Delivered {
        payment_link: Option<String>,
    },
    /// Delivery failed but the buyer was redirected anyway.
    Degraded {
        failure: DeliveryFailure,
        fallback_queued: bool,
    },
    /// Delivery failed and the page stayed put.
    Halted {
        failure: DeliveryFailure,
        fallback_queued: bool,
    },
}

impl SubmissionOutcome {
    pub fn redirects(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::Delivered { .. } | SubmissionOutcome::Degraded { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub outcome: SubmissionOutcome,
    pub states: Vec<SubmissionState>,
    pub payload: Option<NormalizedPayload>,
    pub payment_link_opened: Option<String>,
    pub redirected_to: Option<String>,
}

struct Trace {
    states: Vec<SubmissionState>,
}

impl Trace {
    fn new() -> Self {
        Self {
            states: vec![SubmissionState::Idle],
        }
    }

    fn enter(&mut self, state: SubmissionState) {
        debug!(?state, "submission state");
        self.states.push(state);
    }
}

/// Successful primary delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub status: u16,
    pub payment_link: Option<String>,
}

/// One submit attempt's commands, bound to the settings and ticket table in
/// force when it was created.
pub struct Submission<'a> {
    settings: &'a PipelineSettings,
    catalog: &'a TicketCatalog,
}

impl<'a> Submission<'a> {
    pub fn new(settings: &'a PipelineSettings, catalog: &'a TicketCatalog) -> Self {
        Self { settings, catalog }
    }

    pub fn validate(&self, input: &FormInput) -> Result<ValidatedForm, CoreError> {
        validate_form(input)
    }

    pub fn build(&self, form: ValidatedForm, now: DateTime<Utc>) -> NormalizedPayload {
        NormalizedPayload::build(form, self.catalog, now)
    }

    /// POSTs `body` and judges the reply. The whole exchange, body read
    /// included, is cancelled once the policy timeout elapses.
    pub async fn send<T: Transport>(
        &self,
        transport: &T,
        payload: &NormalizedPayload,
        body: Vec<u8>,
    ) -> Result<Delivered, DeliveryFailure> {
        let policy = &self.settings.policy;
        let attempt = transport.post_json(&self.settings.endpoint, body);
        match tokio::time::timeout(policy.timeout, attempt).await {
            Err(_) => Err(DeliveryFailure::Timeout {
                timeout_ms: policy.timeout.as_millis() as u64,
            }),
            Ok(Err(err)) => Err(DeliveryFailure::Transport {
                message: err.to_string(),
            }),
            Ok(Ok(response)) => self.evaluate(response, payload),
        }
    }

    fn evaluate(
        &self,
        response: TransportResponse,
        payload: &NormalizedPayload,
    ) -> Result<Delivered, DeliveryFailure> {
        if !response.is_success() {
            warn!(status = response.status, body = %response.body, "webhook rejected submission");
            return Err(DeliveryFailure::Rejected {
                status: response.status,
            });
        }

        let payment_link = extract_payment_link(&response.body)
            .or_else(|| payload.payment_link().map(str::to_string));
        if self.settings.policy.success == SuccessCriterion::PaymentLink && payment_link.is_none() {
            warn!(body = %response.body, "no payment link in webhook response");
            return Err(DeliveryFailure::MissingPaymentLink);
        }

        Ok(Delivered {
            status: response.status,
            payment_link,
        })
    }
}

pub struct SubmissionController<T, B> {
    settings: PipelineSettings,
    catalog: TicketCatalog,
    transport: T,
    beacon: B,
    clock: fn() -> DateTime<Utc>,
}

impl<T: Transport, B: Beacon> SubmissionController<T, B> {
    pub fn new(settings: PipelineSettings, catalog: TicketCatalog, transport: T, beacon: B) -> Self {
        Self {
            settings,
            catalog,
            transport,
            beacon,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates and builds the payload without touching the page or the
    /// network.
    pub fn prepare(&self, input: &FormInput) -> Result<NormalizedPayload, CoreError> {
        let submission = Submission::new(&self.settings, &self.catalog);
        let form = submission.validate(input)?;
        Ok(submission.build(form, (self.clock)()))
    }

    /// Runs one submission. The page is borrowed mutably for the whole
    /// attempt, so a second submit cannot start until this one returns.
    pub async fn submit<P: Page>(&self, page: &mut P, input: &FormInput) -> SubmissionReport {
        let submission = Submission::new(&self.settings, &self.catalog);
        let mut trace = Trace::new();

        trace.enter(SubmissionState::Validating);
        let form = match submission.validate(input) {
            Ok(form) => form,
            Err(err) => {
                trace.enter(SubmissionState::Rejected);
                let message = rejection_message(&err);
                let field = err.field();
                info!(field = ?field, error = %err, "submission rejected");
                page.alert(message);
                if let Some(field) = field {
                    page.focus(field);
                }
                return SubmissionReport {
                    outcome: SubmissionOutcome::Rejected {
                        field,
                        message: message.to_string(),
                    },
                    states: trace.states,
                    payload: None,
                    payment_link_opened: None,
                    redirected_to: None,
                };
            }
        };

        trace.enter(SubmissionState::Building);
        let payload = submission.build(form, (self.clock)());
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(err) => {
                error!(error = %err, "failed to encode payload");
                let failure = DeliveryFailure::Encode {
                    message: err.to_string(),
                };
                page.alert(failure.user_message());
                trace.enter(SubmissionState::Halted);
                return SubmissionReport {
                    outcome: SubmissionOutcome::Halted {
                        failure,
                        fallback_queued: false,
                    },
                    states: trace.states,
                    payload: Some(payload),
                    payment_link_opened: None,
                    redirected_to: None,
                };
            }
        };

        trace.enter(SubmissionState::Sending);
        let original_label = page.disable_submit(BUSY_LABEL);
        info!(
            endpoint = %self.settings.endpoint,
            tipo = payload.ticket_type(),
            "sending submission"
        );
        let fallback_body = self.settings.policy.fallback_enabled.then(|| body.clone());

        let outcome = match submission.send(&self.transport, &payload, body).await {
            Ok(delivered) => {
                trace.enter(SubmissionState::Delivered);
                info!(status = delivered.status, "submission delivered");
                SubmissionOutcome::Delivered {
                    payment_link: delivered.payment_link,
                }
            }
            Err(failure) => self.degrade(failure, fallback_body, &mut trace, page),
        };

        page.enable_submit(&original_label);

        let mut payment_link_opened = None;
        let mut redirected_to = None;
        if outcome.redirects() {
            trace.enter(SubmissionState::Redirecting);
            if let SubmissionOutcome::Delivered {
                payment_link: Some(link),
            } = &outcome
            {
                if self.settings.open_payment_link {
                    page.open_new_context(link);
                    payment_link_opened = Some(link.clone());
                }
            }
            page.navigate(&self.settings.thank_you);
            redirected_to = Some(self.settings.thank_you.clone());
        } else {
            trace.enter(SubmissionState::Halted);
        }

        SubmissionReport {
            outcome,
            states: trace.states,
            payload: Some(payload),
            payment_link_opened,
            redirected_to,
        }
    }

    fn degrade<P: Page>(
        &self,
        failure: DeliveryFailure,
        fallback_body: Option<Vec<u8>>,
        trace: &mut Trace,
        page: &mut P,
    ) -> SubmissionOutcome {
        error!(failure = ?failure, "primary delivery failed");

        let mut fallback_queued = false;
        if failure.is_transport_level() {
            if let Some(body) = fallback_body {
                trace.enter(SubmissionState::FallbackSending);
                fallback_queued = self.beacon.send(&self.settings.endpoint, body);
                if fallback_queued {
                    info!("fallback beacon queued");
                } else {
                    warn!("fallback beacon could not be queued");
                }
            }
        }

        match self.settings.policy.redirect {
            RedirectPolicy::Always => SubmissionOutcome::Degraded {
                failure,
                fallback_queued,
            },
            RedirectPolicy::OnSuccess => {
                page.alert(failure.user_message());
                SubmissionOutcome::Halted {
                    failure,
                    fallback_queued,
                }
            }
        }
    }
}
