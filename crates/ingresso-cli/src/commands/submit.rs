use crate::commands::{print_json, Context};
use crate::error::{delivery_failed, invalid_input};
use crate::page::TerminalPage;
use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use ingresso_config::parse_endpoint;
use ingresso_core::rules::{rejection_message, validate_form, validate_timeout_ms};
use ingresso_core::{DeliveryMode, DeliveryPolicy, FormField, FormInput, NormalizedPayload};
use ingresso_delivery::http::{HttpBeacon, HttpTransport};
use ingresso_delivery::{
    DeliveryFailure, PipelineSettings, SubmissionController, SubmissionOutcome, SubmissionReport,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[arg(long)]
    pub nome: String,
    #[arg(long)]
    pub cpf: String,
    #[arg(long)]
    pub ddd: String,
    #[arg(long)]
    pub telefone: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub tipo: String,
    /// Override delivery.endpoint
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Override delivery.mode (resets the policy to the mode's preset)
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    #[arg(long = "timeout-ms")]
    pub timeout_ms: Option<u64>,
    /// Validate and print the payload without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Webhook,
    PaymentLink,
}

impl From<ModeArg> for DeliveryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Webhook => DeliveryMode::Webhook,
            ModeArg::PaymentLink => DeliveryMode::PaymentLink,
        }
    }
}

impl SubmitArgs {
    fn form_input(&self) -> FormInput {
        FormInput {
            name: self.nome.clone(),
            cpf: self.cpf.clone(),
            area_code: self.ddd.clone(),
            phone: self.telefone.clone(),
            email: self.email.clone(),
            ticket_type: self.tipo.clone(),
        }
    }
}

pub fn submit(ctx: &Context<'_>, args: SubmitArgs) -> Result<()> {
    let input = args.form_input();

    if args.dry_run {
        let form = validate_form(&input).map_err(|err| {
            eprintln!("{}", rejection_message(&err));
            invalid_input(err.to_string())
        })?;
        let payload = NormalizedPayload::build(form, &ctx.config.tickets, Utc::now());
        return print_payload(ctx.json, &payload);
    }

    let settings = pipeline_settings(ctx, &args)?;
    let transport = HttpTransport::new(None)?;
    let beacon = HttpBeacon::new(None)?;
    let controller = SubmissionController::new(
        settings,
        ctx.config.tickets.clone(),
        transport,
        beacon.clone(),
    );
    let mut page = TerminalPage::new(ctx.json);

    let runtime = Runtime::new().with_context(|| "start async runtime")?;
    let report = runtime.block_on(async {
        let report = controller.submit(&mut page, &input).await;
        beacon.drain().await;
        report
    });

    if ctx.json {
        print_json(&report)?;
    }
    finish(report)
}

fn pipeline_settings(ctx: &Context<'_>, args: &SubmitArgs) -> Result<PipelineSettings> {
    let delivery = &ctx.config.delivery;

    let endpoint = match args.endpoint.as_deref() {
        Some(raw) => parse_endpoint(raw)?,
        None => delivery
            .endpoint
            .clone()
            .ok_or_else(|| invalid_input("no delivery endpoint configured; pass --endpoint"))?,
    };

    let mut policy = match args.mode {
        Some(mode) => DeliveryPolicy::preset(mode.into()),
        None => delivery.policy,
    };
    if let Some(value) = args.timeout_ms {
        policy.timeout = validate_timeout_ms(value)
            .ok_or_else(|| invalid_input(format!("timeout must be 1..=60000 ms, got {value}")))?;
    }

    Ok(PipelineSettings {
        endpoint,
        policy,
        thank_you: ctx.config.redirect.thank_you.clone(),
        open_payment_link: ctx.config.redirect.open_payment_link,
    })
}

fn print_payload(json: bool, payload: &NormalizedPayload) -> Result<()> {
    if json {
        return print_json(payload);
    }
    println!("nome\t{}", payload.name());
    println!("cpf\t{}", payload.cpf());
    println!("ddd\t{}", payload.area_code());
    println!("telefone\t{}", payload.phone());
    println!("email\t{}", payload.email());
    println!("tipo\t{}", payload.ticket_type());
    if let Some(price) = payload.price() {
        println!("price\t{price}");
    }
    if let Some(link) = payload.payment_link() {
        println!("payment_link\t{link}");
    }
    println!("timestamp\t{}", payload.timestamp().to_rfc3339());
    Ok(())
}

fn finish(report: SubmissionReport) -> Result<()> {
    match report.outcome {
        SubmissionOutcome::Delivered { .. } => {
            info!("submission complete");
            Ok(())
        }
        SubmissionOutcome::Degraded {
            failure,
            fallback_queued,
        } => {
            warn!(
                failure = %describe(&failure),
                fallback_queued,
                "delivery failed, buyer redirected anyway"
            );
            Ok(())
        }
        SubmissionOutcome::Rejected { field, .. } => Err(invalid_input(rejection_reason(field))),
        SubmissionOutcome::Halted { failure, .. } => Err(delivery_failed(describe(&failure))),
    }
}

fn rejection_reason(field: Option<FormField>) -> String {
    match field {
        Some(field) => format!("field {field} failed validation"),
        None => "form failed validation".to_string(),
    }
}

fn describe(failure: &DeliveryFailure) -> String {
    match failure {
        DeliveryFailure::Timeout { timeout_ms } => format!("no response within {timeout_ms} ms"),
        DeliveryFailure::Transport { message } => format!("transport error: {message}"),
        DeliveryFailure::Rejected { status } => format!("endpoint answered {status}"),
        DeliveryFailure::MissingPaymentLink => "no payment link in response".to_string(),
        DeliveryFailure::Encode { message } => format!("could not encode payload: {message}"),
    }
}
