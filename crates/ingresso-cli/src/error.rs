use anyhow::Error;
use ingresso_config::ConfigError;
use ingresso_core::CoreError;
use ingresso_delivery::DeliveryError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_DELIVERY_FAILED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn delivery_failed(message: impl Into<String>) -> Error {
    CliError::DeliveryFailed(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
                CliError::DeliveryFailed(_) => EXIT_DELIVERY_FAILED,
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(delivery_err) = cause.downcast_ref::<DeliveryError>() {
            return ExitCode::from(delivery_exit_code(delivery_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::MissingConfigFile(_) => EXIT_NOT_FOUND,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidEndpoint(_)
        | ConfigError::InvalidTimeout(_)
        | ConfigError::EmptyThankYou
        | ConfigError::InvalidDeadline(_)
        | ConfigError::InvalidTicketType(_)
        | ConfigError::InvalidOffer { .. }
        | ConfigError::InvalidFallbackLink(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn delivery_exit_code(err: &DeliveryError) -> u8 {
    match err {
        DeliveryError::Unavailable(_) => EXIT_INVALID_INPUT,
        DeliveryError::Encode(_) | DeliveryError::Transport(_) => EXIT_FAILURE,
    }
}
