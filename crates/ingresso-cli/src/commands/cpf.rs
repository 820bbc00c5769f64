use crate::commands::print_json;
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use ingresso_core::{cpf_blur_hint, format_cpf, is_valid_cpf, only_digits};

#[derive(Debug, Args)]
pub struct CheckCpfArgs {
    pub cpf: String,
}

pub fn check_cpf(json: bool, args: CheckCpfArgs) -> Result<()> {
    let valid = is_valid_cpf(&args.cpf);
    let formatted = format_cpf(&args.cpf);

    if json {
        print_json(&serde_json::json!({
            "cpf": only_digits(&args.cpf),
            "formatted": formatted,
            "valid": valid,
            "hint": cpf_blur_hint(&args.cpf),
        }))?;
    } else if valid {
        println!("{formatted} valid");
    }

    if !valid {
        return Err(invalid_input(format!("invalid CPF: {}", args.cpf.trim())));
    }
    Ok(())
}
