use crate::commands::print_json;
use anyhow::Result;
use clap::{Args, Subcommand};
use ingresso_core::{format_area_code, format_cpf, format_phone};

#[derive(Debug, Subcommand)]
pub enum FormatCommand {
    Cpf(FormatArgs),
    #[command(name = "area-code")]
    AreaCode(FormatArgs),
    Phone(FormatArgs),
}

#[derive(Debug, Args)]
pub struct FormatArgs {
    #[arg(allow_hyphen_values = true)]
    pub raw: String,
}

pub fn run(json: bool, cmd: FormatCommand) -> Result<()> {
    let (field, raw, formatted) = match cmd {
        FormatCommand::Cpf(args) => {
            let formatted = format_cpf(&args.raw);
            ("cpf", args.raw, formatted)
        }
        FormatCommand::AreaCode(args) => {
            let formatted = format_area_code(&args.raw);
            ("ddd", args.raw, formatted)
        }
        FormatCommand::Phone(args) => {
            let formatted = format_phone(&args.raw);
            ("telefone", args.raw, formatted)
        }
    };

    if json {
        print_json(&serde_json::json!({
            "field": field,
            "input": raw,
            "formatted": formatted,
        }))?;
    } else {
        println!("{formatted}");
    }
    Ok(())
}
