use anyhow::Result;
use ingresso_config::AppConfig;
use serde::Serialize;
use std::io::{self, Write};

pub mod completions;
pub mod countdown;
pub mod cpf;
pub mod format;
pub mod submit;
pub mod tickets;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
