use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::now_utc_ms;
use anyhow::Result;
use clap::Args;
use ingresso_config::parse_deadline;
use ingresso_core::rules::{countdown_until, EXPIRED_BANNER};

#[derive(Debug, Args)]
pub struct CountdownArgs {
    /// RFC 3339 deadline, overriding event.deadline
    #[arg(long)]
    pub deadline: Option<String>,
}

pub fn countdown(ctx: &Context<'_>, args: CountdownArgs) -> Result<()> {
    let deadline = match args.deadline {
        Some(raw) => parse_deadline(&raw)?,
        None => ctx
            .config
            .event
            .deadline
            .ok_or_else(|| invalid_input("no event deadline configured"))?,
    };

    let remaining = countdown_until(deadline.timestamp_millis(), now_utc_ms());

    if ctx.json {
        print_json(&serde_json::json!({
            "deadline": deadline.to_rfc3339(),
            "expired": remaining.is_none(),
            "remaining": remaining,
        }))?;
        return Ok(());
    }

    match remaining {
        Some(left) if left.days > 0 => println!("{}d {}", left.days, left.clock()),
        Some(left) => println!("{}", left.clock()),
        None => println!("{EXPIRED_BANNER}"),
    }
    Ok(())
}
