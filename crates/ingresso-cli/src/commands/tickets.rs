use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::offer_label;
use anyhow::Result;
use clap::Args;
use ingresso_core::{TicketOffer, TicketType};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct TicketsArgs {
    /// Show a single ticket type
    #[arg(long = "type", value_name = "TIPO")]
    pub ticket_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct TicketDto<'a> {
    tipo: &'a str,
    #[serde(flatten)]
    offer: &'a TicketOffer,
}

#[derive(Debug, Serialize)]
struct CatalogDto<'a> {
    tickets: Vec<TicketDto<'a>>,
    fallback: &'a TicketOffer,
}

pub fn list_tickets(ctx: &Context<'_>, args: TicketsArgs) -> Result<()> {
    let catalog = &ctx.config.tickets;

    if let Some(raw) = args.ticket_type {
        let kind: TicketType = raw
            .parse()
            .map_err(|_| invalid_input(format!("unknown ticket type: {}", raw.trim())))?;
        let offer = catalog
            .get(kind)
            .ok_or_else(|| not_found(format!("no offer configured for {kind}")))?;
        if ctx.json {
            print_json(&TicketDto {
                tipo: kind.as_str(),
                offer,
            })?;
        } else {
            println!("{kind}\t{}", offer_label(offer));
        }
        return Ok(());
    }

    if ctx.json {
        let tickets = catalog
            .iter()
            .map(|(kind, offer)| TicketDto {
                tipo: kind.as_str(),
                offer,
            })
            .collect();
        print_json(&CatalogDto {
            tickets,
            fallback: catalog.fallback(),
        })?;
        return Ok(());
    }

    for (kind, offer) in catalog.iter() {
        println!("{kind}\t{}", offer_label(offer));
    }
    println!("(other)\t{}", offer_label(catalog.fallback()));
    Ok(())
}
