use crate::commands::{print_json, Context};
use crate::util::{format_timestamp_date, now_utc};
use anyhow::Result;
use clap::Args;
use enlist_core::domain::{EmailAddress, ParticipantId};
use enlist_core::registration::{Inserted, ParticipantStore, RegistrationMeta};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct AddArgs {
    pub email: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {}

#[derive(Debug, Serialize)]
struct AddReport {
    email: EmailAddress,
    added: bool,
    id: Option<ParticipantId>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    email: EmailAddress,
    registered: bool,
}

pub fn add(ctx: &Context<'_>, args: AddArgs) -> Result<()> {
    let email = EmailAddress::parse(&args.email)?;
    let meta = RegistrationMeta {
        now_utc: now_utc(),
        source: Some(ctx.config.source.as_str()),
    };
    let inserted = ctx.store.insert_participant(meta, &email)?;
    let id = match &inserted {
        Inserted::Added(participant) => Some(participant.id),
        Inserted::AlreadyExists => None,
    };

    if ctx.json {
        return print_json(&AddReport {
            email,
            added: id.is_some(),
            id,
        });
    }

    match id {
        Some(_) => println!("registered {}", email),
        None => println!("already registered {}", email),
    }
    Ok(())
}

pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let email = EmailAddress::parse(&args.email)?;
    let registered = ctx.store.exists_by_email(&email)?;

    if ctx.json {
        return print_json(&CheckReport { email, registered });
    }

    if registered {
        println!("{}: registered", email);
    } else {
        println!("{}: not registered", email);
    }
    Ok(())
}

pub fn list(ctx: &Context<'_>, _args: ListArgs) -> Result<()> {
    let participants = ctx.store.participants().list()?;

    if ctx.json {
        return print_json(&participants);
    }

    if participants.is_empty() {
        println!("no participants");
        return Ok(());
    }

    for participant in participants {
        let created = format_timestamp_date(participant.created_at);
        match participant.source.as_deref() {
            Some(source) => println!("{}  {}  {}", participant.email, created, source),
            None => println!("{}  {}", participant.email, created),
        }
    }
    Ok(())
}
