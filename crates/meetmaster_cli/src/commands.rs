//! Command handlers: one protocol transaction each, plus rendering.

use crate::prompt::StdinFields;
use anyhow::{Context, Result};
use meetmaster_core::{
    Clock, ProtocolService, RecordKind, ServiceError, SkippedRow, StoreError,
};

pub fn show<C: Clock>(
    service: &ProtocolService<C>,
    kind: Option<RecordKind>,
    json: bool,
) -> Result<()> {
    if json {
        let outcome = service.records(kind).context("failed to read protocol")?;
        warn_skipped(&outcome.skipped, false);
        println!("{}", serde_json::to_string_pretty(&outcome.value)?);
        return Ok(());
    }

    let listing = service.show(kind).context("failed to read protocol")?;
    warn_skipped(&listing.skipped, false);

    if listing.value.is_empty() {
        println!("No items.");
        return Ok(());
    }
    // Positions are only meaningful for `remove` when unfiltered.
    for (index, title) in listing.value.iter().enumerate() {
        match kind {
            None => println!("{index}: {title}"),
            Some(_) => println!("- {title}"),
        }
    }
    Ok(())
}

pub fn add<C: Clock>(
    service: &ProtocolService<C>,
    kind: RecordKind,
    title: &str,
    desc: Option<String>,
) -> Result<()> {
    let outcome = service
        .add_prompted(kind, title, desc, &mut StdinFields)
        .context("failed to add item")?;
    warn_skipped(&outcome.skipped, true);
    println!("Added {kind} #{}: {title}", outcome.value);
    Ok(())
}

pub fn remove<C: Clock>(service: &ProtocolService<C>, index: usize) -> Result<()> {
    match service.remove(index) {
        Ok(outcome) => {
            warn_skipped(&outcome.skipped, true);
            let record = outcome.value;
            println!("Removed {} #{index}: {}", record.kind(), record.title);
            Ok(())
        }
        Err(ServiceError::Store(StoreError::OutOfRange { index, len })) => {
            let valid = match len {
                0 => "the protocol is empty".to_string(),
                n => format!("valid positions are 0..={}", n - 1),
            };
            anyhow::bail!("no item at position {index}; {valid}")
        }
        Err(err) => Err(err).context("failed to remove item"),
    }
}

pub fn delete<C: Clock>(service: &ProtocolService<C>) -> Result<()> {
    let outcome = service.delete_all().context("failed to clear protocol")?;
    warn_skipped(&outcome.skipped, true);
    println!("Deleted {} items.", outcome.value);
    Ok(())
}

/// `dropped` marks rows that the save just removed from the file.
fn warn_skipped(skipped: &[SkippedRow], dropped: bool) {
    for row in skipped {
        if dropped {
            eprintln!(
                "warning: unreadable line {} was dropped from the protocol: {}",
                row.line, row.reason
            );
        } else {
            eprintln!("warning: skipped unreadable line {}: {}", row.line, row.reason);
        }
    }
}
