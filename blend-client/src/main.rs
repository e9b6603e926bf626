//! blend-save - submit the operator's blend form to the blend server
//!
//! Reads form fields from a JSON file, optionally prefills rows from the
//! coal reference list, then creates or updates the blend. The outcome (or
//! the failure) is always reported on the terminal.

use anyhow::{bail, Context, Result};
use blend_client::{build_snapshot, BlendClient, FieldMap, ResolvePolicy, SaveSession};
use blend_common::{BlendId, ROW_COUNT};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for blend-save
#[derive(Parser, Debug)]
#[command(name = "blend-save")]
#[command(about = "Save a coal blend form to the blend server")]
#[command(version)]
struct Args {
    /// Blend server root URL
    #[arg(short, long, default_value = "http://127.0.0.1:5000", env = "BLEND_SERVER")]
    server: String,

    /// JSON file with form fields: {"fields": {...}, "flows": [...]}
    #[arg(short, long)]
    form: PathBuf,

    /// What to do when the latest-blend lookup fails
    #[arg(long, value_enum, default_value_t = ResolvePolicy::Lenient)]
    resolve: ResolvePolicy,

    /// Continue editing this blend instead of looking up the latest one
    #[arg(long)]
    blend_id: Option<String>,

    /// Choose a reference coal for a row, e.g. `--coal 2=Indo` (id or name)
    #[arg(long = "coal", value_name = "ROW=COAL")]
    coals: Vec<String>,
}

/// Parse `ROW=COAL` with ROW in 1..=ROW_COUNT
fn parse_coal_choice(raw: &str) -> Result<(usize, String)> {
    let (row, coal) = raw
        .split_once('=')
        .with_context(|| format!("Expected ROW=COAL, got {:?}", raw))?;
    let row: usize = row
        .trim()
        .parse()
        .with_context(|| format!("Invalid row number in {:?}", raw))?;
    if !(1..=ROW_COUNT).contains(&row) {
        bail!("Row must be between 1 and {}, got {}", ROW_COUNT, row);
    }
    Ok((row, coal.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,blend_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "blend-save v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    info!(server = %args.server, policy = ?args.resolve, "Saving blend form");

    let choices = args
        .coals
        .iter()
        .map(|raw| parse_coal_choice(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut form = FieldMap::load(&args.form)
        .with_context(|| format!("Failed to read form file {}", args.form.display()))?;

    let client = BlendClient::new(&args.server, args.resolve)?;

    if !choices.is_empty() {
        let catalog = client.fetch_coal_catalog().await;
        for (row, wanted) in &choices {
            match catalog.find(wanted) {
                Some(coal) => {
                    info!(row, coal = %coal.label(), "Selected reference coal");
                    form.select_coal(*row, coal);
                }
                None => bail!("Coal {:?} not found in the reference list", wanted),
            }
        }
    }

    let snapshot = build_snapshot(&form);

    let mut session = match args.blend_id {
        Some(id) => SaveSession::resuming(BlendId::new(id)),
        None => SaveSession::new(),
    };

    // Failures surface through main's error report
    let outcome = client.save(&mut session, &snapshot).await?;
    println!("{}", outcome);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coal_choice() {
        assert_eq!(parse_coal_choice("2=Indo 4200").unwrap(), (2, "Indo 4200".to_string()));
        assert_eq!(parse_coal_choice(" 3 = a1 ").unwrap(), (3, "a1".to_string()));
    }

    #[test]
    fn test_parse_coal_choice_rejects_bad_rows() {
        assert!(parse_coal_choice("0=x").is_err());
        assert!(parse_coal_choice("4=x").is_err());
        assert!(parse_coal_choice("one=x").is_err());
        assert!(parse_coal_choice("x").is_err());
    }
}
