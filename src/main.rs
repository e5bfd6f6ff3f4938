use std::path::{Path, PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use log::{error, info, warn};
use serde_json::{Map, Value};
use us_address_validate::{
    validate_address, Address, AddressFieldValidator, FailureReason, SmartyClient, SmartyConfig,
    StreetVerifier, Validation,
};
use crate::record::{InputRow, Record, Status};

mod record;

const FIELD: &str = "address";

/// Validate US mailing addresses against the Smarty US Street API.
///
/// Credentials are read from `SMARTY_AUTH_ID` and `SMARTY_AUTH_TOKEN`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a single free-form address, e.g. "1 Main St, San Francisco, CA"
    Check {
        address: String,
    },
    /// Validate every row of a CSV file with street,city,state,zip,country columns
    Batch {
        input: PathBuf,
        #[arg(short, long, default_value = "result/validated.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    install_tracing();

    if let Err(e) = run(Cli::parse()).await {
        log::error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

async fn run(cli: Cli) -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = SmartyConfig::from_env()?;
    let client = SmartyClient::new(&config)?;

    match cli.command {
        Command::Check { address } => check(client, address).await,
        Command::Batch { input, output } => batch(client, &input, &output).await,
    }
}

async fn check(client: SmartyClient, address: String) -> color_eyre::Result<()> {
    match validate_address(&client, &Value::String(address)).await? {
        Validation::Clean(address) => {
            println!("{}", address);
            Ok(())
        }
        Validation::Rejected(reason) => {
            println!("{}", reason);
            Err(eyre!("address is not valid"))
        }
    }
}

/// validate the rows one at a time, then write the results
async fn batch(client: SmartyClient, input: &Path, output: &Path) -> color_eyre::Result<()> {
    let rows = read_rows(input)?;
    let total = rows.len();
    info!("validating [{}] addresses from [{}]", total, input.display());

    let validator = AddressFieldValidator::new(client);
    let records = validate_rows(&validator, rows).await;

    let valid = records.iter().filter(|r| r.status == Status::Valid).count();
    let failed = records.iter().filter(|r| r.status == Status::Error).count();
    if failed > 0 {
        warn!("[{}/{}] addresses could not be checked", failed, total);
    }
    info!("[{}/{}] addresses are deliverable, saving records to [{}]", valid, total, output.display());
    save_records(records, output)
}

/// A row that cannot be checked is recorded as an error and the rest still run.
async fn validate_rows<V: StreetVerifier>(validator: &AddressFieldValidator<V>, rows: Vec<InputRow>) -> Vec<Record> {
    let total = rows.len();
    let mut records = Vec::with_capacity(total);
    for (idx, row) in rows.into_iter().enumerate() {
        let record = match validate_row(validator, &row).await {
            Ok(Ok(address)) => Record::valid(row, address),
            Ok(Err(reason)) => {
                warn!("[{}/{total}] {}", idx + 1, reason.message);
                Record::invalid(row, reason)
            }
            Err(e) => {
                error!("[{}/{total}] cannot validate address: {:?}", idx + 1, e);
                Record::failed(row, format!("{:#}", e))
            }
        };
        records.push(record);
    }
    records
}

async fn validate_row<V: StreetVerifier>(
    validator: &AddressFieldValidator<V>,
    row: &InputRow,
) -> color_eyre::Result<Result<Address, FailureReason>> {
    let mut container = Map::new();
    container.insert(FIELD.to_string(), row.to_value());

    if validator.validate_and_clean(&mut container, FIELD).await? {
        let cleaned = container.remove(FIELD)
            .ok_or_else(|| eyre!("cleaned address missing"))?;
        Ok(Ok(serde_json::from_value::<Address>(cleaned)?))
    } else {
        Ok(Err(validator.reason_for_failure(FIELD)))
    }
}

fn read_rows(path: &Path) -> color_eyre::Result<Vec<InputRow>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<Result<Vec<InputRow>, _>>()?;
    Ok(rows)
}

/// write result to CSV file
fn save_records(records: Vec<Record>, save_path: impl AsRef<Path>) -> color_eyre::Result<()> {
    if let Some(parent) = save_path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(save_path)?;
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
