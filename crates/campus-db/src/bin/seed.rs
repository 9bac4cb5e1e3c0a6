//! # Seed Data Loader
//!
//! Populates the database with campus points of sale for development.
//!
//! ## Usage
//! ```bash
//! # Load the built-in campus POS list
//! cargo run -p campus-db --bin seed
//!
//! # Load POS from a JSON file (array of POS objects, camelCase fields)
//! cargo run -p campus-db --bin seed -- --file ./pos.json
//!
//! # Reset the collection first, use a specific database file
//! cargo run -p campus-db --bin seed -- --clear --db ./data/campus.db
//! ```
//!
//! Every record goes through `PosService::create_pos`, so a single invalid
//! entry rejects the whole file and nothing is written.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use campus_core::{PosInput, PosService};
use campus_db::{Database, DbConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Built-in sample data: `(name, description, type, campus, street, number, postal code)`.
const SAMPLE_POS: &[(&str, &str, &str, &str, &str, &str, i64)] = &[
    (
        "Kaffeebar",
        "Main hall",
        "CAFE",
        "NEUENHEIMER_FELD",
        "Im Neuenheimer Feld",
        "300",
        69120,
    ),
    (
        "Botanik Automat",
        "Next to the lecture hall entrance",
        "VENDING_MACHINE",
        "NEUENHEIMER_FELD",
        "Im Neuenheimer Feld",
        "360",
        69120,
    ),
    (
        "Triplex Mensa",
        "Self-service counter",
        "CAFETERIA",
        "ALTSTADT",
        "Grabengasse",
        "14",
        69117,
    ),
    (
        "Bäckerei am Marstall",
        "Fresh pastries every morning",
        "BAKERY",
        "ALTSTADT",
        "Marstallhof",
        "3",
        69117,
    ),
    (
        "Bergheim Café",
        "Ground floor",
        "CAFE",
        "BERGHEIM",
        "Bergheimer Straße",
        "58",
        69115,
    ),
];

/// Parsed command line.
struct Args {
    db_path: Option<PathBuf>,
    file: Option<PathBuf>,
    clear: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let Some(args) = parse_args(env::args().skip(1).collect())? else {
        print_help();
        return Ok(());
    };

    let mut config = DbConfig::from_env()?;
    if let Some(path) = args.db_path {
        config.database_path = path;
    }

    info!(path = %config.database_path.display(), "Seeding POS database");

    let db = Database::new(config).await?;
    let service = PosService::new(Arc::new(db.pos()));

    if args.clear {
        service.clear().await?;
        info!("Existing POS removed");
    } else {
        let existing = service.retrieve_pos().await?.len();
        if existing > 0 {
            info!(
                existing,
                "Database already has POS, skipping seed (use --clear to reset)"
            );
            return Ok(());
        }
    }

    let inputs = match args.file {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str::<Vec<PosInput>>(&raw)?
        }
        None => sample_inputs(),
    };

    let created = match service.create_pos(inputs).await {
        Ok(created) => created,
        Err(err) => {
            error!(error = %err, "Seed rejected, nothing was written");
            db.close().await;
            return Err(err.into());
        }
    };

    for pos in &created {
        info!(id = %pos.id, name = %pos.name, campus = %pos.campus, "Seeded POS");
    }
    info!(count = created.len(), "Seed complete");

    db.close().await;
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<Args>, String> {
    let mut parsed = Args {
        db_path: None,
        file: None,
        clear: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                let value = iter.next().ok_or("--db needs a path")?;
                parsed.db_path = Some(value.into());
            }
            "--file" | "-f" => {
                let value = iter.next().ok_or("--file needs a path")?;
                parsed.file = Some(value.into());
            }
            "--clear" => parsed.clear = true,
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(Some(parsed))
}

fn print_help() {
    println!("Campus Coffee Seed Data Loader");
    println!();
    println!("Usage: seed [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -d, --db <PATH>      Database file path (default: $CAMPUS_DB_PATH or ./campus_coffee.db)");
    println!("  -f, --file <PATH>    JSON array of POS to load instead of the built-in list");
    println!("      --clear          Remove all POS before seeding");
    println!("  -h, --help           Show this help message");
}

fn sample_inputs() -> Vec<PosInput> {
    SAMPLE_POS
        .iter()
        .map(
            |&(name, description, pos_type, campus, street, house_number, postal_code)| PosInput {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                pos_type: Some(pos_type.to_string()),
                campus: Some(campus.to_string()),
                street: Some(street.to_string()),
                house_number: Some(house_number.to_string()),
                postal_code: Some(postal_code.into()),
                city: Some("Heidelberg".to_string()),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_seeds_built_in_list() {
        let parsed = parse_args(Vec::new()).unwrap().unwrap();
        assert!(parsed.db_path.is_none());
        assert!(parsed.file.is_none());
        assert!(!parsed.clear);
    }

    #[test]
    fn test_db_file_and_clear() {
        let parsed = parse_args(args(&["--db", "/tmp/pos.db", "-f", "pos.json", "--clear"]))
            .unwrap()
            .unwrap();
        assert_eq!(parsed.db_path, Some(PathBuf::from("/tmp/pos.db")));
        assert_eq!(parsed.file, Some(PathBuf::from("pos.json")));
        assert!(parsed.clear);

        let parsed = parse_args(args(&["-d", "a.db", "--file", "b.json"])).unwrap().unwrap();
        assert_eq!(parsed.db_path, Some(PathBuf::from("a.db")));
        assert_eq!(parsed.file, Some(PathBuf::from("b.json")));
    }

    #[test]
    fn test_help_stops_parsing() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
        assert!(parse_args(args(&["--clear", "-h", "--bogus"])).unwrap().is_none());
    }

    #[test]
    fn test_rejects_unknown_and_incomplete_flags() {
        assert_eq!(
            parse_args(args(&["--force"])).err(),
            Some("unknown argument: --force".to_string())
        );
        assert_eq!(
            parse_args(args(&["--db"])).err(),
            Some("--db needs a path".to_string())
        );
        assert!(parse_args(args(&["--file"])).is_err());
    }

    #[test]
    fn test_built_in_list_is_valid() {
        let inputs = sample_inputs();
        assert_eq!(inputs.len(), SAMPLE_POS.len());
        for input in &inputs {
            assert!(campus_core::validation::validate_pos_input(input).is_ok());
        }
    }
}
