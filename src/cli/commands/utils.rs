//! Shared utilities for CLI commands

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};

use crate::cli::table::Listing;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Entity;
use crate::core::error::TrackerError;
use crate::core::store::Store;
use crate::core::tracker::Tracker;
use crate::core::Config;

/// Everything a command needs: merged config, the store and the loaded data
pub struct Session {
    pub config: Config,
    pub store: Store,
    pub tracker: Tracker,
}

impl Session {
    /// Load config, locate the data directory and read all three documents
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let dir = config.data_dir(global.data_dir.as_deref()).ok_or_else(|| {
            miette::miette!(
                help = "pass --data-dir, set PTRACK_DATA_DIR, or run 'ptrack init'",
                "Could not determine a data directory"
            )
        })?;
        tracing::debug!(dir = %dir.display(), "using data directory");

        let store = Store::new(dir);
        let tracker = store.load().map_err(TrackerError::from)?;
        Ok(Self {
            config,
            store,
            tracker,
        })
    }

    /// Write back whatever the command changed
    pub fn commit(&mut self) -> Result<()> {
        self.store
            .save(&mut self.tracker)
            .map_err(TrackerError::from)?;
        Ok(())
    }

    /// Output format after resolving `auto` against the configured default
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        resolve_format(global.format, self.config.default_format.as_deref())
    }
}

/// `auto` becomes the configured default, or a table when that is unset or unusable
pub fn resolve_format(requested: OutputFormat, configured: Option<&str>) -> OutputFormat {
    if requested != OutputFormat::Auto {
        return requested;
    }
    match configured.map(|name| OutputFormat::from_str(name, true)) {
        Some(Ok(OutputFormat::Auto)) | None => OutputFormat::Table,
        Some(Ok(format)) => format,
        Some(Err(_)) => {
            tracing::warn!(format = ?configured, "unknown default_format in config, using table");
            OutputFormat::Table
        }
    }
}

/// Print entities in any format
pub fn print_entities<T: Entity>(entities: &[&T], listing: Listing, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let records: Vec<T::Record> = entities.iter().map(|e| e.to_record()).collect();
            println!("{}", serde_json::to_string_pretty(&records).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let records: Vec<T::Record> = entities.iter().map(|e| e.to_record()).collect();
            print!("{}", serde_yml::to_string(&records).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for entity in entities {
                println!("{}", entity.id());
            }
        }
        OutputFormat::Csv => {
            print!("{}", listing.render_csv()?);
        }
        OutputFormat::Table | OutputFormat::Auto => {
            if listing.is_empty() {
                println!("{}", listing.empty_message());
            } else {
                print!("{}", listing.render_table());
            }
        }
    }
    Ok(())
}

/// Print one entity as a record when a machine format was requested.
///
/// Returns false for table/csv so the caller prints its detail view.
pub fn print_record<T: Entity>(entity: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entity.to_record()).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&entity.to_record()).into_diagnostic()?);
        }
        OutputFormat::Id => println!("{}", entity.id()),
        OutputFormat::Table | OutputFormat::Csv | OutputFormat::Auto => return Ok(false),
    }
    Ok(true)
}
