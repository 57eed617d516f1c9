//! Command implementations

use crate::cli::{Cli, Commands};
use crate::output::{output_event, output_session, output_sessions};
use carpark_app::repository::{build_service, open_recognition_cache};
use carpark_app::Config;
use carpark_domain::Plate;
use carpark_infra::export::export_sessions_csv;
use carpark_server::AppState;
use carpark_types::{CacheError, Error, OutputFormat, Result};
use std::path::PathBuf;

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Serve { bind } => cmd_serve(&config, cli.ephemeral, bind).await,
        Commands::Scan { image, dry_run } => {
            cmd_scan(&config, cli.ephemeral, image, dry_run, output_format).await
        }
        Commands::Record { plate } => cmd_record(&config, cli.ephemeral, &plate, output_format).await,
        Commands::Show { plate } => {
            let service = build_service(&config, cli.ephemeral)?;
            output_session(output_format, &service.find(&plate)?)
        }
        Commands::List { parked } => {
            let service = build_service(&config, cli.ephemeral)?;
            let mut sessions = service.list()?;
            if parked {
                sessions.retain(|s| s.is_parked);
            }
            output_sessions(output_format, &sessions)
        }
        Commands::Remove { plate } => {
            let service = build_service(&config, cli.ephemeral)?;
            service.remove(&plate).await?;
            println!("Removed {}", plate.trim());
            Ok(())
        }
        Commands::Export { output } => {
            let service = build_service(&config, cli.ephemeral)?;
            let rows = export_sessions_csv(&service.list()?, &output)?;
            println!("Exported {} record(s) to {}", rows, output.display());
            Ok(())
        }
        Commands::Config {
            show,
            set_bind,
            set_rate,
            set_data_dir,
            set_reader,
            set_model,
            set_command,
            set_registry,
            set_vehicles_file,
            set_cache,
            set_output,
            reset,
        } => cmd_config(
            show,
            ConfigUpdate {
                bind: set_bind,
                rate: set_rate,
                data_dir: set_data_dir,
                reader: set_reader,
                model: set_model,
                command: set_command,
                registry: set_registry,
                vehicles_file: set_vehicles_file,
                cache: set_cache,
                output: set_output,
            },
            reset,
        ),
        Commands::Cache { clear, stats } => cmd_cache(&config, clear, stats),
    }
}

async fn cmd_serve(config: &Config, ephemeral: bool, bind: Option<String>) -> Result<()> {
    let service = build_service(config, ephemeral)?;
    let address = bind.unwrap_or_else(|| config.bind_address.clone());
    carpark_server::serve(&address, AppState::new(service)).await
}

async fn cmd_scan(
    config: &Config,
    ephemeral: bool,
    image: PathBuf,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<()> {
    // A dry run records nothing, so it leaves the data dir free for a running server
    let service = build_service(config, ephemeral || dry_run)?;

    if dry_run {
        let plate = service.extract_plate_from_file(&image).await?;
        if output_format == OutputFormat::Json {
            println!("{}", serde_json::json!({ "carNumber": plate }));
        } else {
            println!("{}", plate);
        }
        return Ok(());
    }

    let resolution = service.record_image_file(&image).await?;
    output_event(output_format, &resolution.event)
}

async fn cmd_record(
    config: &Config,
    ephemeral: bool,
    plate: &str,
    output_format: OutputFormat,
) -> Result<()> {
    let plate = Plate::parse(plate)?;
    let service = build_service(config, ephemeral)?;
    let resolution = service.record_plate(&plate).await?;
    output_event(output_format, &resolution.event)
}

fn cmd_cache(config: &Config, clear: bool, stats: bool) -> Result<()> {
    if !config.cache_enabled {
        return Err(Error::Cache(CacheError::IoError(
            "Cache is disabled. Enable with: carpark config --set-cache true".to_string(),
        )));
    }

    let cache = open_recognition_cache(config)?;

    if clear {
        let count = cache.clear()?;
        println!("Cleared {} cached recognitions", count);
    }

    if stats || !clear {
        if cache.is_empty()? {
            println!("Recognition cache is empty");
        } else {
            println!("Cached recognitions: {}", cache.len()?);
        }
    }

    Ok(())
}

/// Requested config changes, `None` leaves a value alone
#[derive(Debug, Default)]
struct ConfigUpdate {
    bind: Option<String>,
    rate: Option<i64>,
    data_dir: Option<PathBuf>,
    reader: Option<String>,
    model: Option<String>,
    command: Option<String>,
    registry: Option<String>,
    vehicles_file: Option<PathBuf>,
    cache: Option<bool>,
    output: Option<OutputFormat>,
}

impl ConfigUpdate {
    /// Apply the changes, returning whether anything was set
    fn apply(self, config: &mut Config) -> Result<bool> {
        let mut modified = false;

        if let Some(bind) = self.bind {
            config.bind_address = bind;
            modified = true;
        }
        if let Some(rate) = self.rate {
            if rate < 0 {
                return Err(Error::Validation("Rate per hour cannot be negative".to_string()));
            }
            config.rate_per_hour = rate;
            modified = true;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = Some(dir);
            modified = true;
        }
        if let Some(reader) = self.reader {
            if !matches!(reader.as_str(), "gemini" | "command") {
                return Err(Error::Validation(format!("Unknown reader backend: {reader}")));
            }
            config.reader.backend = reader;
            modified = true;
        }
        if let Some(model) = self.model {
            config.reader.model = Some(model);
            modified = true;
        }
        if let Some(command) = self.command {
            config.reader.command = Some(command);
            modified = true;
        }
        if let Some(registry) = self.registry {
            if !matches!(registry.as_str(), "rto-api" | "vehicle-master" | "none") {
                return Err(Error::Validation(format!("Unknown registry backend: {registry}")));
            }
            config.registry.backend = registry;
            modified = true;
        }
        if let Some(file) = self.vehicles_file {
            config.registry.vehicles_file = Some(file);
            modified = true;
        }
        if let Some(cache) = self.cache {
            config.cache_enabled = cache;
            modified = true;
        }
        if let Some(output) = self.output {
            config.output_format = output;
            modified = true;
        }

        Ok(modified)
    }
}

fn cmd_config(show: bool, update: ConfigUpdate, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    // Reload without environment overrides so keys from the environment are not persisted
    let mut config = Config::load_from(&Config::config_path()?)?;
    let modified = update.apply(&mut config)?;

    if modified {
        config.save()?;
        println!("Configuration saved");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
