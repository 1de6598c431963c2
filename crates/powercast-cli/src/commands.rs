//! Handlers for the data subcommands.

use std::path::PathBuf;

use powercast_core::{ConfigManager, PowercastConfig, Result};

use crate::cli::Command;
use crate::config_handlers::handle_config_command;

/// Runs a parsed subcommand.
pub async fn dispatch(config_path: Option<&str>, command: Command) -> Result<()> {
    tracing::debug!(?config_path, ?command, "Dispatching command");
    match command {
        Command::Download {
            raw_dir,
            processed_dir,
            url,
        } => {
            let mut config = PowercastConfig::load(config_path)?;
            override_path(&mut config.paths.raw_dir, raw_dir);
            override_path(&mut config.paths.processed_dir, processed_dir);
            if let Some(url) = url {
                config.download.url = url;
            }
            config.validate()?;
            let txt = powercast_data::fetch(&config).await?;
            println!("{}", txt.display());
            Ok(())
        }
        Command::Preprocess {
            raw_dir,
            processed_dir,
            freq,
        } => {
            let mut config = PowercastConfig::load(config_path)?;
            override_path(&mut config.paths.raw_dir, raw_dir);
            override_path(&mut config.paths.processed_dir, processed_dir);
            if let Some(freq) = freq {
                config.resample.frequency = freq;
            }
            let summary = powercast_data::preprocess(&config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Command::Eda {
            raw_dir,
            output_dir,
        } => {
            let mut config = PowercastConfig::load(config_path)?;
            override_path(&mut config.paths.raw_dir, raw_dir);
            override_path(&mut config.paths.output_dir, output_dir);
            config.validate()?;
            let (_, written) = powercast_eda::run_eda(&config)?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Config { action } => handle_config_command(config_path, action),
    }
}

fn override_path(target: &mut PathBuf, value: Option<PathBuf>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_override_path() {
        let mut path = PathBuf::from("data/raw");
        override_path(&mut path, None);
        assert_eq!(path, PathBuf::from("data/raw"));
        override_path(&mut path, Some(PathBuf::from("/mnt/raw")));
        assert_eq!(path, PathBuf::from("/mnt/raw"));
    }

    #[tokio::test]
    async fn test_preprocess_missing_raw_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let result = dispatch(
            Some(config_path.to_str().unwrap()),
            Command::Preprocess {
                raw_dir: Some(dir.path().join("raw")),
                processed_dir: Some(dir.path().join("processed")),
                freq: None,
            },
        )
        .await;
        assert!(result.unwrap_err().to_string().contains("household_power_consumption.txt"));
    }
}
