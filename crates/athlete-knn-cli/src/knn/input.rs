use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use athlete_knn::config::KnnConfig;
use athlete_knn::data_handling::LabelColumn;
use athlete_knn::io::AthleteReaderConfig;

use crate::util::{delimiter_for, validate_tsv_or_csv_file};

/// Everything a `predict` or `cross-validate` run needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Path to the athletes CSV (or TSV) file.
    pub data: String,
    pub knn: KnnConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            data: String::from("athletes.csv"),
            knn: KnnConfig::default(),
        }
    }
}

/// Load a run configuration from a JSON file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: RunConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl RunConfig {
    /// Load `config_path` (or start from defaults) and apply CLI overrides.
    pub fn from_arguments(config_path: Option<&Path>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_run_config(path)?,
            None => RunConfig::default(),
        };

        if let Some(data) = matches.get_one::<String>("data") {
            config.data = data.clone();
        }
        validate_tsv_or_csv_file(&config.data)?;

        if let Some(&k) = matches.get_one::<usize>("k") {
            config.knn.k = k;
        }

        if let Some(label) = matches.get_one::<String>("label") {
            config.knn.label = LabelColumn::from_str(label).map_err(anyhow::Error::msg)?;
        }

        if matches.get_flag("no_scale") {
            config.knn.scale_features = false;
        }

        if let Some(policy) = matches.get_one::<String>("degenerate") {
            config.knn.degenerate_columns = policy.parse().map_err(anyhow::Error::msg)?;
        }

        // only defined on the cross-validate subcommand
        if let Ok(Some(&sample)) = matches.try_get_one::<usize>("sample") {
            config.knn.sample = Some(sample);
        }
        if let Ok(Some(&seed)) = matches.try_get_one::<u64>("seed") {
            config.knn.seed = seed;
        }
        if matches!(matches.try_get_one::<bool>("parallel"), Ok(Some(&true))) {
            config.knn.parallel = true;
        }

        Ok(config)
    }

    pub fn reader_config(&self) -> AthleteReaderConfig {
        AthleteReaderConfig {
            delimiter: delimiter_for(&self.data),
            ..AthleteReaderConfig::default()
        }
    }
}
