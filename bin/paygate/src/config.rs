//! Figment-based configuration loading.
//!
//! Configuration priority (highest wins):
//! 1. CLI arguments (applied after Figment load)
//! 2. Config file (TOML)
//! 3. Environment variables (`PAYGATE_` prefix, `__` between sections)
//! 4. Defaults

use std::path::Path;

use eyre::{Result, WrapErr};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use paygate_core::MeteringArgs;
use serde::{Deserialize, Serialize};

use crate::cli::DemoArgs;

const DEFAULT_CALLS: u64 = 10;
const DEFAULT_PRICE: u64 = 1;
const DEFAULT_FUNDING: u64 = 100;

/// Complete demo configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PaygateConfig {
    /// Batching and funding-warning settings.
    pub(crate) metering: MeteringArgs,

    /// Demo workload and ledger setup.
    pub(crate) demo: DemoConfig,
}

/// Workload run by the `demo` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DemoConfig {
    /// Number of greetings requested.
    pub(crate) calls: u64,
    /// Price charged per greeting.
    pub(crate) price: u64,
    /// Initial client funding.
    pub(crate) funding: u64,
    /// Whether the client holds a valid subscription.
    pub(crate) subscription: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            calls: DEFAULT_CALLS,
            price: DEFAULT_PRICE,
            funding: DEFAULT_FUNDING,
            subscription: false,
        }
    }
}

impl PaygateConfig {
    /// Load configuration from defaults, environment, and config file.
    /// CLI overrides should be applied separately after loading.
    pub(crate) fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(PaygateConfig::default()))
            .merge(Env::prefixed("PAYGATE_").split("__"));

        if let Some(path) = config_path {
            eyre::ensure!(path.exists(), "config file not found: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment.extract().wrap_err("Failed to load configuration")
    }

    /// Apply values given explicitly on the command line.
    ///
    /// Only flags that were passed replace loaded values; everything else
    /// keeps what the file, environment or defaults provided.
    pub(crate) fn with_overrides(mut self, args: &DemoArgs) -> Self {
        if let Some(calls) = args.calls {
            self.demo.calls = calls;
        }
        if let Some(price) = args.price {
            self.demo.price = price;
        }
        if let Some(funding) = args.funding {
            self.demo.funding = funding;
        }
        if let Some(subscription) = args.subscription {
            self.demo.subscription = subscription;
        }
        self.metering = self.metering.merged_with(&args.metering);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paygate_api::{BatchMode, MeteringConfig};
    use paygate_core::BatchModeArg;
    use std::fs;
    use tempfile::TempDir;

    fn demo_args() -> DemoArgs {
        DemoArgs {
            config: None,
            calls: None,
            price: None,
            funding: None,
            subscription: None,
            settle: false,
            metering: MeteringArgs::default(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = PaygateConfig::default();

        assert_eq!(config.demo.calls, DEFAULT_CALLS);
        assert_eq!(config.demo.funding, DEFAULT_FUNDING);
        assert_eq!(config.metering.mode(), BatchMode::Immediate);
        assert!(config.metering.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config_path = temp_dir.path().join("paygate.toml");

        fs::write(
            &config_path,
            r#"
[metering]
mode = "sampled"
sample_probability = 0.5
sample_seed = 42

[demo]
calls = 3
funding = 7
"#,
        )
        .expect("write config");

        let config = PaygateConfig::load(Some(&config_path)).expect("load");

        assert_eq!(config.metering.mode(), BatchMode::Sampled);
        assert_eq!(config.metering.sample_probability(), 0.5);
        assert_eq!(config.metering.sample_seed(), Some(42));
        assert_eq!(config.demo.calls, 3);
        assert_eq!(config.demo.funding, 7);
        assert_eq!(config.demo.price, DEFAULT_PRICE);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().expect("temp dir");

        assert!(PaygateConfig::load(Some(&temp_dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = PaygateConfig {
            demo: DemoConfig {
                calls: 3,
                price: 5,
                ..Default::default()
            },
            ..Default::default()
        };
        let args = DemoArgs {
            calls: Some(8),
            subscription: Some(true),
            ..demo_args()
        };

        let config = file.with_overrides(&args);

        assert_eq!(config.demo.calls, 8);
        assert_eq!(config.demo.price, 5);
        assert!(config.demo.subscription);
    }

    #[test]
    fn test_subscription_from_file_can_be_revoked() {
        let mut file = PaygateConfig::default();
        file.demo.subscription = true;

        let config = file.clone().with_overrides(&demo_args());
        assert!(config.demo.subscription);

        let args = DemoArgs {
            subscription: Some(false),
            ..demo_args()
        };
        assert!(!file.with_overrides(&args).demo.subscription);
    }

    #[test]
    fn test_metering_flags_override_file_field_by_field() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config_path = temp_dir.path().join("paygate.toml");
        fs::write(
            &config_path,
            r#"
[metering]
mode = "sampled"
sample_probability = 0.5
"#,
        )
        .expect("write config");
        let file = PaygateConfig::load(Some(&config_path)).expect("load");

        let untouched = file.clone().with_overrides(&demo_args());
        assert_eq!(untouched.metering, file.metering);

        let args = DemoArgs {
            metering: MeteringArgs {
                sample_seed: Some(3),
                ..Default::default()
            },
            ..demo_args()
        };
        let config = file.clone().with_overrides(&args);
        assert_eq!(config.metering.mode(), BatchMode::Sampled);
        assert_eq!(config.metering.sample_probability(), 0.5);
        assert_eq!(config.metering.sample_seed(), Some(3));
        assert!(config.metering.validate().is_ok());

        let args = DemoArgs {
            metering: MeteringArgs {
                mode: Some(BatchModeArg::Immediate),
                ..Default::default()
            },
            ..demo_args()
        };
        let config = file.with_overrides(&args);
        assert_eq!(config.metering.mode(), BatchMode::Immediate);
        assert!(config.metering.validate().is_ok());
    }
}
