use log::warn;
use logging::LoggingConfig;
use loot::LootConfig;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use std::path::PathBuf;
use std::{env, fs, path::Path, sync::LazyLock};

pub mod logging;
pub mod loot;

const CONFIG_ROOT_FOLDER: &str = "config/";

pub static BASIC_CONFIG: LazyLock<BasicConfiguration> = LazyLock::new(|| {
    let exec_dir = env::current_dir().unwrap_or_default();
    BasicConfiguration::load(&exec_dir)
});

#[cfg(not(feature = "test_helper"))]
static ADVANCED_CONFIG: LazyLock<AdvancedConfiguration> = LazyLock::new(|| {
    let exec_dir = env::current_dir().unwrap_or_default();
    AdvancedConfiguration::load(&exec_dir)
});

#[cfg(not(feature = "test_helper"))]
pub fn advanced_config() -> &'static AdvancedConfiguration {
    &ADVANCED_CONFIG
}

#[cfg(feature = "test_helper")]
use std::cell::RefCell;

// Leaks one value per override; only ever enabled for tests.
#[cfg(feature = "test_helper")]
thread_local! {
    // Thread local so tests running in parallel don't see each other's overrides
    static ADVANCED_CONFIG: RefCell<&'static AdvancedConfiguration> = RefCell::new(Box::leak(Box::new(AdvancedConfiguration::default())));
}

#[cfg(feature = "test_helper")]
pub fn override_config_for_testing(config: AdvancedConfiguration) {
    ADVANCED_CONFIG.with_borrow_mut(|ref_config| {
        *ref_config = Box::leak(Box::new(config));
    });
}

#[cfg(feature = "test_helper")]
pub fn advanced_config() -> &'static AdvancedConfiguration {
    ADVANCED_CONFIG.with_borrow(|config| *config)
}

/// Tunables of the loot engine itself.
///
/// Important: the defaults should behave like vanilla.
#[derive(Deserialize, Serialize, Default, Clone, Debug)]
#[serde(default)]
pub struct AdvancedConfiguration {
    pub logging: LoggingConfig,
    pub loot: LootConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BasicConfiguration {
    /// Root of the data pack, the folder containing `data/`.
    pub data_path: PathBuf,
    /// The world seed random sequences are derived from.
    pub level_seed: i64,
    /// Luck applied when the tool is not given an explicit value.
    pub default_luck: f32,
}

impl Default for BasicConfiguration {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./datapack"),
            level_seed: 0,
            default_luck: 0.0,
        }
    }
}

trait LoadConfiguration {
    fn load(exec_dir: &Path) -> Self
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config_dir = exec_dir.join(CONFIG_ROOT_FOLDER);
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            if let Err(err) = fs::create_dir(&config_dir) {
                warn!("Couldn't create config folder {:?}: {}", &config_dir, err);
            }
        }
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content = fs::read_to_string(&path)
                .unwrap_or_else(|_| panic!("Couldn't read configuration file at {:?}", &path));

            toml::from_str(&file_content).unwrap_or_else(|err| {
                panic!(
                    "Couldn't parse config at {:?}. Reason: {}. This is probably caused by a config update; just delete the old config and start again",
                    &path,
                    err.message()
                )
            })
        } else {
            let content = Self::default();

            match toml::to_string(&content) {
                Ok(serialized) => {
                    if let Err(err) = fs::write(&path, serialized) {
                        warn!(
                            "Couldn't write default config to {:?}. Reason: {}",
                            &path, err
                        );
                    }
                }
                Err(err) => warn!("Couldn't serialize default config: {}", err),
            }

            content
        };

        config.validate();
        config
    }

    fn get_path() -> &'static Path;

    fn validate(&self);
}

impl LoadConfiguration for AdvancedConfiguration {
    fn get_path() -> &'static Path {
        Path::new("features.toml")
    }

    fn validate(&self) {
        self.loot.validate();
    }
}

impl LoadConfiguration for BasicConfiguration {
    fn get_path() -> &'static Path {
        Path::new("configuration.toml")
    }

    fn validate(&self) {
        assert!(
            self.default_luck.is_finite(),
            "Default luck must be a finite number"
        );
    }
}
