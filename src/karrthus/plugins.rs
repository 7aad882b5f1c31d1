// ============================================================
//! * Plugin code format
// ------------------------------------------------------------
//! For plugin file, all karrthus plugins obey follow orders:
//! * Doc
//! * `use ...`
//! * `set_configuration!`
//! * `fn init()`
//! * other format functions
//! * `fn register_handlers()`
//! * other tool functions for handler content
// ============================================================

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::Dispatcher;

// Probed in this order, the first existing file wins.
const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

pub fn configuration_path() -> String {
    std::env::var("KARRTHUS_CONFIG_PATH").unwrap_or(".".to_string())
}

/// Load the configuration named `name` from the configuration directory.
pub fn load_configuration<T: DeserializeOwned>(name: &str) -> anyhow::Result<T> {
    load_configuration_from(Path::new(&configuration_path()), name)
}

/// Load `<name>.toml`, `<name>.yaml`, `<name>.yml` or `<name>.json` from `directory`.
/// Without any of them, an empty configuration is deserialized so serde defaults apply.
pub fn load_configuration_from<T: DeserializeOwned>(directory: &Path, name: &str) -> anyhow::Result<T> {
    for extension in EXTENSIONS.iter() {
        let path = directory.join(format!("{}.{}", name, extension));
        if !path.is_file() { continue; }
        let data = fs::read_to_string(&path)?;
        info!("Loading {} configuration from {}", name, path.display());
        return parse_configuration(extension, &data).map_err(|e| anyhow!("Invalid configuration {}: {}", path.display(), e));
    }
    debug!("No configuration file for {} in {}, using defaults.", name, directory.display());
    serde_json::from_str("{}").map_err(|e| anyhow!("Configuration {} has no defaults: {}", name, e))
}

fn parse_configuration<T: DeserializeOwned>(extension: &str, data: &str) -> anyhow::Result<T> {
    Ok(match extension {
        "toml" => toml::from_str(data)?,
        "yaml" | "yml" => serde_yaml::from_str(data)?,
        _ => serde_json::from_str(data)?
    })
}

/// Declare the configuration of current module.
///
/// Every field takes a default, so a missing file or a missing key never
/// stops the bot. The file name is the module file stem.
#[macro_export]
macro_rules! set_configuration {
    ($( $(#[$attr:meta])* $field:ident: $type:ty = $default:expr ),* $(,)?) => {
        #[derive(serde::Deserialize, Debug, Clone)]
        #[serde(default)]
        pub struct Configuration {
            $($(#[$attr])* pub $field: $type,)*
        }

        impl Default for Configuration {
            fn default() -> Self {
                Configuration { $($field: $default,)* }
            }
        }

        #[doc(hidden)]
        pub static CONFIGURATION: once_cell::sync::OnceCell<Configuration> = once_cell::sync::OnceCell::new();

        #[doc(hidden)]
        pub fn load_configuration() -> anyhow::Result<()> {
            let os_module_name = std::path::Path::new(file!()).file_stem().ok_or(anyhow!("Can not determine module name."))?;
            let module_name = os_module_name.to_str().ok_or(anyhow!("Can not transform module name to utf-8"))?;
            CONFIGURATION.set(crate::karrthus::plugins::load_configuration(module_name)?).map_err(|_| anyhow!("Configuration already set."))?;
            Ok(())
        }

        /// Get configuration for current module. Defaults if it was never loaded.
        #[inline]
        pub fn get_configuration() -> &'static Configuration {
            CONFIGURATION.get_or_init(Configuration::default)
        }
    };
}

pub mod hand;
pub mod pulse;
pub mod name_correction;

/// Load every enabled plugin into `dispatcher`.
pub fn init(dispatcher: &mut Dispatcher, plugins: &[String]) -> anyhow::Result<()> {
    for plugin in plugins.iter() {
        match plugin.as_str() {
            "hand"            => hand::init(dispatcher)?,
            "pulse"           => pulse::init(dispatcher)?,
            "name_correction" => name_correction::init(dispatcher)?,
            _ => {
                warn!("No plugin named {}", plugin);
                continue;
            }
        }
        info!("Plugin {} loaded.", plugin);
    }
    Ok(())
}
