#[macro_use]
pub mod plugins;
pub mod message;
pub mod dispatcher;
pub mod server;
pub mod i18n;

pub use message::*;
pub use dispatcher::*;

use crate::mtg::HandConfiguration;

fn default_plugins() -> Vec<String> {
    ["hand", "pulse", "name_correction"].iter().map(|plugin| plugin.to_string()).collect()
}

set_configuration! {
    /// Messages starting with this are commands.
    command_prefix: String = "!".to_string(),
    plugins: Vec<String> = default_plugins(),
    hand: HandConfiguration = HandConfiguration::default()
}
