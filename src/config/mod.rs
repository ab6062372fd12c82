/// Configuration system for cliprelay
///
/// Config structures are declared once with embedded defaults through
/// `config_struct!`, loaded from a TOML file at startup, and read through
/// `with_config`. A missing file means every default applies.
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{ClientConfig, Config, HubConfig, LoggingConfig, WebserverConfig};
pub use utils::{get_config_clone, load_config, load_config_from_path, parse_config, with_config};
