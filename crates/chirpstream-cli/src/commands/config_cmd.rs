//! Config inspection commands.

use crate::cli::{ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(cmd: ConfigCommand, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        ConfigCommand::Path => {
            println!("{}", chirpstream_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = chirpstream_config::load_config_or_default();
            let active = chirpstream_config::active_profile_name(global.profile.as_deref(), &cfg);
            println!("# active profile: {active}");
            print!("{}", toml::to_string_pretty(&cfg)?);
            Ok(())
        }
    }
}
