//! Validate dict LDAP map settings and show what they compile to.
//!
//! ```text
//! dict-ldap-check -d /etc/dovecot            # check, summary per map
//! dict-ldap-check -d /etc/dovecot --json     # full settings as JSON
//! dict-ldap-check show users
//! dict-ldap-check gen --name quota -o map.toml
//! ```

use std::process::ExitCode;

use clap::Parser;
use dict_ldap_settings::{CheckArgs, DictAction, DictLdapError, SettingsLoader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dict-ldap-check", version, about)]
struct Cli {
    /// Print the loaded settings as JSON instead of a summary (check only).
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    args: CheckArgs,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DictLdapError> {
    let loader = cli
        .args
        .configure(SettingsLoader::new().app_name("dict-ldap"));
    let action = cli.args.into_action();

    if cli.json && action == DictAction::Check {
        let settings = loader.load()?;
        let json = serde_json::to_string_pretty(&settings).map_err(|e| {
            DictLdapError::InvalidValue {
                key: "<settings>".into(),
                reason: e.to_string(),
            }
        })?;
        println!("{json}");
        return Ok(());
    }

    loader.handle_and_print(&action)
}

fn report(err: &DictLdapError) {
    match err {
        DictLdapError::UnknownKeys(keys) => {
            for key in keys {
                eprintln!("error: {key}");
            }
        }
        other => eprintln!("error: {other}"),
    }
}
