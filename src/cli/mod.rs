use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "component_forge", version, about = "Prompt-to-component HTTP service with template fallback")]
pub struct Args {
    /// TOML config file; defaults apply when omitted.
    #[arg(long)]
    pub config: Option<String>,

    /// Overrides `bind` from the config file.
    #[arg(long)]
    pub bind: Option<String>,

    /// Overrides `database` from the config file.
    #[arg(long)]
    pub database: Option<String>,

    #[arg(long, default_value_t = false)]
    pub save_exchanges: bool,

    /// -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_and_verbosity() {
        let args = Args::parse_from([
            "component_forge",
            "--config",
            "forge.toml",
            "--bind",
            "0.0.0.0:9000",
            "--save-exchanges",
            "-vv",
        ]);
        assert_eq!(args.config.as_deref(), Some("forge.toml"));
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000"));
        assert!(args.database.is_none());
        assert!(args.save_exchanges);
        assert_eq!(args.verbose, 2);
    }
}
