use clap::Parser;
use objectify::{Cli, Objectify, ObjectifyError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    objectify::logging::init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let objectify = match Objectify::from_cli(&cli) {
        Ok(objectify) => objectify,
        Err(e) => {
            print_startup_error(&e);
            return startup_exit_code(&e);
        }
    };

    match objectify.run_batch() {
        Ok(report) => {
            objectify.output_formatter().print_batch_report(&report);
            // Files that could not be converted are reported, not fatal.
            0
        }
        Err(e) => {
            objectify.handle_error(&e);
            startup_exit_code(&e)
        }
    }
}

fn startup_exit_code(error: &ObjectifyError) -> i32 {
    match error {
        ObjectifyError::Config { .. } | ObjectifyError::InvalidIdentifier { .. } => 2,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "objectify.toml".to_string());

    match Objectify::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  objectify --config {}", config_path);
            println!("\nEdit the service list and base directory for your project.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &ObjectifyError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            "objectify",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[services]"));
    }

    #[test]
    fn test_startup_exit_codes() {
        let config_error = ObjectifyError::Config {
            message: "bad".to_string(),
        };
        assert_eq!(startup_exit_code(&config_error), 2);

        let io_error = ObjectifyError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert_eq!(startup_exit_code(&io_error), 1);
    }
}
