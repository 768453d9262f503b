//! Command line definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use templer_context::parse_assignment;

/// templer - render templates from environment variables and YAML context files
#[derive(Parser, Debug)]
#[command(name = "templer")]
#[command(version, about = "Render template files with the power of Jinja2")]
#[command(long_about = r#"
Render template files with the power of Jinja2.

Variables come from the process environment and from YAML context files with
up to three sections:

  static    literal values
  dynamic   literal values, rendered as a template first with -d
  defaults  fallbacks for environment variables (plain, choice, list, variation)

Inside templates every variable is available by name, and additionally under
env.*, static.*, dynamic.* and defaults.*.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Context error
  4 - Template error
"#)]
pub struct Cli {
    /// Context file, or directory of *.yml/*.yaml files (repeatable)
    #[arg(short = 'c', long = "contextfile", value_name = "PATH")]
    pub contextfiles: Vec<PathBuf>,

    /// Render the context files like the templates before parsing them
    #[arg(short = 'd', long, env = "TEMPLER_DYNAMIC_CONTEXTFILES")]
    pub dynamic_contextfiles: bool,

    /// Delete the templates after rendering
    #[arg(short = 'r', long, env = "TEMPLER_REMOVE_TEMPLATES")]
    pub remove_templates: bool,

    /// Overwrite existing files
    #[arg(short = 'f', long = "force", env = "TEMPLER_FORCE")]
    pub force_overwrite: bool,

    /// Render undefined variables as empty values instead of failing
    #[arg(short = 'i', long, env = "TEMPLER_IGNORE_UNDEFINED_VARIABLES")]
    pub ignore_undefined_variables: bool,

    /// File mode for rendered files, in octal (e.g. 0640)
    #[arg(short = 'm', long = "mode", value_name = "MODE", value_parser = parse_file_mode)]
    pub file_mode: Option<u32>,

    /// Fail when an environment variable does not match the type of its default
    #[arg(short = 't', long, env = "TEMPLER_DEFAULTS_TYPE_CHECK")]
    pub defaults_type_check: bool,

    /// Extra variable, treated like an environment variable (repeatable)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub defines: Vec<(String, String)>,

    /// Enable verbose output (-vv for debug output)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Template file, or directory of *.j2/*.jinja2 files
    #[arg(required = true, value_name = "TEMPLATE")]
    pub templates: Vec<PathBuf>,

    /// Destination for the rendered file(s)
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,
}

/// Parse an octal file mode such as `644` or `0o640`.
pub fn parse_file_mode(input: &str) -> Result<u32, String> {
    let digits = input.trim_start_matches("0o");
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(format!("invalid octal file mode '{}'", input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_file_mode() {
        assert_eq!(parse_file_mode("0640"), Ok(0o640));
        assert_eq!(parse_file_mode("755"), Ok(0o755));
        assert_eq!(parse_file_mode("0o600"), Ok(0o600));
        assert!(parse_file_mode("999").is_err());
        assert!(parse_file_mode("rw").is_err());
        assert!(parse_file_mode("77777").is_err());
    }

    #[test]
    fn test_templates_then_destination() {
        let cli = Cli::try_parse_from([
            "templer", "-c", "ctx.yml", "-vv", "-D", "A=1", "a.j2", "b.j2", "out",
        ])
        .unwrap();
        assert_eq!(cli.templates, vec![PathBuf::from("a.j2"), PathBuf::from("b.j2")]);
        assert_eq!(cli.destination, PathBuf::from("out"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.defines, vec![("A".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_destination_required() {
        assert!(Cli::try_parse_from(["templer", "only.j2"]).is_err());
    }
}
