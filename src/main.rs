use anyhow::Result;
use appdeps::installer::{Options, bootstrap};
use clap::Parser;
use std::path::PathBuf;

/// appdeps - application dependency bootstrapper
///
/// Detects the operating system and installs Python and FFmpeg next to the
/// application when they are not already available.
///
/// Download URLs can be replaced with the APPDEPS_PYTHON_URL and
/// APPDEPS_FFMPEG_URL environment variables.
#[derive(Parser, Debug)]
#[command(author, version = env!("APPDEPS_VERSION"), about)]
struct Cli {
    /// Install root directory (defaults to App/embedded; also via APPDEPS_ROOT)
    #[arg(long = "root", short = 'r', env = "APPDEPS_ROOT", value_name = "PATH")]
    pub install_root: Option<PathBuf>,

    /// Treat this string as the system name instead of detecting it
    #[arg(long = "os", env = "APPDEPS_OS", value_name = "NAME")]
    pub os: Option<String>,

    /// Install even if the tools are already available
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = appdeps::runtime::RealRuntime;

    let options = Options {
        force: cli.force,
        os_override: cli.os,
        report: cli.report,
    };
    bootstrap(runtime, cli.install_root, options).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_arguments() {
        let cli = Cli::try_parse_from(["appdeps"]).unwrap();
        assert!(!cli.force);
        assert_eq!(cli.report, None);
    }

    #[test]
    fn test_cli_root_parsing() {
        let cli = Cli::try_parse_from(["appdeps", "--root", "/tmp/deps"]).unwrap();
        assert_eq!(cli.install_root, Some(PathBuf::from("/tmp/deps")));

        let cli = Cli::try_parse_from(["appdeps", "-r", "/tmp/other"]).unwrap();
        assert_eq!(cli.install_root, Some(PathBuf::from("/tmp/other")));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "appdeps",
            "--os",
            "Windows",
            "-f",
            "--report",
            "summary.json",
        ])
        .unwrap();
        assert_eq!(cli.os.as_deref(), Some("Windows"));
        assert!(cli.force);
        assert_eq!(cli.report, Some(PathBuf::from("summary.json")));
    }

    #[test]
    fn test_cli_rejects_positional_arguments() {
        let result = Cli::try_parse_from(["appdeps", "ffmpeg"]);
        assert!(result.is_err());
    }
}
