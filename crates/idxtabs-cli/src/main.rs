#![deny(unsafe_code)]

//! idxtabs CLI: query documentation index section tables.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use idxtabs_config::AppConfig;
use idxtabs_core::{ArtifactFormat, JsArtifact, SectionAvailabilityTable};
use tracing::{debug, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, reload};

/// Report which index tabs of the generated documentation have content.
#[derive(Parser)]
#[command(name = "idxtabs", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "idxtabs.toml")]
    config: PathBuf,

    /// Artifact to load instead of the configured one.
    #[arg(short, long)]
    artifact: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(QueryCommand),

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Commands answered from the loaded table.
#[derive(Subcommand)]
enum QueryCommand {
    /// Print whether a category has entries under a bucket.
    Check {
        /// Category name, e.g. "Functions".
        category: String,
        /// Bucket label: "Symbols", "Numbers" or "A".."Z".
        bucket: String,
    },

    /// List every bucket of a category with its flag.
    Buckets {
        /// Category name.
        category: String,
        /// Only list buckets that have content.
        #[arg(long)]
        active: bool,
    },

    /// List categories in display order.
    Categories,

    /// Print the loaded table as a searchdata.js artifact.
    Render {
        /// Emit pretty-printed JSON instead.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Start from the default level so config loading is logged, then switch
    // to the configured level once it is known.
    let (filter, filter_handle) =
        reload::Layer::new(env_filter(log_filter(cli.verbose, &AppConfig::default())));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli.config).await?;
    filter_handle.reload(env_filter(log_filter(cli.verbose, &config)))?;

    match &cli.command {
        Commands::Config { show } => {
            cmd_config(&cli.config, &config, *show, &mut std::io::stdout().lock())?
        }
        Commands::Query(command) => {
            let table = load_table(&cli, &config).await?;
            run(command, &table, &mut std::io::stdout().lock())?;
        }
    }

    Ok(())
}

/// Filter directive: `-v` flags override the configured level.
fn log_filter(verbose: u8, config: &AppConfig) -> &str {
    match verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    }
}

/// `RUST_LOG` wins over `directive` when set.
fn env_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

fn run(command: &QueryCommand, table: &SectionAvailabilityTable, out: &mut impl Write) -> Result<()> {
    match command {
        QueryCommand::Check { category, bucket } => {
            let available = table.is_available(category, bucket)?;
            writeln!(out, "{available}")?;
        }
        QueryCommand::Buckets { category, active } => {
            for (bucket, available) in table.buckets_for(category)? {
                if *active && !available {
                    continue;
                }
                writeln!(out, "{bucket}\t{available}")?;
            }
        }
        QueryCommand::Categories => {
            for category in table.categories() {
                writeln!(out, "{category}")?;
            }
        }
        QueryCommand::Render { json: true } => {
            serde_json::to_writer_pretty(&mut *out, table)?;
            writeln!(out)?;
        }
        QueryCommand::Render { json: false } => {
            writeln!(out, "{}", JsArtifact(table))?;
        }
    }
    Ok(())
}

fn cmd_config(
    config_path: &Path,
    config: &AppConfig,
    show: bool,
    out: &mut impl Write,
) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        writeln!(out, "{toml_str}")?;
    } else {
        writeln!(out, "Configuration at '{}' is valid.", config_path.display())?;
    }
    Ok(())
}

async fn load_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        AppConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))
    } else {
        debug!(path = %path.display(), "Config file not found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Pick the table source: `--artifact`, then `artifact.path`, then the built-in table.
async fn load_table(cli: &Cli, config: &AppConfig) -> Result<SectionAvailabilityTable> {
    let format: ArtifactFormat = config.artifact.format.parse()?;

    let path = match &cli.artifact {
        Some(path) => path.clone(),
        None => match config.artifact_path(&cli.config) {
            Some(path) if path.exists() => path,
            Some(path) => {
                warn!(
                    path = %path.display(),
                    "Configured artifact not found, using built-in table"
                );
                return Ok(SectionAvailabilityTable::builtin().clone());
            }
            None => {
                info!("No artifact configured, using built-in table");
                return Ok(SectionAvailabilityTable::builtin().clone());
            }
        },
    };

    info!(path = %path.display(), %format, "Loading artifact");
    idxtabs_core::load_artifact(&path, format)
        .await
        .with_context(|| format!("loading artifact {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use idxtabs_core::Bucket;
    use idxtabs_test_utils::artifact::{ArtifactBuilder, SHIPPED_ARTIFACT, TestArtifact};
    use idxtabs_test_utils::config::TestConfigBuilder;
    use pretty_assertions::assert_eq;

    fn run_to_string(command: QueryCommand, table: &SectionAvailabilityTable) -> String {
        let mut out = Vec::new();
        run(&command, table, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from(["idxtabs", "check", "Files", "J"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Query(QueryCommand::Check { ref category, ref bucket })
                if category == "Files" && bucket == "J"
        ));
        assert_eq!(cli.config, PathBuf::from("idxtabs.toml"));
    }

    #[test]
    fn test_parse_buckets_active() {
        let cli = Cli::try_parse_from(["idxtabs", "-vv", "buckets", "Classes", "--active"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Query(QueryCommand::Buckets { active: true, .. })
        ));
    }

    #[test]
    fn test_parse_config_command() {
        let cli = Cli::try_parse_from(["idxtabs", "config", "--show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { show: true }));
    }

    #[test]
    fn test_log_filter_prefers_verbose_flags() {
        let config = TestConfigBuilder::new().log_level("warn").build();
        assert_eq!(log_filter(0, &config), "warn");
        assert_eq!(log_filter(1, &config), "debug");
        assert_eq!(log_filter(3, &config), "trace");
        assert_eq!(log_filter(0, &AppConfig::default()), "info");
    }

    #[test]
    fn test_check_output() {
        let table = SectionAvailabilityTable::builtin();
        let out = run_to_string(
            QueryCommand::Check {
                category: "Files".to_string(),
                bucket: "J".to_string(),
            },
            table,
        );
        assert_eq!(out, "true\n");
    }

    #[test]
    fn test_run_reports_lookup_errors() {
        let table = SectionAvailabilityTable::builtin();
        let check = QueryCommand::Check {
            category: "Nonexistent".to_string(),
            bucket: "A".to_string(),
        };
        let mut out = Vec::new();
        assert!(run(&check, table, &mut out).is_err());
        assert!(out.is_empty());

        let buckets = QueryCommand::Buckets {
            category: "General".to_string(),
            active: false,
        };
        assert!(run(&buckets, table, &mut out).is_ok());
    }

    #[test]
    fn test_buckets_output() {
        let table = SectionAvailabilityTable::builtin();
        let all = run_to_string(
            QueryCommand::Buckets {
                category: "Files".to_string(),
                active: false,
            },
            table,
        );
        let lines: Vec<&str> = all.lines().collect();
        assert_eq!(lines.len(), Bucket::COUNT);
        assert_eq!(lines[0], "Symbols\tfalse");
        assert_eq!(lines[11], "J\ttrue");

        let active = run_to_string(
            QueryCommand::Buckets {
                category: "Files".to_string(),
                active: true,
            },
            table,
        );
        assert_eq!(active, "J\ttrue\nP\ttrue\nS\ttrue\nU\ttrue\n");
    }

    #[test]
    fn test_categories_output() {
        let out = run_to_string(QueryCommand::Categories, SectionAvailabilityTable::builtin());
        assert_eq!(out, "General\nVariables\nFunctions\nFiles\nClasses\n");
    }

    #[test]
    fn test_render_js_output() {
        let out = run_to_string(
            QueryCommand::Render { json: false },
            SectionAvailabilityTable::builtin(),
        );
        assert_eq!(out, format!("{SHIPPED_ARTIFACT}\n"));
    }

    #[test]
    fn test_render_json_output() {
        let out = run_to_string(
            QueryCommand::Render { json: true },
            SectionAvailabilityTable::builtin(),
        );
        let table: SectionAvailabilityTable = serde_json::from_str(&out).unwrap();
        assert_eq!(&table, SectionAvailabilityTable::builtin());
        assert!(out.starts_with("{\n  \"General\": {\n    \"Symbols\": true,"));
    }

    #[test]
    fn test_config_show_output() {
        let config = TestConfigBuilder::new()
            .artifact_path("html/searchdata.js")
            .log_level("debug")
            .build();
        let mut out = Vec::new();
        cmd_config(Path::new("idxtabs.toml"), &config, true, &mut out).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert_eq!(AppConfig::parse(&shown).unwrap(), config);

        let mut out = Vec::new();
        cmd_config(Path::new("idxtabs.toml"), &config, false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Configuration at 'idxtabs.toml' is valid.\n"
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_load_table_falls_back_to_builtin() {
        let cli = Cli::try_parse_from(["idxtabs", "-c", "/nonexistent/idxtabs.toml", "categories"])
            .unwrap();
        let config = AppConfig::parse(
            r#"
            [artifact]
            path = "missing/searchdata.js"
        "#,
        )
        .unwrap();
        let table = load_table(&cli, &config).await.unwrap();
        assert_eq!(&table, SectionAvailabilityTable::builtin());
    }

    #[tokio::test]
    async fn test_load_table_from_artifact_flag() {
        let json = serde_json::to_string(SectionAvailabilityTable::builtin()).unwrap();
        let artifact = TestArtifact::with_contents("searchdata.json", &json).await;

        let cli = Cli::try_parse_from([
            "idxtabs",
            "--artifact",
            artifact.path.to_str().unwrap(),
            "categories",
        ])
        .unwrap();
        let table = load_table(&cli, &AppConfig::default()).await.unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.is_available("Files", "J").unwrap(), true);
    }

    #[tokio::test]
    async fn test_load_table_from_config_relative_path() {
        let artifact = TestArtifact::with_contents(
            "searchdata.js",
            &ArtifactBuilder::new()
                .category("Namespaces", &[Bucket::I])
                .to_js(),
        )
        .await;
        let config_path = artifact.path.with_file_name("idxtabs.toml");
        let toml = TestConfigBuilder::new()
            .artifact_path("searchdata.js")
            .artifact_format("js")
            .to_toml();
        tokio::fs::write(&config_path, toml).await.unwrap();

        let cli = Cli::try_parse_from(["idxtabs", "-c", config_path.to_str().unwrap(), "categories"])
            .unwrap();
        let config = load_config(&cli.config).await.unwrap();
        let table = load_table(&cli, &config).await.unwrap();
        assert_eq!(table.categories().collect::<Vec<_>>(), vec!["Namespaces"]);
        assert_eq!(table.is_available("Namespaces", "I").unwrap(), true);
    }

    #[tokio::test]
    async fn test_load_table_rejects_broken_artifact() {
        let artifact = TestArtifact::with_contents(
            "searchdata.js",
            &ArtifactBuilder::new()
                .category("Files", &[Bucket::J])
                .without_bucket(Bucket::Z)
                .to_js(),
        )
        .await;
        let cli = Cli::try_parse_from([
            "idxtabs",
            "--artifact",
            artifact.path.to_str().unwrap(),
            "categories",
        ])
        .unwrap();
        let err = load_table(&cli, &AppConfig::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("no entry for bucket Z"));
    }
}
