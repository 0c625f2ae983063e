use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn parse_migrate_dir() {
    let cli = Cli::try_parse_from(["sdm", "--database", "app.duckdb", "migrate", "-d", "db/migrations"])
        .unwrap();
    assert_eq!(cli.global.database.as_deref(), Some("app.duckdb"));
    match cli.command {
        Commands::Migrate(args) => {
            assert_eq!(args.source.dir, Some(PathBuf::from("db/migrations")));
            assert!(args.source.manifest.is_none());
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn parse_migrate_resources_with_table() {
    let cli = Cli::try_parse_from([
        "sdm",
        "migrate",
        "--manifest",
        "migrations",
        "--resource-root",
        "assets",
        "--table",
        "schema_history",
    ])
    .unwrap();
    assert_eq!(cli.global.table.as_deref(), Some("schema_history"));
    match cli.command {
        Commands::Migrate(args) => {
            assert_eq!(args.source.manifest.as_deref(), Some("migrations"));
            assert_eq!(args.source.resource_root, Some(PathBuf::from("assets")));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn migrate_requires_a_source() {
    assert!(Cli::try_parse_from(["sdm", "migrate"]).is_err());
}

#[test]
fn dir_and_manifest_conflict() {
    assert!(Cli::try_parse_from(["sdm", "migrate", "-d", "a", "-m", "b"]).is_err());
}

#[test]
fn parse_split_json() {
    let cli = Cli::try_parse_from(["sdm", "split", "001.sql", "-o", "json"]).unwrap();
    match cli.command {
        Commands::Split(args) => {
            assert_eq!(args.file, PathBuf::from("001.sql"));
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("unexpected command {other:?}"),
    }
}
