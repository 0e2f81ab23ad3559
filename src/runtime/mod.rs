use std::env;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::catalog::{CatalogStore, SqliteCatalog};
use crate::config;
use crate::library::{LibraryWalker, paths};
use crate::sync::{CancelToken, FileOutcome, SyncEngine};

mod progress;
mod settings;
mod startup;

use progress::Progress;

/// Command line: `musicdex [--list] [LIBRARY_ROOT]`.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    list: bool,
    root: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    for arg in args {
        match arg.as_str() {
            "--list" | "-l" => parsed.list = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option {flag}"));
            }
            _ if parsed.root.is_some() => {
                return Err(format!("unexpected argument {arg}"));
            }
            _ => parsed.root = Some(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

fn library_root(arg: Option<PathBuf>, settings: &config::LibrarySettings) -> io::Result<PathBuf> {
    let root = match arg.or_else(|| settings.root.clone()) {
        Some(root) => root,
        None => env::current_dir()?,
    };
    root.canonicalize()
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args(env::args().skip(1))?;
    let (settings, config_problem) = settings::load_settings();
    startup::init_logging(&settings.log);
    if let Some(problem) = config_problem {
        warn!("{problem}; using defaults");
    }

    let root = library_root(args.root, &settings.library)?;
    let catalog_path = settings
        .catalog
        .resolved_path()
        .ok_or("cannot determine catalog location; set catalog.path")?;
    let mut catalog = SqliteCatalog::open(&catalog_path)?;
    info!(catalog = %catalog_path.display(), "catalog opened");

    if args.list {
        return list(&catalog, &root);
    }

    let registry = startup::build_registry(&settings.metadata)?;
    let cancel = CancelToken::new();
    startup::install_interrupt_handler(&cancel);

    let engine = SyncEngine::new(root, registry, LibraryWalker::new(settings.library.clone()))
        .with_cancel(cancel);

    let mut progress = Progress::new(io::stdout(), settings.log.progress);
    let report = engine.run(&mut catalog, &mut |path: &Path, outcome: FileOutcome| {
        progress.observe(path, outcome)
    })?;
    progress.finish()?;

    println!("{report}");
    Ok(())
}

fn list(catalog: &SqliteCatalog, root: &Path) -> Result<(), Box<dyn Error>> {
    for track in catalog.tracks()? {
        println!(
            "{}\t{}",
            track.display(),
            paths::resolve(root, &track.path).display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{EnvGuard, env_lock};

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_root_and_list_flag() {
        assert_eq!(args(&[]).unwrap(), Args::default());
        assert_eq!(
            args(&["/music"]).unwrap(),
            Args {
                list: false,
                root: Some(PathBuf::from("/music")),
            }
        );
        assert_eq!(
            args(&["--list", "/music"]).unwrap(),
            Args {
                list: true,
                root: Some(PathBuf::from("/music")),
            }
        );
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["/a", "/b"]).is_err());
    }

    #[test]
    fn root_argument_wins_over_settings() {
        let from_arg = tempfile::tempdir().unwrap();
        let from_settings = tempfile::tempdir().unwrap();
        let settings = config::LibrarySettings {
            root: Some(from_settings.path().to_path_buf()),
            ..config::LibrarySettings::default()
        };

        let root = library_root(Some(from_arg.path().to_path_buf()), &settings).unwrap();
        assert_eq!(root, from_arg.path().canonicalize().unwrap());

        let root = library_root(None, &settings).unwrap();
        assert_eq!(root, from_settings.path().canonicalize().unwrap());
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(library_root(Some(missing), &config::LibrarySettings::default()).is_err());
    }

    #[test]
    fn bad_config_falls_back_to_defaults_with_reason() {
        let _lock = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(&cfg_path, "[metadata]\nextensions = [\"mp3\"]\n").unwrap();
        let _g1 = EnvGuard::set("MUSICDEX_CONFIG_PATH", cfg_path.to_str().unwrap());

        let (loaded, problem) = settings::load_settings();
        assert!(problem.unwrap().starts_with("invalid config:"));
        assert_eq!(loaded.metadata.extensions.len(), 4);

        std::fs::write(&cfg_path, "[log]\nprogress = false\n").unwrap();
        let (loaded, problem) = settings::load_settings();
        assert_eq!(problem, None);
        assert!(!loaded.log.progress);

        std::fs::write(&cfg_path, "[log\nprogress = ").unwrap();
        let (_, problem) = settings::load_settings();
        assert!(problem.unwrap().starts_with("failed to load config:"));
    }

    #[test]
    fn registry_covers_configured_extensions() {
        let registry = startup::build_registry(&config::MetadataSettings::default()).unwrap();
        assert_eq!(registry.extensions(), vec![".flac", ".m4a", ".mp3", ".ogg"]);

        let dup = config::MetadataSettings {
            extensions: vec![".mp3".into(), ".mp3".into()],
        };
        assert!(startup::build_registry(&dup).is_err());
    }
}
