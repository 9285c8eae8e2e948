//! Shared plumbing for the BKB Explorer command-line clients.
//!
//! Every binary takes the same [`SessionArgs`], logs to stderr through
//! [`init_tracing`] and keeps stdout for its JSON or report output.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bkb_engine::{discover_domains, read_index, DomainLoader, Explorer, ExplorerConfig, FsSource};
use bkb_model::DomainIndex;
use clap::Args;
use tracing_subscriber::EnvFilter;

/// Options common to every client.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Directory holding domain folders and, optionally, `domains.json`.
    #[arg(long, default_value = "output")]
    pub root: PathBuf,

    /// Domain name or slash-separated path. Defaults to the first domain.
    #[arg(long)]
    pub domain: Option<String>,

    /// View to select after loading.
    #[arg(long)]
    pub view: Option<String>,

    /// Toggle to switch off (repeatable).
    #[arg(long, value_name = "TOGGLE")]
    pub hide: Vec<String>,

    /// Toggle to switch on (repeatable).
    #[arg(long, value_name = "TOGGLE")]
    pub show: Vec<String>,

    /// TOML file with initial toggles and view.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SessionArgs {
    /// Reads the config file, if any, and applies the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a toggle name is unknown.
    pub fn config(&self) -> Result<ExplorerConfig> {
        let mut config = match &self.config {
            Some(path) => ExplorerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExplorerConfig::default(),
        };
        config
            .apply_overrides(self.hide.as_slice(), self.show.as_slice(), self.view.as_deref())
            .context("Invalid toggle override")?;
        Ok(config)
    }

    /// Reads the hierarchy index under the root, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if an index file exists but is unreadable.
    pub fn index(&self) -> Result<Option<DomainIndex>> {
        read_index(&self.root)
            .with_context(|| format!("Failed to read domain index under {}", self.root.display()))
    }

    /// Lists the loadable domain paths: from the index when there is one,
    /// otherwise by scanning the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    pub fn domain_paths(&self) -> Result<Vec<String>> {
        Ok(match self.index()? {
            Some(index) => index
                .domains()
                .into_iter()
                .map(|(_, entry)| entry.path.clone())
                .collect(),
            None => discover_domains(&self.root),
        })
    }

    /// Resolves `--domain` (a display name or a path) to a load path.
    ///
    /// # Errors
    ///
    /// Returns an error if no domain is given and none can be found.
    pub fn domain_path(&self) -> Result<String> {
        let index = self.index()?;
        if let Some(wanted) = &self.domain {
            let resolved = index
                .as_ref()
                .and_then(|i| i.resolve_domain_path(wanted, None))
                .filter(|p| !p.is_empty());
            return Ok(resolved.unwrap_or(wanted.as_str()).to_string());
        }
        let first = match &index {
            Some(index) => index.find_first_domain().map(str::to_string),
            None => discover_domains(&self.root).into_iter().next(),
        };
        match first {
            Some(path) => Ok(path),
            None => bail!("No domains found under {}", self.root.display()),
        }
    }

    /// Loads the selected domain into a configured session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the domain cannot
    /// be loaded.
    pub fn open(&self) -> Result<Explorer> {
        let config = self.config()?;
        let domain_path = self.domain_path()?;
        let loader = DomainLoader::new(FsSource::new(&self.root));
        let mut explorer = Explorer::new(&config);
        explorer
            .load(&loader, &domain_path)
            .with_context(|| format!("Failed to load domain {domain_path}"))?;
        if config.view.is_some() {
            explorer.select_view(config.view.as_deref());
        }
        Ok(explorer)
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the default
/// `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Writes `value` to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        session: SessionArgs,
    }

    fn args(root: &std::path::Path, extra: &[&str]) -> SessionArgs {
        let mut argv = vec!["test", "--root", root.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv).session
    }

    fn write_domain(root: &std::path::Path, path: &str, payload: &str) {
        let dir = root.join(path);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("data.json"), payload).unwrap();
    }

    #[test]
    fn first_discovered_domain_is_the_default() {
        let dir = tempfile::tempdir().unwrap();
        write_domain(dir.path(), "B/Second", r#"{"concepts": []}"#);
        write_domain(dir.path(), "A/First", r#"{"concepts": [{"name": "Order"}]}"#);

        let session = args(dir.path(), &[]);
        assert_eq!(session.domain_paths().unwrap(), ["A/First", "B/Second"]);
        let explorer = session.open().unwrap();
        assert_eq!(explorer.domain_path(), Some("A/First"));
        assert!(explorer.snapshot().shows_node("Order"));
    }

    #[test]
    fn index_names_resolve_and_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        write_domain(
            dir.path(),
            "RBCZ/Trading",
            r#"{"concepts": [{"name": "Order", "sources": [{"file": "Orders.cs"}]}]}"#,
        );
        fs::write(
            dir.path().join("domains.json"),
            r#"{"hierarchy": {"RBCZ": {"type": "folder", "path": "RBCZ", "children": {
                "Trading": {"type": "domain", "path": "RBCZ/Trading"}}}}}"#,
        )
        .unwrap();

        let session = args(
            dir.path(),
            &["--domain", "Trading", "--view", "Orders", "--hide", "orphans", "--show", "transitive"],
        );
        assert_eq!(session.domain_path().unwrap(), "RBCZ/Trading");
        let explorer = session.open().unwrap();
        assert_eq!(explorer.active_view(), Some("Orders"));
        assert!(!explorer.toggles().orphans);
        assert!(explorer.toggles().transitive);
    }

    #[test]
    fn bad_toggle_and_empty_root_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(args(dir.path(), &["--hide", "colour"]).config().is_err());
        let err = args(dir.path(), &[]).domain_path().unwrap_err();
        assert!(err.to_string().starts_with("No domains found"));
    }
}
