use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use comrak::ComrakOptions;
use serde::Deserialize;

const CANDIDATE_NAMES: &[&str] = &[".supermd.toml", "supermd.toml"];

/// Markdown extensions enabled while parsing.
///
/// SuperMD documents are GFM at heart, so everything is on by default;
/// individual extensions can be switched off per project.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Extensions {
    /// GFM pipe tables
    pub table: bool,
    /// ~~struck~~ text
    pub strikethrough: bool,
    /// Bare URLs become links
    pub autolink: bool,
    /// Task list items - [ ] and - [x]
    pub tasklist: bool,
    /// Reference footnotes `[^1]`
    pub footnotes: bool,
    /// Leading `---` YAML block
    pub front_matter: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            table: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            footnotes: true,
            front_matter: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub extensions: Extensions,
}

impl Config {
    /// Map the configuration onto comrak's parser options.
    pub fn comrak_options(&self) -> ComrakOptions {
        let mut options = ComrakOptions::default();
        options.extension.table = self.extensions.table;
        options.extension.strikethrough = self.extensions.strikethrough;
        options.extension.autolink = self.extensions.autolink;
        options.extension.tasklist = self.extensions.tasklist;
        options.extension.footnotes = self.extensions.footnotes;
        if self.extensions.front_matter {
            options.extension.front_matter_delimiter = Some("---".to_string());
        }
        options
    }
}

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

/// Every place a config file may live, nearest first: the candidate names
/// in each directory walking up from `start_dir`, then the XDG location
/// (`$XDG_CONFIG_HOME/supermd/config.toml`, falling back to
/// `~/.config/supermd/config.toml`).
fn candidate_paths(start_dir: &Path) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = start_dir
        .ancestors()
        .flat_map(|dir| CANDIDATE_NAMES.iter().map(move |name| dir.join(name)))
        .collect();

    let xdg_bases = [
        env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")),
    ];
    for base in xdg_bases.into_iter().flatten() {
        candidates.push(base.join("supermd").join("config.toml"));
    }

    candidates
}

/// Load the effective configuration.
///
/// An explicit path is authoritative: it must exist and parse. Otherwise
/// the first readable candidate from [`candidate_paths`] wins, and a
/// document with no config anywhere gets the built-in defaults.
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let s = fs::read_to_string(path)?;
        let config = parse_config_str(&s, path)?;
        log::info!("Loaded config from: {}", path.display());
        return Ok((config, Some(path.to_path_buf())));
    }

    for candidate in candidate_paths(start_dir) {
        let Ok(s) = fs::read_to_string(&candidate) else {
            continue;
        };
        match parse_config_str(&s, &candidate) {
            Ok(config) => {
                log::info!("Loaded config from: {}", candidate.display());
                return Ok((config, Some(candidate)));
            }
            Err(e) => log::warn!("Skipping config: {e}"),
        }
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let cfg = toml::from_str::<Config>("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.extensions.table);
    }

    #[test]
    fn extensions_can_be_disabled() {
        let toml_str = r#"
            [extensions]
            footnotes = false
            front-matter = false
        "#;
        let cfg = toml::from_str::<Config>(toml_str).unwrap();
        assert!(!cfg.extensions.footnotes);
        assert!(!cfg.extensions.front_matter);
        assert!(cfg.extensions.table);

        let options = cfg.comrak_options();
        assert!(!options.extension.footnotes);
        assert!(options.extension.front_matter_delimiter.is_none());
        assert!(options.extension.table);
    }

    #[test]
    fn invalid_toml_is_an_io_error() {
        let err = parse_config_str("extensions = 3", Path::new("x.toml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn candidates_walk_up_before_xdg() {
        let candidates = candidate_paths(Path::new("/work/site/docs"));
        let first: Vec<_> = candidates.iter().take(6).cloned().collect();
        assert_eq!(
            first,
            vec![
                PathBuf::from("/work/site/docs/.supermd.toml"),
                PathBuf::from("/work/site/docs/supermd.toml"),
                PathBuf::from("/work/site/.supermd.toml"),
                PathBuf::from("/work/site/supermd.toml"),
                PathBuf::from("/work/.supermd.toml"),
                PathBuf::from("/work/supermd.toml"),
            ]
        );
    }

    #[test]
    fn load_prefers_the_nearest_project_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join("supermd.toml"),
            "[extensions]\ntable = false\n",
        )
        .unwrap();
        let near = dir.path().join("a").join(".supermd.toml");
        fs::write(&near, "[extensions]\nfootnotes = false\n").unwrap();

        let (cfg, path) = load(None, &nested).unwrap();
        assert!(!cfg.extensions.footnotes);
        assert!(cfg.extensions.table);
        assert_eq!(path, Some(near));
    }

    #[test]
    fn explicit_config_must_parse() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "extensions = 3").unwrap();
        assert!(load(Some(&path), dir.path()).is_err());
    }
}
