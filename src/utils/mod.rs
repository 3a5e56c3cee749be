pub mod table {
    // Column width in chars. Wide (CJK) and combining characters still misalign.
    fn width(cell: &str) -> usize {
        cell.chars().count()
    }

    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn line(cells: &[&str], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, &w) in cells.iter().zip(widths) {
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(w.saturating_sub(width(cell))));
            s.push_str(" |");
        }
        s
    }

    /// Render an ASCII table. Missing cells render empty; extra cells are dropped.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let cols = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate() {
                *w = (*w).max(row.get(c).map_or(0, |s| width(s)));
            }
        }

        let rule = sep(&widths);
        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&line(headers, &widths));
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for row in rows {
            let cells: Vec<&str> = (0..cols).map(|i| row.get(i).map_or("", String::as_str)).collect();
            out.push_str(&line(&cells, &widths));
            out.push('\n');
        }
        out.push_str(&rule);
        out
    }

}

pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing::{debug, warn};

    /// File name looked up next to the graph data file.
    pub const CONFIG_FILE_NAME: &str = "nexus-engine.toml";

    #[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
    #[serde(deny_unknown_fields)]
    pub struct QueryConfig {
        pub default_format: Option<String>, // "text" | "json"
        pub mindmap_depth: Option<usize>,
        pub complete_limit: Option<usize>,
    }

    #[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
    #[serde(deny_unknown_fields)]
    pub struct LoadConfig {
        pub resolve_forward_refs: Option<bool>,
        pub buckets: Option<usize>,
    }

    #[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
    pub struct Config {
        pub query: Option<QueryConfig>,
        pub load: Option<LoadConfig>,
    }

    impl Config {
        #[must_use]
        pub fn query(&self) -> QueryConfig {
            self.query.clone().unwrap_or_default()
        }

        #[must_use]
        pub fn load(&self) -> LoadConfig {
            self.load.clone().unwrap_or_default()
        }
    }

    /// Parse the config at `path`. A missing, unreadable or invalid file yields `None`
    /// (the latter two with a warning).
    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config file unreadable, using defaults");
                return None;
            }
        };
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => {
                debug!(path = %path.display(), "config loaded");
                Some(cfg)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                None
            }
        }
    }

    #[must_use]
    pub fn default_config_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE_NAME)
    }

    /// Look for `nexus-engine.toml` in the directory holding `data_file`.
    #[must_use]
    pub fn load_config_near(data_file: &Path) -> Option<Config> {
        let dir = match data_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let path = default_config_path(dir);
        if path.exists() {
            load_config_at(&path)
        } else {
            None
        }
    }
}
