use anyhow::Context;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const DIR_KEY: &str = "persisted.dir";
pub const SUFFIX_KEY: &str = "persisted.suffix";

/// Suffix the anonymized files are written with, so they never overwrite the
/// integration fixtures they sit next to.
pub const ANONYMIZED_SUFFIX: &str = "_prod";

/// Java `.properties` files: `#`/`!` comments, `=`, `:` or whitespace between key
/// and value, backslash escapes and line continuations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn parse(text: &str) -> Self {
        let entries = logical_lines(text)
            .iter()
            .map(|line| split_entry(line))
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("can't read properties file {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    /// Each line of `comment` becomes a `#` line, followed by a timestamp line and
    /// the entries sorted by key.
    pub fn to_text(&self, comment: &str) -> String {
        let mut text = String::new();
        for line in comment.lines() {
            text.push_str(&format!("#{line}\n"));
        }
        text.push_str(&format!(
            "#{}\n",
            chrono::Local::now().format("%a %b %d %H:%M:%S %Z %Y")
        ));
        for (key, value) in &self.entries {
            text.push_str(&format!("{}={}\n", escape(key, true), escape(value, false)));
        }
        text
    }

    pub fn store(&self, path: &Path, comment: &str) -> Result<(), anyhow::Error> {
        fs::write(path, self.to_text(comment))
            .with_context(|| format!("can't write properties file {}", path.display()))
    }
}

/// Join continued lines and drop blanks and comments. A line continues when it ends
/// with an odd number of backslashes.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;
    for raw in text.lines() {
        let line = raw.trim_start();
        let mut logical = match pending.take() {
            Some(logical) => logical,
            None if line.is_empty() || line.starts_with(['#', '!']) => continue,
            None => String::new(),
        };
        let backslashes = line.chars().rev().take_while(|&c| c == '\\').count();
        if backslashes % 2 == 1 {
            logical.push_str(&line[..line.len() - 1]);
            pending = Some(logical);
        } else {
            logical.push_str(line);
            lines.push(logical);
        }
    }
    lines.extend(pending);
    lines
}

/// The key ends at the first unescaped `=`, `:` or whitespace. Whitespace and one
/// separator are then skipped; whatever is left is the value.
fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (at, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || c.is_whitespace() {
            key_end = at;
            break;
        }
    }
    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).map_or(rest, str::trim_start);
    (unescape(&line[..key_end]), unescape(value))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Inverse of `unescape`. Spaces are escaped everywhere in keys but only in
/// leading position in values.
fn escape(raw: &str, key: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for (at, c) in raw.chars().enumerate() {
        match c {
            '\\' | '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if key || at == 0 => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
    out
}

/// Where the persister reads and writes its CSV files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PersisterConfig {
    pub dir: PathBuf,
    pub suffix: String,
}

impl PersisterConfig {
    /// A relative `persisted.dir` is taken from `base`, which is also the default.
    pub fn from_properties(props: &Properties, base: &Path) -> Self {
        Self {
            dir: props.get(DIR_KEY).map_or_else(|| base.to_owned(), |dir| base.join(dir)),
            suffix: props.get(SUFFIX_KEY).unwrap_or_default().to_owned(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let props = Properties::load(path)?;
        Ok(Self::from_properties(&props, parent_dir(path)))
    }

    /// `<dir>/<stem><suffix>.csv`
    pub fn path(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}{}.csv", self.suffix))
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

/// Point the integration properties at the anonymized files. The file has to exist
/// already: creating it would hide a wrong path.
pub(crate) fn update_integration_properties(path: &Path) -> Result<(), anyhow::Error> {
    let writable = fs::metadata(path)
        .map(|meta| meta.is_file() && !meta.permissions().readonly())
        .unwrap_or(false);
    anyhow::ensure!(
        writable,
        "properties file must exist and be writable: {}",
        path.display()
    );
    let mut props = Properties::load(path)?;
    props.set(SUFFIX_KEY, ANONYMIZED_SUFFIX);
    info!("Updating properties file '{}'", path.display());
    let comment = format!(
        "Note: Don't check in changes to this file!!\n\
         Modified by {}\n\
         to reset run 'git checkout -- {}'",
        env!("CARGO_PKG_NAME"),
        path.display()
    );
    props.store(path, &comment)
}
