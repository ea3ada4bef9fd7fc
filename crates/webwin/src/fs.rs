//! Built-in `fs` object giving the front end access to the local file system.

use std::{
    fs::{self, Metadata, OpenOptions},
    io::Write,
    sync::Arc,
    time::SystemTime,
};

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use globset::GlobBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;
use webwin_runtime::{Exposable, Function};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One directory entry as returned by [`FileSystem::ls`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsEntry {
    pub name: String,
    pub fullpath: String,
    /// `file`, `dir`, `symlink` or empty when unknown
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
    pub ctime: String,
    pub mtime: String,
    pub atime: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystem;

impl FileSystem {
    /// Drive roots on Windows, `/` everywhere else
    pub fn get_roots(&self) -> Vec<String> {
        if cfg!(windows) {
            ('A'..='Z')
                .map(|d| format!("{d}:\\"))
                .filter(|root| Utf8Path::new(root).exists())
                .collect()
        } else {
            vec!["/".into()]
        }
    }

    /// Lists `dir`, optionally filtered by a `*`/`?` name pattern and an entry type
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not a directory or `pattern` is not a valid pattern
    pub fn ls(&self, dir: &str, pattern: Option<&str>, kind: Option<&str>) -> Result<Vec<FsEntry>> {
        let dir = Utf8Path::new(dir);
        if !dir.is_dir() {
            bail!("Directory not found: {dir}");
        }

        let matcher = match pattern.filter(|p| !p.is_empty()) {
            Some(p) => Some(
                GlobBuilder::new(p)
                    .case_insensitive(cfg!(windows))
                    .build()
                    .with_context(|| format!("invalid pattern: {p:?}"))?
                    .compile_matcher(),
            ),
            None => None,
        };
        let kind = kind.filter(|k| !k.is_empty()).map(str::to_lowercase);

        let mut entries = vec![];
        for entry in dir.read_dir_utf8().with_context(|| format!("Failed listing {dir}"))? {
            let entry = entry?;
            let node = describe(entry.path())?;

            if matcher.as_ref().is_some_and(|m| !m.is_match(&node.name)) {
                continue;
            }
            if kind.as_ref().is_some_and(|k| *k != node.kind) {
                continue;
            }
            entries.push(node);
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Listed {} entries in {dir}", entries.len());
        Ok(entries)
    }

    /// Absolute current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is unavailable or not UTF-8
    pub fn cwd(&self) -> Result<String> {
        let cwd = std::env::current_dir().context("Failed resolving current directory")?;
        let cwd = Utf8PathBuf::try_from(cwd).context("Current directory is not valid UTF-8")?;
        Ok(cwd.into_string())
    }

    /// Reads a text file
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a file, is not valid UTF-8 or the
    /// encoding is not supported
    pub fn readfile(&self, path: &str, encoding: Option<&str>) -> Result<String> {
        check_encoding(encoding)?;
        let path = Utf8Path::new(path);
        if !path.is_file() {
            bail!("File not found: {path}");
        }

        let text = fs::read_to_string(path).with_context(|| format!("Failed reading {path}"))?;
        if let Some(stripped) = text.strip_prefix('\u{feff}') {
            return Ok(stripped.to_string());
        }
        Ok(text)
    }

    /// Writes `text` to `path`, mode `w` overwrites and `a` appends.
    /// Returns the number of characters written.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode or encoding is not supported or writing fails
    pub fn writefile(
        &self,
        path: &str,
        text: &str,
        mode: Option<&str>,
        encoding: Option<&str>,
    ) -> Result<usize> {
        check_encoding(encoding)?;

        let mut opts = OpenOptions::new();
        match mode.filter(|m| !m.is_empty()).unwrap_or("w") {
            "w" => opts.write(true).create(true).truncate(true),
            "a" => opts.append(true).create(true),
            other => bail!("Unsupported write mode: {other:?} (valid: w, a)"),
        };

        let mut file = opts
            .open(path)
            .with_context(|| format!("Failed opening {path}"))?;
        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed writing {path}"))?;

        Ok(text.chars().count())
    }

    /// # Errors
    ///
    /// Returns an error if `path` is not a file or cannot be removed
    pub fn removefile(&self, path: &str) -> Result<()> {
        let path = Utf8Path::new(path);
        if !path.is_file() {
            bail!("File not found: {path}");
        }
        fs::remove_file(path).with_context(|| format!("Failed removing {path}"))
    }
}

impl Exposable for FileSystem {
    fn methods(self: Arc<Self>) -> Vec<Function> {
        let fs = *self;
        vec![
            Function::named("get_roots", move || Ok::<_, anyhow::Error>(fs.get_roots()))
                .with_doc("List the file system roots"),
            Function::named(
                "ls",
                move |dir: String, pattern: Option<String>, kind: Option<String>| {
                    fs.ls(&dir, pattern.as_deref(), kind.as_deref())
                },
            )
            .with_doc(concat!(
                "List a directory\n\n",
                "pattern: '*' and '?' wildcards\n",
                "type: 'dir', 'file' or 'symlink'",
            )),
            Function::named("cwd", move || fs.cwd()).with_doc("Current directory"),
            Function::named("readfile", move |path: String, encoding: Option<String>| {
                fs.readfile(&path, encoding.as_deref())
            }),
            Function::named(
                "writefile",
                move |path: String, text: String, mode: Option<String>, encoding: Option<String>| {
                    fs.writefile(&path, &text, mode.as_deref(), encoding.as_deref())
                },
            )
            .with_doc("Write a text file\n\nmode: 'w' overwrite, 'a' append"),
            Function::named("removefile", move |path: String| fs.removefile(&path)),
        ]
    }
}

fn check_encoding(encoding: Option<&str>) -> Result<()> {
    match encoding.map(str::to_ascii_lowercase).as_deref() {
        None | Some("" | "utf-8" | "utf8") => Ok(()),
        Some(other) => bail!("Unsupported encoding: {other:?} (only utf-8 is supported)"),
    }
}

fn describe(path: &Utf8Path) -> Result<FsEntry> {
    let link_meta =
        fs::symlink_metadata(path).with_context(|| format!("Failed reading {path}"))?;
    // size and times follow the link when its target exists
    let meta = fs::metadata(path).unwrap_or_else(|_| link_meta.clone());

    // a link reports its target's type, only dangling links are `symlink`
    let kind = if meta.is_file() {
        "file"
    } else if meta.is_dir() {
        "dir"
    } else if link_meta.file_type().is_symlink() {
        "symlink"
    } else {
        ""
    };

    Ok(FsEntry {
        name: path.file_name().unwrap_or_default().to_string(),
        fullpath: path.to_string(),
        kind: kind.into(),
        size: meta.len(),
        ctime: format_time(meta.created().or_else(|_| meta.modified())),
        mtime: format_time(meta.modified()),
        atime: format_time(accessed(&meta)),
    })
}

fn accessed(meta: &Metadata) -> std::io::Result<SystemTime> {
    meta.accessed().or_else(|_| meta.modified())
}

fn format_time(time: std::io::Result<SystemTime>) -> String {
    time.map(|t| DateTime::<Local>::from(t).format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}
