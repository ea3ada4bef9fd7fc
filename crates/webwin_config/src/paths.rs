use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Locations derived from the running program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramPaths {
    /// Absolute path of the executable
    pub prog_file: Utf8PathBuf,
    /// Executable file name without extension
    pub prog_name: String,
    /// Directory containing the executable
    pub prog_dir: Utf8PathBuf,
    /// Directory bundled resources are resolved against
    pub bundle_dir: Utf8PathBuf,
    /// `<prog_dir>/<prog_name>.args`
    pub args_file: Utf8PathBuf,
    /// Working directory at startup
    pub cur_dir: Utf8PathBuf,
}

impl ProgramPaths {
    /// Resolves the paths of the running executable
    ///
    /// # Errors
    ///
    /// This function will return an error if the executable or working directory
    /// cannot be determined or is not valid UTF-8
    pub fn current() -> Result<Self> {
        let exe = std::env::current_exe().context("Failed resolving current executable")?;
        let exe = Utf8PathBuf::try_from(exe).context("Executable path is not valid UTF-8")?;
        let cwd = std::env::current_dir().context("Failed resolving current directory")?;
        let cwd = Utf8PathBuf::try_from(cwd).context("Current directory is not valid UTF-8")?;

        Ok(Self::from_parts(&exe, &cwd))
    }

    pub fn from_parts(prog_file: &Utf8Path, cur_dir: &Utf8Path) -> Self {
        let prog_dir = prog_file
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_default();
        let prog_name = prog_file.file_stem().unwrap_or("webwin").to_string();

        Self {
            prog_file: prog_file.to_path_buf(),
            args_file: prog_dir.join(format!("{prog_name}.args")),
            bundle_dir: prog_dir.clone(),
            prog_dir,
            prog_name,
            cur_dir: cur_dir.to_path_buf(),
        }
    }
}
