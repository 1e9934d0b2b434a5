use std::cell::OnceCell;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::FsError;
use crate::core::{PathResolver, Result, utils};
use crate::vfs::config::{CONFIG_FILE_NAME, VirtualRootConfig};

/// Owner of the virtual root configuration and of the logical to physical path mapping.
///
/// The configuration is read from `<workdir>/.fastfs` on the first path-dependent call and
/// cached until `initialize` or `reset`. An empty `workdir` stands for the process working
/// directory.
#[derive(Debug, Default)]
pub struct VirtualRoot {
    workdir: PathBuf,
    config: OnceCell<Option<VirtualRootConfig>>,
}

impl VirtualRoot {
    pub fn new<P: AsRef<Path>>(workdir: P) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
            config: OnceCell::new(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Physical location of the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.workdir.join(CONFIG_FILE_NAME)
    }

    /// Cached configuration, loading it on first access.
    pub fn config(&self) -> Result<Option<&VirtualRootConfig>> {
        if let Some(config) = self.config.get() {
            return Ok(config.as_ref());
        }
        let loaded = VirtualRootConfig::load(&self.config_path())?;
        Ok(self.config.get_or_init(|| loaded).as_ref())
    }

    /// Creates `directory` if needed, persists the configuration and replaces the cache.
    pub fn initialize<P: AsRef<Path>>(&mut self, directory: P, active: bool) -> Result<()> {
        let directory = directory.as_ref();
        if directory.as_os_str().is_empty() {
            return Err(FsError::invalid_data(
                "the virtual root directory cannot be empty",
            ));
        }

        let host = self.workdir.join(directory);
        std::fs::create_dir_all(&host).map_err(|e| FsError::write_failure(&host, e))?;

        let config = VirtualRootConfig::new(directory, active);
        config.store(&self.config_path())?;
        info!(
            directory = %directory.display(),
            active,
            "virtual root initialized"
        );

        self.config = OnceCell::from(Some(config));
        Ok(())
    }

    /// Configured directory (absolute when asked) as currently stored on disk.
    ///
    /// Never fails: an absent or unreadable configuration is `None`.
    pub fn current_root(&self, absolute: bool) -> Option<PathBuf> {
        let config = VirtualRootConfig::load(&self.config_path()).ok().flatten()?;
        if !absolute {
            return Some(config.directory);
        }
        utils::absolute(self.workdir.join(&config.directory)).ok()
    }

    /// Forgets the cached configuration; the next path-dependent call reloads it.
    pub fn reset(&mut self) {
        self.config.take();
    }

    /// Physical path of a logical one: resolved, then anchored at the working directory.
    pub fn to_host<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        Ok(self.workdir.join(self.resolve(path)?))
    }
}

impl PathResolver for VirtualRoot {
    /// Rewrites a relative path into the virtual root.
    ///
    /// The path is returned unchanged when there is no active configuration, when it is
    /// absolute, when it names the configuration file or when it already lies under the root.
    fn resolve<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        let Some(config) = self.config()? else {
            return Ok(path.to_path_buf());
        };

        if !config.active
            || path.is_absolute()
            || is_config_file(path)
            || starts_with(path, &config.directory)
        {
            return Ok(path.to_path_buf());
        }

        let resolved = Path::new(".").join(&config.directory).join(path);
        debug!(from = %path.display(), to = %resolved.display(), "path redirected");
        Ok(resolved)
    }
}

fn significant(path: &Path) -> impl Iterator<Item = Component<'_>> {
    path.components().filter(|c| *c != Component::CurDir)
}

fn is_config_file(path: &Path) -> bool {
    significant(path).eq(significant(Path::new(CONFIG_FILE_NAME)))
}

/// Component-wise prefix test ignoring `.` components.
fn starts_with(path: &Path, root: &Path) -> bool {
    let mut path = significant(path);
    significant(root).all(|component| path.next() == Some(component))
}
