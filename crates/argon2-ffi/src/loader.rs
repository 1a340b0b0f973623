//! Native library resolution
//!
//! Locates `libargon2` using `libloading`:
//! 1. The directory named by `ARGON2_LIB_DIR` (or `library.dir` in argon2.toml)
//! 2. A fallback directory, by default the one holding the current executable
//!
//! The first candidate that loads wins. The loaded library and its bound entry
//! point form a [`NativeHandle`], which is immutable and shared by every call.

use crate::caller::{Argon2HashFn, ENTRY_SYMBOL};
use crate::error::{Argon2Error, Argon2Result};
use crate::platform::Platform;
use argon2_config::{BindingConfig, ENV_LIB_DIR};
use libloading::{Library, Symbol};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, trace};

/// A loaded native library bound to its `argon2_hash` entry point
///
/// # Safety
///
/// Loading a dynamic library runs its initialization code in this process.
/// The entry pointer is only valid while `_library` is alive, which is why
/// both live in the same value and the pointer is never handed out.
pub struct NativeHandle {
    entry: Argon2HashFn,
    path: Option<PathBuf>,
    _library: Option<Library>,
}

impl NativeHandle {
    /// Bind the entry point of an already loaded library
    fn bind(library: Library, path: PathBuf) -> Argon2Result<Self> {
        // SAFETY: the symbol is declared with the documented argon2_hash ABI,
        // and the copied pointer is stored next to the library that owns it.
        let entry = unsafe {
            let symbol: Symbol<'_, Argon2HashFn> =
                library
                    .get(ENTRY_SYMBOL.as_bytes())
                    .map_err(|_| Argon2Error::SymbolNotFound {
                        library: path.clone(),
                        symbol: ENTRY_SYMBOL.to_string(),
                    })?;
            *symbol
        };

        Ok(Self {
            entry,
            path: Some(path),
            _library: Some(library),
        })
    }

    /// Load a specific library file
    ///
    /// # Safety
    ///
    /// The file must be a trusted build of libargon2 whose `argon2_hash`
    /// matches [`Argon2HashFn`].
    pub unsafe fn load(path: &Path) -> Argon2Result<Self> {
        let library = Library::new(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "failed to load native library");
            Argon2Error::LibraryNotFound {
                library: path.display().to_string(),
                attempted: vec![path.to_path_buf()],
            }
        })?;
        Self::bind(library, path.to_path_buf())
    }

    /// Wrap an in-process function with the `argon2_hash` ABI
    ///
    /// Useful when libargon2 is linked statically.
    ///
    /// # Safety
    ///
    /// `entry` must honour the `argon2_hash` contract: read exactly the given
    /// input lengths, write at most the given output lengths.
    pub unsafe fn from_fn(entry: Argon2HashFn) -> Self {
        Self {
            entry,
            path: None,
            _library: None,
        }
    }

    pub(crate) fn entry(&self) -> Argon2HashFn {
        self.entry
    }

    /// Path of the loaded library, `None` for in-process handles
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeHandle")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Finds and loads the native library for a platform
#[derive(Debug, Clone)]
pub struct LibraryResolver {
    os: String,
    search_dir: Option<PathBuf>,
    fallback_dir: Option<PathBuf>,
}

impl LibraryResolver {
    /// Resolver for this platform with only the default fallback directory
    ///
    /// The default fallback (the executable's directory) is looked up when
    /// candidates are listed, not here.
    pub fn new() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            search_dir: None,
            fallback_dir: None,
        }
    }

    /// Resolver honouring `ARGON2_LIB_DIR`
    pub fn from_env() -> Self {
        Self {
            search_dir: env_lib_dir(),
            ..Self::new()
        }
    }

    /// Resolver using `[library]` settings; `ARGON2_LIB_DIR` still wins
    pub fn from_config(config: &BindingConfig) -> Self {
        let mut resolver = Self::new();
        resolver.search_dir = env_lib_dir().or_else(|| config.library_dir().map(Path::to_path_buf));
        if let Some(fallback) = config.fallback_dir() {
            resolver.fallback_dir = Some(fallback.to_path_buf());
        }
        resolver
    }

    /// Resolve as if running on `os` (an identifier like `std::env::consts::OS`)
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    pub fn with_fallback_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fallback_dir = Some(dir.into());
        self
    }

    /// Candidate library paths in resolution order
    ///
    /// Fails with `UnsupportedPlatform` before looking at any directory.
    pub fn candidates(&self) -> Argon2Result<Vec<PathBuf>> {
        let file_name = Platform::from_os(&self.os)?.library_file_name();
        let fallback_dir = self.fallback_dir.clone().or_else(default_fallback_dir);

        let mut candidates: Vec<PathBuf> = Vec::with_capacity(2);
        for dir in [&self.search_dir, &fallback_dir].into_iter().flatten() {
            let path = dir.join(file_name);
            if !candidates.contains(&path) {
                candidates.push(path);
            }
        }
        Ok(candidates)
    }

    /// Load the first candidate that exists and loads
    pub fn resolve(&self) -> Argon2Result<NativeHandle> {
        let platform = Platform::from_os(&self.os)?;
        let candidates = self.candidates()?;

        for path in &candidates {
            if !path.is_file() {
                trace!(path = %path.display(), "native library candidate missing");
                continue;
            }

            // SAFETY: loading runs library initializers; the candidates are the
            // configured libargon2 locations only.
            match unsafe { Library::new(path) } {
                Ok(library) => {
                    debug!(path = %path.display(), "loaded native argon2 library");
                    return NativeHandle::bind(library, path.clone());
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "failed to load native library candidate");
                }
            }
        }

        Err(Argon2Error::LibraryNotFound {
            library: platform.library_file_name().to_string(),
            attempted: candidates,
        })
    }
}

impl Default for LibraryResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn env_lib_dir() -> Option<PathBuf> {
    std::env::var_os(ENV_LIB_DIR)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// Directory holding the running executable
fn default_fallback_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Once-initialized slot for a shared [`NativeHandle`]
///
/// Reads are lock-free once set. Initialization is serialized so concurrent
/// first use runs the initializer exactly once; a failed initialization
/// leaves the slot empty for the next caller.
pub struct HandleCell {
    handle: OnceLock<Arc<NativeHandle>>,
    init: Mutex<()>,
}

impl HandleCell {
    pub const fn new() -> Self {
        Self {
            handle: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn get(&self) -> Option<Arc<NativeHandle>> {
        self.handle.get().cloned()
    }

    /// Install a handle explicitly; returns the rejected handle if one is set
    pub fn set(&self, handle: Arc<NativeHandle>) -> Result<(), Arc<NativeHandle>> {
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        self.handle.set(handle)
    }

    pub fn get_or_try_init<F>(&self, init: F) -> Argon2Result<Arc<NativeHandle>>
    where
        F: FnOnce() -> Argon2Result<NativeHandle>,
    {
        if let Some(handle) = self.handle.get() {
            return Ok(Arc::clone(handle));
        }

        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = self.handle.get() {
            return Ok(Arc::clone(handle));
        }

        let handle = Arc::new(init()?);
        // Cannot fail: writers hold `init`, and the slot was empty under it.
        let _ = self.handle.set(Arc::clone(&handle));
        Ok(handle)
    }
}

impl Default for HandleCell {
    fn default() -> Self {
        Self::new()
    }
}

static SHARED: HandleCell = HandleCell::new();

/// The process-wide handle, resolved from the environment on first use
pub fn shared_handle() -> Argon2Result<Arc<NativeHandle>> {
    SHARED.get_or_try_init(|| LibraryResolver::from_env().resolve())
}

/// Install the process-wide handle at startup instead of resolving lazily
///
/// Returns the rejected handle if one was already installed or resolved.
pub fn install_shared_handle(
    handle: NativeHandle,
) -> Result<Arc<NativeHandle>, Arc<NativeHandle>> {
    let handle = Arc::new(handle);
    SHARED.set(Arc::clone(&handle))?;
    Ok(handle)
}
