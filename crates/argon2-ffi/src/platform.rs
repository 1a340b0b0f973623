//! Platform families and native library file names

use crate::error::{Argon2Error, Argon2Result};

/// Platform family, which decides the shared library suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
    Apple,
}

impl Platform {
    /// The family of the platform this binary was built for
    pub fn current() -> Argon2Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to its family
    ///
    /// Pure lookup; never touches the file system.
    pub fn from_os(os: &str) -> Argon2Result<Self> {
        match os {
            "linux" | "android" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "solaris"
            | "illumos" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "macos" | "ios" => Ok(Platform::Apple),
            other => Err(Argon2Error::UnsupportedPlatform(other.to_string())),
        }
    }

    /// File name of the native library on this family
    pub fn library_file_name(self) -> &'static str {
        match self {
            Platform::Linux => "libargon2.so",
            Platform::Windows => "libargon2.dll",
            Platform::Apple => "libargon2.dylib",
        }
    }
}
