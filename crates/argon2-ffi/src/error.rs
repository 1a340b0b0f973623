//! Error taxonomy and native status translation
//!
//! The native entry point reports failures as bare integers. [`ErrorCode`]
//! gives each documented value a name, and [`translate`] turns a status into
//! a `Result`. Codes outside the table never index past it; they become
//! [`ErrorCode::Unknown`].

use argon2_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Status codes returned by `argon2_hash`, in native ordinal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Ok,
    OutputPtrNull,
    OutputTooShort,
    OutputTooLong,
    PwdTooShort,
    PwdTooLong,
    SaltTooShort,
    SaltTooLong,
    AdTooShort,
    AdTooLong,
    SecretTooShort,
    SecretTooLong,
    TimeTooSmall,
    TimeTooLarge,
    MemoryTooLittle,
    MemoryTooMuch,
    LanesTooFew,
    LanesTooMany,
    PwdPtrMismatch,
    SaltPtrMismatch,
    SecretPtrMismatch,
    AdPtrMismatch,
    MemoryAllocationError,
    FreeMemoryCbkNull,
    AllocateMemoryCbkNull,
    IncorrectParameter,
    IncorrectType,
    OutPtrMismatch,
    ThreadsTooFew,
    ThreadsTooMany,
    MissingArgs,
    EncodingFail,
    DecodingFail,
    /// A status the table does not know, carrying the raw value
    Unknown(i32),
}

/// Ordinal table; index == native status value
const KNOWN_CODES: [ErrorCode; 33] = [
    ErrorCode::Ok,
    ErrorCode::OutputPtrNull,
    ErrorCode::OutputTooShort,
    ErrorCode::OutputTooLong,
    ErrorCode::PwdTooShort,
    ErrorCode::PwdTooLong,
    ErrorCode::SaltTooShort,
    ErrorCode::SaltTooLong,
    ErrorCode::AdTooShort,
    ErrorCode::AdTooLong,
    ErrorCode::SecretTooShort,
    ErrorCode::SecretTooLong,
    ErrorCode::TimeTooSmall,
    ErrorCode::TimeTooLarge,
    ErrorCode::MemoryTooLittle,
    ErrorCode::MemoryTooMuch,
    ErrorCode::LanesTooFew,
    ErrorCode::LanesTooMany,
    ErrorCode::PwdPtrMismatch,
    ErrorCode::SaltPtrMismatch,
    ErrorCode::SecretPtrMismatch,
    ErrorCode::AdPtrMismatch,
    ErrorCode::MemoryAllocationError,
    ErrorCode::FreeMemoryCbkNull,
    ErrorCode::AllocateMemoryCbkNull,
    ErrorCode::IncorrectParameter,
    ErrorCode::IncorrectType,
    ErrorCode::OutPtrMismatch,
    ErrorCode::ThreadsTooFew,
    ErrorCode::ThreadsTooMany,
    ErrorCode::MissingArgs,
    ErrorCode::EncodingFail,
    ErrorCode::DecodingFail,
];

impl ErrorCode {
    /// Number of statuses the table names
    pub const KNOWN_COUNT: usize = KNOWN_CODES.len();

    /// Look up a native status, bounds-checked
    pub fn from_raw(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|index| KNOWN_CODES.get(index).copied())
            .unwrap_or(ErrorCode::Unknown(code))
    }

    /// The native integer this code corresponds to
    pub fn raw(self) -> i32 {
        match self {
            ErrorCode::Unknown(code) => code,
            known => KNOWN_CODES
                .iter()
                .position(|c| *c == known)
                .map_or(-1, |index| index as i32),
        }
    }

    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }

    /// Constant name as spelled in the native header
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Ok => "ARGON2_OK",
            ErrorCode::OutputPtrNull => "ARGON2_OUTPUT_PTR_NULL",
            ErrorCode::OutputTooShort => "ARGON2_OUTPUT_TOO_SHORT",
            ErrorCode::OutputTooLong => "ARGON2_OUTPUT_TOO_LONG",
            ErrorCode::PwdTooShort => "ARGON2_PWD_TOO_SHORT",
            ErrorCode::PwdTooLong => "ARGON2_PWD_TOO_LONG",
            ErrorCode::SaltTooShort => "ARGON2_SALT_TOO_SHORT",
            ErrorCode::SaltTooLong => "ARGON2_SALT_TOO_LONG",
            ErrorCode::AdTooShort => "ARGON2_AD_TOO_SHORT",
            ErrorCode::AdTooLong => "ARGON2_AD_TOO_LONG",
            ErrorCode::SecretTooShort => "ARGON2_SECRET_TOO_SHORT",
            ErrorCode::SecretTooLong => "ARGON2_SECRET_TOO_LONG",
            ErrorCode::TimeTooSmall => "ARGON2_TIME_TOO_SMALL",
            ErrorCode::TimeTooLarge => "ARGON2_TIME_TOO_LARGE",
            ErrorCode::MemoryTooLittle => "ARGON2_MEMORY_TOO_LITTLE",
            ErrorCode::MemoryTooMuch => "ARGON2_MEMORY_TOO_MUCH",
            ErrorCode::LanesTooFew => "ARGON2_LANES_TOO_FEW",
            ErrorCode::LanesTooMany => "ARGON2_LANES_TOO_MANY",
            ErrorCode::PwdPtrMismatch => "ARGON2_PWD_PTR_MISMATCH",
            ErrorCode::SaltPtrMismatch => "ARGON2_SALT_PTR_MISMATCH",
            ErrorCode::SecretPtrMismatch => "ARGON2_SECRET_PTR_MISMATCH",
            ErrorCode::AdPtrMismatch => "ARGON2_AD_PTR_MISMATCH",
            ErrorCode::MemoryAllocationError => "ARGON2_MEMORY_ALLOCATION_ERROR",
            ErrorCode::FreeMemoryCbkNull => "ARGON2_FREE_MEMORY_CBK_NULL",
            ErrorCode::AllocateMemoryCbkNull => "ARGON2_ALLOCATE_MEMORY_CBK_NULL",
            ErrorCode::IncorrectParameter => "ARGON2_INCORRECT_PARAMETER",
            ErrorCode::IncorrectType => "ARGON2_INCORRECT_TYPE",
            ErrorCode::OutPtrMismatch => "ARGON2_OUT_PTR_MISMATCH",
            ErrorCode::ThreadsTooFew => "ARGON2_THREADS_TOO_FEW",
            ErrorCode::ThreadsTooMany => "ARGON2_THREADS_TOO_MANY",
            ErrorCode::MissingArgs => "ARGON2_MISSING_ARGS",
            ErrorCode::EncodingFail => "ARGON2_ENCODING_FAIL",
            ErrorCode::DecodingFail => "ARGON2_DECODING_FAIL",
            ErrorCode::Unknown(_) => "ARGON2_UNKNOWN_ERROR",
        }
    }

    /// Human-readable description
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::OutputPtrNull => "Output pointer is NULL",
            ErrorCode::OutputTooShort => "Output is too short",
            ErrorCode::OutputTooLong => "Output is too long",
            ErrorCode::PwdTooShort => "Password is too short",
            ErrorCode::PwdTooLong => "Password is too long",
            ErrorCode::SaltTooShort => "Salt is too short",
            ErrorCode::SaltTooLong => "Salt is too long",
            ErrorCode::AdTooShort => "Associated data is too short",
            ErrorCode::AdTooLong => "Associated data is too long",
            ErrorCode::SecretTooShort => "Secret is too short",
            ErrorCode::SecretTooLong => "Secret is too long",
            ErrorCode::TimeTooSmall => "Time cost is too small",
            ErrorCode::TimeTooLarge => "Time cost is too large",
            ErrorCode::MemoryTooLittle => "Memory cost is too small",
            ErrorCode::MemoryTooMuch => "Memory cost is too large",
            ErrorCode::LanesTooFew => "Too few lanes",
            ErrorCode::LanesTooMany => "Too many lanes",
            ErrorCode::PwdPtrMismatch => "Password pointer is NULL, but password length is not 0",
            ErrorCode::SaltPtrMismatch => "Salt pointer is NULL, but salt length is not 0",
            ErrorCode::SecretPtrMismatch => "Secret pointer is NULL, but secret length is not 0",
            ErrorCode::AdPtrMismatch => "Associated data pointer is NULL, but ad length is not 0",
            ErrorCode::MemoryAllocationError => "Memory allocation error",
            ErrorCode::FreeMemoryCbkNull => "The free memory callback is NULL",
            ErrorCode::AllocateMemoryCbkNull => "The allocate memory callback is NULL",
            ErrorCode::IncorrectParameter => "Argon2_Context context is NULL",
            ErrorCode::IncorrectType => "There is no such version of Argon2",
            ErrorCode::OutPtrMismatch => "Output pointer mismatch",
            ErrorCode::ThreadsTooFew => "Not enough threads",
            ErrorCode::ThreadsTooMany => "Too many threads",
            ErrorCode::MissingArgs => "Missing arguments",
            ErrorCode::EncodingFail => "Encoding failed",
            ErrorCode::DecodingFail => "Decoding failed",
            ErrorCode::Unknown(_) => "Unknown error code",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.message())
    }
}

/// Broad class of an [`Argon2Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The native library could not be located or bound
    Resolution,
    /// Caller input rejected before any native call
    Input,
    /// A documented native status
    Native,
    /// A native status outside the known table
    Unknown,
    /// Configuration could not be loaded
    Config,
}

/// Errors surfaced by the binding
#[derive(Error, Debug)]
pub enum Argon2Error {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Library not found: {library} (tried: {})", display_paths(.attempted))]
    LibraryNotFound {
        library: String,
        attempted: Vec<PathBuf>,
    },

    #[error("Symbol '{symbol}' not found in library '{}'", .library.display())]
    SymbolNotFound { library: PathBuf, symbol: String },

    #[error("Invalid encoding for {field}: {reason}")]
    InvalidEncoding { field: &'static str, reason: String },

    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Native hashing failed: {0}")]
    Native(ErrorCode),

    #[error("Native hashing failed with unknown code {0}")]
    UnknownNative(i32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Argon2Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Argon2Error::UnsupportedPlatform(_)
            | Argon2Error::LibraryNotFound { .. }
            | Argon2Error::SymbolNotFound { .. } => ErrorKind::Resolution,
            Argon2Error::InvalidEncoding { .. } | Argon2Error::InvalidParameter { .. } => {
                ErrorKind::Input
            }
            Argon2Error::Native(_) => ErrorKind::Native,
            Argon2Error::UnknownNative(_) => ErrorKind::Unknown,
            Argon2Error::Config(_) => ErrorKind::Config,
        }
    }

    /// The native status behind this error, if it came from native code
    pub fn native_code(&self) -> Option<ErrorCode> {
        match self {
            Argon2Error::Native(code) => Some(*code),
            Argon2Error::UnknownNative(raw) => Some(ErrorCode::Unknown(*raw)),
            _ => None,
        }
    }
}

/// Result type for binding operations
pub type Argon2Result<T> = Result<T, Argon2Error>;

/// Translate a native status into a `Result`
///
/// Zero is success; every other value is an error, never a success.
pub fn translate(code: i32) -> Argon2Result<()> {
    match ErrorCode::from_raw(code) {
        ErrorCode::Ok => Ok(()),
        ErrorCode::Unknown(raw) => Err(Argon2Error::UnknownNative(raw)),
        known => Err(Argon2Error::Native(known)),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidate paths".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, ErrorCode::Ok)]
    #[case(1, ErrorCode::OutputPtrNull)]
    #[case(2, ErrorCode::OutputTooShort)]
    #[case(6, ErrorCode::SaltTooShort)]
    #[case(12, ErrorCode::TimeTooSmall)]
    #[case(14, ErrorCode::MemoryTooLittle)]
    #[case(22, ErrorCode::MemoryAllocationError)]
    #[case(26, ErrorCode::IncorrectType)]
    #[case(29, ErrorCode::ThreadsTooMany)]
    #[case(32, ErrorCode::DecodingFail)]
    fn test_from_raw_known(#[case] raw: i32, #[case] expected: ErrorCode) {
        assert_eq!(ErrorCode::from_raw(raw), expected);
        assert_eq!(expected.raw(), raw);
    }

    #[rstest]
    #[case(33)]
    #[case(-1)]
    #[case(-35)]
    #[case(i32::MAX)]
    #[case(i32::MIN)]
    fn test_from_raw_out_of_range(#[case] raw: i32) {
        assert_eq!(ErrorCode::from_raw(raw), ErrorCode::Unknown(raw));
        assert_eq!(ErrorCode::Unknown(raw).raw(), raw);
    }

    #[test]
    fn test_table_is_ordinal() {
        assert_eq!(ErrorCode::KNOWN_COUNT, 33);
        for (index, code) in KNOWN_CODES.iter().enumerate() {
            assert_eq!(code.raw(), index as i32);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = KNOWN_CODES.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ErrorCode::KNOWN_COUNT);
    }

    #[test]
    fn test_translate_zero_is_ok() {
        assert!(translate(0).is_ok());
    }

    #[test]
    fn test_translate_nonzero_is_error() {
        assert!(matches!(
            translate(6),
            Err(Argon2Error::Native(ErrorCode::SaltTooShort))
        ));
        assert!(matches!(translate(-12), Err(Argon2Error::UnknownNative(-12))));
        assert!(matches!(translate(100), Err(Argon2Error::UnknownNative(100))));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Argon2Error::UnsupportedPlatform("plan9".into()).kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            Argon2Error::InvalidParameter {
                field: "time_cost",
                reason: String::new()
            }
            .kind(),
            ErrorKind::Input
        );
        assert_eq!(Argon2Error::Native(ErrorCode::PwdTooLong).kind(), ErrorKind::Native);
        assert_eq!(Argon2Error::UnknownNative(77).kind(), ErrorKind::Unknown);
    }

    #[test]
    fn test_native_error_display() {
        insta::assert_snapshot!(
            Argon2Error::Native(ErrorCode::SaltTooShort).to_string(),
            @"Native hashing failed: ARGON2_SALT_TOO_SHORT (Salt is too short)"
        );
    }

    #[test]
    fn test_library_not_found_lists_paths() {
        let err = Argon2Error::LibraryNotFound {
            library: "libargon2.so".to_string(),
            attempted: vec![PathBuf::from("/a/libargon2.so"), PathBuf::from("/b/libargon2.so")],
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"Library not found: libargon2.so (tried: /a/libargon2.so, /b/libargon2.so)"
        );
    }
}
