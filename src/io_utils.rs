//! Error plumbing and setup shared by the command line tools.
use std::error::Error;
use std::fmt;
use std::io;
use std::path::Path;

use crate::CartpackError;

/// Failure reported by a binary: the step that failed and what to try next.
#[derive(Debug)]
pub struct CliError {
    pub step: String,
    pub hint: String,
    cause: Box<dyn Error + Send + Sync>,
}

impl CliError {
    /// An I/O failure on `path` while performing `step`.
    pub fn io(step: &str, path: &Path, err: io::Error) -> Self {
        Self {
            step: format!("{step} '{}'", path.display()),
            hint: format!("{err}. {}", io_hint(err.kind())),
            cause: Box::new(err),
        }
    }

    /// A codec failure while performing `step`.
    pub fn codec(step: &str, err: CartpackError) -> Self {
        Self {
            step: step.to_string(),
            hint: cli_hint(&err),
            cause: Box::new(err),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.step, self.hint)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref())
    }
}

fn io_hint(kind: io::ErrorKind) -> &'static str {
    match kind {
        io::ErrorKind::NotFound => "Check that the file exists and the path is correct.",
        io::ErrorKind::PermissionDenied => "Check permissions or run as a different user.",
        io::ErrorKind::WriteZero => "Disk may be full. Free up space and try again.",
        _ => "Check the path and free disk space.",
    }
}

/// Return an actionable hint for a library error variant.
pub fn cli_hint(err: &CartpackError) -> String {
    use CartpackError::*;
    match err {
        EmptyInput => "input range is empty. Check --offset and --len.".to_string(),
        OffsetOutOfRange { offset, len } => {
            format!("offset {offset:#x} is past the end of a {len}-byte file. Check --offset.")
        }
        InvalidCount { .. } | InvalidSegment(_) => format!("{err}. This is a bug."),
        Config(msg) => format!("{msg}. Invalid configuration."),
        Io(io) => format!("{io}"),
    }
}

/// Byte range `offset..offset + len` of `data`, or everything after `offset`.
pub fn byte_range(data: &[u8], offset: usize, len: Option<usize>) -> Result<&[u8], CartpackError> {
    let tail = data.get(offset..).ok_or(CartpackError::OffsetOutOfRange {
        offset,
        len: data.len(),
    })?;
    match len {
        Some(n) if n > tail.len() => Err(CartpackError::OffsetOutOfRange {
            offset: offset.saturating_add(n),
            len: data.len(),
        }),
        Some(n) => Ok(&tail[..n]),
        None => Ok(tail),
    }
}

/// Install the stderr log subscriber used by every binary. `RUST_LOG`
/// overrides the default `warn` level.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_range_checks_bounds() {
        let data = [1u8, 2, 3, 4];
        assert_eq!(byte_range(&data, 1, Some(2)).unwrap(), &[2, 3]);
        assert_eq!(byte_range(&data, 4, None).unwrap(), &[] as &[u8]);
        assert!(byte_range(&data, 5, None).is_err());
        assert!(byte_range(&data, 2, Some(3)).is_err());
    }

    #[test]
    fn huge_length_does_not_overflow() {
        let data = [0u8; 8];
        let err = byte_range(&data, 1, Some(usize::MAX)).unwrap_err();
        assert!(matches!(
            err,
            CartpackError::OffsetOutOfRange { offset: usize::MAX, len: 8 }
        ));
    }

    #[test]
    fn codec_errors_carry_hints() {
        let err = CliError::codec("compressing", CartpackError::EmptyInput);
        let msg = err.to_string();
        assert!(msg.starts_with("error compressing: "));
        assert!(msg.contains("--len"));
        assert!(err.source().is_some());
    }

    #[test]
    fn io_errors_name_the_path() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let msg = CliError::io("reading", Path::new("rom.sfc"), err).to_string();
        assert!(msg.contains("'rom.sfc'"));
        assert!(msg.contains("Check that the file exists"));
    }
}
