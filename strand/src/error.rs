//! The portable error taxonomy shared by every fallible operation.
//!
//! Platform error numbers never leak through the public surface directly:
//! failures are classified into [`Error`], with the original
//! [`io::Error`] kept as the source where one exists, so callers branch on
//! the class of a failure rather than on platform-specific values.

use std::ffi::CStr;
use std::io;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Classified failure returned by socket, stream and address operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// Name resolution failed, or an address literal was malformed.
  #[error("address resolution failed: {0}")]
  Resolution(#[from] ResolveError),

  /// Connection establishment failed: refused, unreachable, or a
  /// socket/bind/listen/accept call did.
  #[error("connection failed: {0}")]
  Connect(#[source] io::Error),

  /// An underlying transfer call failed (connection reset, broken pipe,
  /// ...). A short transfer is not a failure and never produces this.
  #[error("i/o error: {0}")]
  Io(#[source] io::Error),

  /// The requested socket option is not supported on this transport or
  /// platform.
  #[error("socket option not supported: {0}")]
  UnsupportedOption(#[source] io::Error),

  /// The operation exceeded its configured read or write timeout.
  #[error("operation timed out")]
  TimedOut,
}

/// Failure during host-name resolution, split the way the name service
/// reports it.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
  /// The name service itself rejected the lookup (e.g. name not found).
  #[error("{0}")]
  Service(String),

  /// The lookup failed inside the OS, outside the name service's own
  /// error space (`EAI_SYSTEM`).
  #[error(transparent)]
  System(io::Error),
}

impl Error {
  /// Classifies a failed transfer call. An expired `SO_RCVTIMEO` /
  /// `SO_SNDTIMEO` surfaces from the OS as `EAGAIN`/`EWOULDBLOCK`, which
  /// becomes [`Error::TimedOut`]; everything else stays an I/O failure.
  pub(crate) fn transfer(err: io::Error) -> Error {
    match err.kind() {
      io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::TimedOut,
      _ => Error::Io(err),
    }
  }

  /// Maps a `getaddrinfo` return code into the taxonomy.
  pub(crate) fn from_gai(code: libc::c_int) -> Error {
    if code == libc::EAI_SYSTEM {
      return Error::Resolution(ResolveError::System(io::Error::last_os_error()));
    }
    // SAFETY: gai_strerror returns a pointer to a static NUL-terminated
    // message for every error code.
    let msg = unsafe { CStr::from_ptr(libc::gai_strerror(code)) };
    Error::Resolution(ResolveError::Service(msg.to_string_lossy().into_owned()))
  }

  /// A malformed address literal, reported in the resolution class.
  pub(crate) fn malformed(msg: &str) -> Error {
    Error::Resolution(ResolveError::Service(msg.to_owned()))
  }
}

impl From<Error> for io::Error {
  fn from(err: Error) -> io::Error {
    match err {
      Error::Connect(e) | Error::Io(e) | Error::UnsupportedOption(e) => e,
      Error::TimedOut => io::Error::new(io::ErrorKind::TimedOut, Error::TimedOut),
      Error::Resolution(e) => io::Error::other(e),
    }
  }
}
