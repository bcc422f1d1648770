//! # Strand - blocking stream sockets with single-owner handles
//!
//! Strand wraps the platform socket surface in a small, synchronous API.
//! Every OS handle has exactly one owner, every fallible call returns a
//! classified [`Result`], and the reliable `read_n`/`write_n` tier loops
//! partial transfers so callers see either the full requested count or an
//! error.
//!
//! ## Ownership model
//!
//! A [`Socket`] owns one OS handle. Ownership moves with the value; there is
//! no implicit copy. Sharing a connection between two owners goes through
//! [`Socket::try_clone`], which asks the OS for a second handle referring to
//! the same connection - each owner is then closed independently, and the
//! connection is only torn down once every handle is gone. Dropping an open
//! socket closes its handle exactly once.
//!
//! ## Quick start
//!
//! ```no_run
//! use strand::{Result, UnixSocket};
//!
//! fn example() -> Result<()> {
//!     let (mut a, mut b) = UnixSocket::pair()?;
//!
//!     a.write_n(b"hello")?;
//!
//!     let mut buf = [0u8; 5];
//!     let n = b.read_n(&mut buf)?;
//!     assert_eq!(&buf[..n], b"hello");
//!     Ok(())
//! }
//! ```
//!
//! ## Error handling
//!
//! All operations return [`Result`], with failures normalized into the
//! portable [`Error`] taxonomy instead of raw platform error numbers. A
//! short transfer - including a zero-byte read when the peer has closed its
//! write side - is a success with a smaller count, never an error.
//!
//! ## Blocking semantics
//!
//! There is no event loop and no readiness polling: every I/O call may block
//! the calling thread, bounded only by a configured
//! [`read_timeout`](StreamSocket::read_timeout) /
//! [`write_timeout`](StreamSocket::write_timeout). The sanctioned way to
//! unblock another owner's in-flight call is [`shutdown`](Socket::shutdown)
//! through a clone of the socket.

#[cfg(not(unix))]
compile_error!("strand only supports Unix platforms");

#[macro_use]
mod macros;

pub mod addr;
pub mod error;
pub mod socket;
pub mod stream;

pub use addr::{Address, Inet6Address, InetAddress, UnixAddress};
pub use error::{Error, ResolveError, Result};
pub use socket::{INVALID, Shutdown, Socket};
pub use stream::{StreamSocket, Tcp6Socket, TcpSocket, UnixSocket};
