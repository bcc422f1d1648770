//! Exclusive ownership of one OS socket handle.

use std::mem::{self, MaybeUninit};
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, RawFd};

use crate::addr::Address;
use crate::error::{Error, Result};

/// Sentinel handle value meaning "no handle".
pub const INVALID: RawFd = -1;

/// Which direction(s) of a connection to shut down.
///
/// Half-close is the sanctioned way for one owner of a connection to
/// unblock a peer owner's in-flight blocking call without a separate
/// signaling channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
  /// Further receives are disallowed.
  Read,
  /// Further sends are disallowed.
  Write,
  /// Further sends and receives are disallowed.
  Both,
}

impl Shutdown {
  fn how(self) -> libc::c_int {
    match self {
      Shutdown::Read => libc::SHUT_RD,
      Shutdown::Write => libc::SHUT_WR,
      Shutdown::Both => libc::SHUT_RDWR,
    }
  }
}

/// Exclusive owner of one OS socket handle.
///
/// At most one live `Socket` owns a given handle. Ownership moves with the
/// value, or explicitly via [`take`](Socket::take); there is no `Clone`.
/// Sharing a connection between two owners goes through
/// [`try_clone`](Socket::try_clone), which asks the OS for a second handle
/// referring to the same connection.
///
/// Dropping an open socket closes the handle, exactly once. A socket whose
/// handle has been transferred away owns nothing and closes nothing.
///
/// A `Socket` is not an internally-synchronized shared resource: callers
/// needing concurrent use from several threads either serialize access or
/// hold independent owners produced by `try_clone`.
#[derive(Debug)]
pub struct Socket {
  handle: RawFd,
}

impl Socket {
  /// Creates a raw, unconnected handle for the given address-family /
  /// communications-type / protocol triple.
  ///
  /// # Examples
  ///
  /// ```no_run
  /// use strand::Socket;
  ///
  /// let sock = Socket::create(libc::AF_INET, libc::SOCK_STREAM, 0)?;
  /// assert!(sock.is_open());
  /// # Ok::<(), strand::Error>(())
  /// ```
  pub fn create(
    domain: libc::c_int,
    ty: libc::c_int,
    protocol: libc::c_int,
  ) -> Result<Socket> {
    let fd = syscall!(socket(domain, ty, protocol)).map_err(Error::Connect)?;
    Ok(Socket { handle: fd })
  }

  /// Creates a connected pair of sockets directly from the OS.
  ///
  /// Whether this works is domain dependent; it is reliable for the
  /// local/Unix domain. Elsewhere the OS error is surfaced.
  pub fn pair(
    domain: libc::c_int,
    ty: libc::c_int,
    protocol: libc::c_int,
  ) -> Result<(Socket, Socket)> {
    let mut fds = [0 as libc::c_int; 2];
    syscall!(socketpair(domain, ty, protocol, fds.as_mut_ptr()))
      .map_err(Error::Connect)?;
    Ok((Socket { handle: fds[0] }, Socket { handle: fds[1] }))
  }

  /// A socket that owns no handle.
  ///
  /// The only constructor that cannot fail, and the state a socket is left
  /// in after its handle has been [`take`](Socket::take)n.
  pub const fn invalid() -> Socket {
    Socket { handle: INVALID }
  }

  /// Whether this socket currently owns a handle.
  pub fn is_open(&self) -> bool {
    self.handle != INVALID
  }

  /// The raw handle, or [`INVALID`].
  pub fn handle(&self) -> RawFd {
    self.handle
  }

  /// Transfers the handle into a new owner, leaving `self` invalid.
  ///
  /// The source is not closed - it simply no longer owns anything, and
  /// dropping it later is a no-op.
  pub fn take(&mut self) -> Socket {
    mem::replace(self, Socket::invalid())
  }

  /// Closes the handle.
  ///
  /// Closing an already-invalid socket is a no-op, never an error. After a
  /// successful (or attempted) close the socket is invalid either way; the
  /// OS releases the handle even when `close` reports a failure.
  pub fn close(&mut self) -> Result<()> {
    if !self.is_open() {
      return Ok(());
    }
    let fd = mem::replace(&mut self.handle, INVALID);
    syscall!(close(fd)).map_err(Error::Io)?;
    Ok(())
  }

  /// Asks the OS for a second handle referring to the same connection and
  /// wraps it in a new, independent owner.
  ///
  /// The two owners share no mutable state: each must be closed
  /// independently, and the connection is only fully released when all of
  /// them are. The typical use is one owner per thread, one reading and
  /// one writing.
  ///
  /// Duplicating an invalid socket is reported as the underlying call's
  /// error (`EBADF`), never silently swallowed.
  pub fn try_clone(&self) -> Result<Socket> {
    let fd = syscall!(dup(self.handle)).map_err(Error::Io)?;
    Ok(Socket { handle: fd })
  }

  /// Disables one or both directions of the connection without closing
  /// the handle.
  ///
  /// Callable through any owner of the connection, including a clone, to
  /// unblock a peer owner's in-flight read or write.
  pub fn shutdown(&self, how: Shutdown) -> Result<()> {
    syscall!(shutdown(self.handle, how.how())).map_err(Error::Io)?;
    Ok(())
  }

  /// Binds the socket to a local address.
  pub fn bind<A: Address>(&self, addr: &A) -> Result<()> {
    syscall!(bind(self.handle, addr.as_sockaddr(), addr.sockaddr_len()))
      .map_err(Error::Connect)?;
    Ok(())
  }

  /// Marks the socket passive, ready to accept incoming connections.
  pub fn listen(&self, backlog: libc::c_int) -> Result<()> {
    syscall!(listen(self.handle, backlog)).map_err(Error::Connect)?;
    Ok(())
  }

  /// Connects the socket to a remote address.
  pub fn connect<A: Address>(&self, addr: &A) -> Result<()> {
    syscall!(connect(self.handle, addr.as_sockaddr(), addr.sockaddr_len()))
      .map_err(Error::Connect)?;
    Ok(())
  }

  /// Accepts one incoming connection, returning the connected handle as a
  /// new owner together with the peer address.
  pub fn accept<A: Address>(&self) -> Result<(Socket, A)> {
    // SAFETY: zero is a valid state for every field of sockaddr_storage.
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    let fd = syscall!(accept(
      self.handle,
      (&mut storage as *mut libc::sockaddr_storage).cast(),
      &mut len,
    ))
    .map_err(Error::Connect)?;
    let sock = Socket { handle: fd };
    let peer = A::from_storage(&storage, len)?;
    Ok((sock, peer))
  }

  /// Reads a socket option.
  ///
  /// `T` must be the exact type the option level documents: `c_int` for
  /// boolean options, `timeval` for the timeout options, and so on.
  pub fn get_option<T: Copy>(
    &self,
    level: libc::c_int,
    name: libc::c_int,
  ) -> Result<T> {
    let mut value = MaybeUninit::<T>::zeroed();
    let mut len = mem::size_of::<T>() as libc::socklen_t;
    syscall!(getsockopt(
      self.handle,
      level,
      name,
      value.as_mut_ptr().cast(),
      &mut len,
    ))
    .map_err(Error::UnsupportedOption)?;
    // SAFETY: a zero return means the OS wrote the value; T is plain
    // copyable data and the zeroed prefix covers a short write.
    Ok(unsafe { value.assume_init() })
  }

  /// Writes a socket option. Thin pass-through to `setsockopt`.
  pub fn set_option<T: Copy>(
    &self,
    level: libc::c_int,
    name: libc::c_int,
    value: &T,
  ) -> Result<()> {
    syscall!(setsockopt(
      self.handle,
      level,
      name,
      (value as *const T).cast(),
      mem::size_of::<T>() as libc::socklen_t,
    ))
    .map_err(Error::UnsupportedOption)?;
    Ok(())
  }

  /// The local address the socket is bound to.
  pub fn local_addr<A: Address>(&self) -> Result<A> {
    // SAFETY: zero is a valid state for every field of sockaddr_storage.
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    syscall!(getsockname(
      self.handle,
      (&mut storage as *mut libc::sockaddr_storage).cast(),
      &mut len,
    ))
    .map_err(Error::Io)?;
    A::from_storage(&storage, len)
  }

  /// The address of the remote peer, if the socket is connected.
  pub fn peer_addr<A: Address>(&self) -> Result<A> {
    // SAFETY: zero is a valid state for every field of sockaddr_storage.
    let mut storage: libc::sockaddr_storage = unsafe { mem::zeroed() };
    let mut len = mem::size_of::<libc::sockaddr_storage>() as libc::socklen_t;
    syscall!(getpeername(
      self.handle,
      (&mut storage as *mut libc::sockaddr_storage).cast(),
      &mut len,
    ))
    .map_err(Error::Io)?;
    A::from_storage(&storage, len)
  }
}

impl Default for Socket {
  fn default() -> Socket {
    Socket::invalid()
  }
}

impl Drop for Socket {
  fn drop(&mut self) {
    if self.is_open() {
      // Best effort; an error from close on drop has nowhere to go.
      let _ = syscall!(close(self.handle));
    }
  }
}

impl AsRawFd for Socket {
  fn as_raw_fd(&self) -> RawFd {
    self.handle
  }
}

impl FromRawFd for Socket {
  /// Wraps an externally-obtained handle, claiming ownership of it. No
  /// syscalls are made.
  unsafe fn from_raw_fd(fd: RawFd) -> Socket {
    Socket { handle: fd }
  }
}

impl IntoRawFd for Socket {
  /// Disowns the handle without closing it.
  fn into_raw_fd(mut self) -> RawFd {
    mem::replace(&mut self.handle, INVALID)
  }
}
