//! Reliable streaming semantics on top of [`Socket`].

use std::io::{self, IoSlice, IoSliceMut, Read, Write};
use std::marker::PhantomData;
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::time::Duration;

use crate::addr::{Address, Inet6Address, InetAddress, UnixAddress};
use crate::error::{Error, Result};
use crate::socket::{Shutdown, Socket};

/// A connected, stream-oriented socket for one address family.
///
/// The family shows up only in the type parameter - no runtime behavior
/// differs between instantiations. The parameter exists so IPv4, IPv6 and
/// local endpoints cannot be mixed on one object by accident.
///
/// I/O methods take `&mut self`: a single value is not meant for
/// unsynchronized concurrent use. To read and write from different
/// threads, [`try_clone`](StreamSocket::try_clone) the socket - each clone
/// is an independent owner of the same connection, and the two owners need
/// no coordination for the data transfer itself.
///
/// # Examples
///
/// ```no_run
/// use strand::{Result, Shutdown, UnixSocket};
///
/// fn split() -> Result<()> {
///     let (mut local, _peer) = UnixSocket::pair()?;
///     let mut writer = local.try_clone()?;
///
///     let handle = std::thread::spawn(move || writer.write_n(b"from the clone"));
///
///     let mut buf = [0u8; 64];
///     let n = local.read(&mut buf)?;
///     handle.join().unwrap()?;
///     # let _ = n;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct StreamSocket<A: Address> {
  sock: Socket,
  _family: PhantomData<A>,
}

/// An IPv4 stream socket.
pub type TcpSocket = StreamSocket<InetAddress>;
/// An IPv6 stream socket.
pub type Tcp6Socket = StreamSocket<Inet6Address>;
/// A local-domain stream socket.
pub type UnixSocket = StreamSocket<UnixAddress>;

impl<A: Address> StreamSocket<A> {
  /// Creates an unconnected stream socket for this family.
  ///
  /// Applications normally get connected sockets from an acceptor or
  /// connector instead; this exists for callers assembling the pieces
  /// themselves.
  pub fn create() -> Result<Self> {
    let sock = Socket::create(A::FAMILY as libc::c_int, libc::SOCK_STREAM, 0)?;
    Ok(Self::from_socket(sock))
  }

  /// Wraps an already-produced handle owner (typically from accept) into a
  /// stream socket. No syscalls are made; this only takes ownership.
  pub fn from_socket(sock: Socket) -> Self {
    StreamSocket { sock, _family: PhantomData }
  }

  /// Creates a pair of connected stream sockets directly from the OS.
  ///
  /// Reliable for the local/Unix domain; elsewhere the OS error is
  /// surfaced.
  pub fn pair() -> Result<(Self, Self)> {
    let (a, b) = Socket::pair(A::FAMILY as libc::c_int, libc::SOCK_STREAM, 0)?;
    Ok((Self::from_socket(a), Self::from_socket(b)))
  }

  /// Borrows the underlying handle owner.
  pub fn socket(&self) -> &Socket {
    &self.sock
  }

  /// Returns the underlying handle owner, giving up stream typing.
  pub fn into_socket(self) -> Socket {
    self.sock
  }

  /// Duplicates the connection into a second, independent owner.
  ///
  /// See [`Socket::try_clone`] for the ownership contract.
  pub fn try_clone(&self) -> Result<Self> {
    Ok(Self::from_socket(self.sock.try_clone()?))
  }

  /// Half-closes the connection.
  ///
  /// Callable through any owner, including a clone, to unblock a peer
  /// owner's in-flight read or write.
  pub fn shutdown(&self, how: Shutdown) -> Result<()> {
    self.sock.shutdown(how)
  }

  /// The local address this socket is bound to.
  pub fn local_addr(&self) -> Result<A> {
    self.sock.local_addr()
  }

  /// The address of the remote peer, if connected.
  pub fn peer_addr(&self) -> Result<A> {
    self.sock.peer_addr()
  }

  /// Reads once from the socket.
  ///
  /// Issues exactly one underlying `recv` and returns however many bytes
  /// it moved. A short read is success; `Ok(0)` means the peer closed its
  /// write side (end of stream).
  pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
    let n = syscall!(recv(
      self.sock.handle(),
      buf.as_mut_ptr().cast(),
      buf.len(),
      0,
    ))
    .map_err(Error::transfer)?;
    Ok(n as usize)
  }

  /// Reads until `buf` is full or the stream ends.
  ///
  /// Loops single reads over the remaining range. On success the count
  /// equals `buf.len()`; a smaller count means the peer closed after that
  /// many bytes, which is a legitimate shutdown, not an error. If an
  /// underlying call fails the error is returned immediately - no
  /// partial-progress count accompanies an error.
  pub fn read_n(&mut self, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
      match self.read(&mut buf[total..])? {
        0 => break,
        n => total += n,
      }
    }
    Ok(total)
  }

  /// Writes once to the socket.
  ///
  /// Issues exactly one underlying `send` and returns the number of bytes
  /// accepted, which may be less than `buf.len()`.
  pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
    let n =
      syscall!(send(self.sock.handle(), buf.as_ptr().cast(), buf.len(), 0))
        .map_err(Error::transfer)?;
    Ok(n as usize)
  }

  /// Writes the whole buffer.
  ///
  /// On success the count equals `buf.len()`. If an underlying call fails
  /// the error is returned immediately - no partial-progress count
  /// accompanies an error. A zero-byte send with bytes remaining is
  /// reported as a `WriteZero` I/O error rather than retried.
  pub fn write_n(&mut self, buf: &[u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
      match self.write(&buf[total..])? {
        0 => {
          return Err(Error::Io(io::Error::new(
            io::ErrorKind::WriteZero,
            "socket accepted no bytes",
          )));
        }
        n => total += n,
      }
    }
    Ok(total)
  }

  /// Reads into multiple discontiguous ranges in one underlying call,
  /// returning the total byte count across all of them. Error semantics
  /// match [`read`](StreamSocket::read).
  pub fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> Result<usize> {
    let n = syscall!(readv(
      self.sock.handle(),
      bufs.as_mut_ptr().cast::<libc::iovec>(),
      bufs.len() as libc::c_int,
    ))
    .map_err(Error::transfer)?;
    Ok(n as usize)
  }

  /// Writes from multiple discontiguous ranges in one underlying call,
  /// returning the total byte count across all of them. Error semantics
  /// match [`write`](StreamSocket::write).
  pub fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> Result<usize> {
    let n = syscall!(writev(
      self.sock.handle(),
      bufs.as_ptr().cast::<libc::iovec>(),
      bufs.len() as libc::c_int,
    ))
    .map_err(Error::transfer)?;
    Ok(n as usize)
  }

  /// Bounds how long a subsequent read may block before failing with
  /// [`Error::TimedOut`].
  ///
  /// Not every transport honors this; a failure to apply the
  /// configuration is reported by this call itself.
  pub fn read_timeout(&self, timeout: Duration) -> Result<()> {
    self.sock.set_option(
      libc::SOL_SOCKET,
      libc::SO_RCVTIMEO,
      &timeval_from(timeout),
    )
  }

  /// Bounds how long a subsequent write may block before failing with
  /// [`Error::TimedOut`].
  pub fn write_timeout(&self, timeout: Duration) -> Result<()> {
    self.sock.set_option(
      libc::SOL_SOCKET,
      libc::SO_SNDTIMEO,
      &timeval_from(timeout),
    )
  }

  /// Whether `TCP_NODELAY` is set (send coalescing disabled).
  pub fn nodelay(&self) -> Result<bool> {
    let on: libc::c_int =
      self.sock.get_option(libc::IPPROTO_TCP, libc::TCP_NODELAY)?;
    Ok(on != 0)
  }

  /// Enables or disables `TCP_NODELAY`. Thin pass-through to the option
  /// surface; transports without the option report it as unsupported.
  pub fn set_nodelay(&self, on: bool) -> Result<()> {
    self.sock.set_option(
      libc::IPPROTO_TCP,
      libc::TCP_NODELAY,
      &(on as libc::c_int),
    )
  }
}

fn timeval_from(dur: Duration) -> libc::timeval {
  libc::timeval {
    tv_sec: dur.as_secs() as libc::time_t,
    tv_usec: dur.subsec_micros() as libc::suseconds_t,
  }
}

impl<A: Address> Read for StreamSocket<A> {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    StreamSocket::read(self, buf).map_err(io::Error::from)
  }

  fn read_vectored(&mut self, bufs: &mut [IoSliceMut<'_>]) -> io::Result<usize> {
    StreamSocket::read_vectored(self, bufs).map_err(io::Error::from)
  }
}

impl<A: Address> Write for StreamSocket<A> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    StreamSocket::write(self, buf).map_err(io::Error::from)
  }

  fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> io::Result<usize> {
    StreamSocket::write_vectored(self, bufs).map_err(io::Error::from)
  }

  fn flush(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<A: Address> AsRawFd for StreamSocket<A> {
  fn as_raw_fd(&self) -> RawFd {
    self.sock.as_raw_fd()
  }
}

impl<A: Address> FromRawFd for StreamSocket<A> {
  /// Wraps an externally-obtained handle, claiming ownership of it. No
  /// syscalls are made.
  unsafe fn from_raw_fd(fd: RawFd) -> Self {
    Self::from_socket(unsafe { Socket::from_raw_fd(fd) })
  }
}

impl<A: Address> IntoRawFd for StreamSocket<A> {
  /// Disowns the handle without closing it.
  fn into_raw_fd(self) -> RawFd {
    self.sock.into_raw_fd()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timeval_conversion_splits_seconds_and_micros() {
    let tv = timeval_from(Duration::from_millis(1250));
    assert_eq!(tv.tv_sec, 1);
    assert_eq!(tv.tv_usec, 250_000);
  }
}
