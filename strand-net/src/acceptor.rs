//! Server-side handle production: bind, listen, accept.

use std::marker::PhantomData;

use strand::{Address, Result, Socket, StreamSocket};

/// Produces connected [`StreamSocket`]s by binding to a local address,
/// listening, and accepting clients.
///
/// Establishment failures (socket creation, bind, listen, accept) are all
/// reported in the connection class of the core error taxonomy.
pub struct Acceptor<A: Address> {
  sock: Socket,
  _family: PhantomData<A>,
}

impl<A: Address> Acceptor<A> {
  /// Default listen backlog.
  pub const DEFAULT_BACKLOG: libc::c_int = 128;

  /// Opens an acceptor on the given local address with the default
  /// backlog.
  ///
  /// The listening address is marked reusable (`SO_REUSEADDR`) before the
  /// bind, so a restarted server does not trip over its predecessor's
  /// lingering connections.
  pub fn open(addr: &A) -> Result<Self> {
    Self::open_with_backlog(addr, Self::DEFAULT_BACKLOG)
  }

  /// Opens an acceptor with an explicit listen backlog.
  pub fn open_with_backlog(addr: &A, backlog: libc::c_int) -> Result<Self> {
    let sock = Socket::create(A::FAMILY as libc::c_int, libc::SOCK_STREAM, 0)?;
    sock.set_option(libc::SOL_SOCKET, libc::SO_REUSEADDR, &(1 as libc::c_int))?;
    sock.bind(addr)?;
    sock.listen(backlog)?;
    tracing::debug!(local = %addr, backlog, "listening");
    Ok(Acceptor { sock, _family: PhantomData })
  }

  /// Blocks until a client connects, returning the connected stream and
  /// the peer address.
  ///
  /// The accepted handle is wrapped with no further syscalls; the acceptor
  /// keeps listening and can be called again for the next client.
  pub fn accept(&self) -> Result<(StreamSocket<A>, A)> {
    let (sock, peer) = self.sock.accept::<A>()?;
    tracing::trace!(peer = %peer, "accepted connection");
    Ok((StreamSocket::from_socket(sock), peer))
  }

  /// The local address the acceptor is bound to. Useful after binding
  /// port 0 to learn the OS-assigned port.
  pub fn local_addr(&self) -> Result<A> {
    self.sock.local_addr()
  }

  /// Borrows the underlying handle owner.
  pub fn socket(&self) -> &Socket {
    &self.sock
  }
}
