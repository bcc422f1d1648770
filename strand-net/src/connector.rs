//! Client-side handle production: create and connect.

use strand::{Address, Result, StreamSocket};

/// Dials the given address and returns the connected stream.
///
/// Resolution is the caller's job (see
/// [`InetAddress::resolve`](strand::InetAddress::resolve)); this only
/// creates a socket for the address's family and connects it. Failures -
/// refused, unreachable, no route - come back in the connection class of
/// the core error taxonomy.
pub fn connect<A: Address>(addr: &A) -> Result<StreamSocket<A>> {
  let stream = StreamSocket::<A>::create()?;
  stream.socket().connect(addr)?;
  tracing::debug!(peer = %addr, "connected");
  Ok(stream)
}
