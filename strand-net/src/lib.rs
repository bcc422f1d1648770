//! Acceptor and connector collaborators for [`strand`] stream sockets.
//!
//! These produce connected [`StreamSocket`](strand::StreamSocket)s from
//! either side of a connection: an [`Acceptor`] binds, listens and accepts;
//! [`connector::connect`] resolves nothing itself but takes a concrete
//! [`Address`](strand::Address) and dials it. Both consume only the public
//! contract of the core crate.
//!
//! ```no_run
//! use strand::{InetAddress, Result};
//! use strand_net::{TcpAcceptor, connector};
//!
//! fn example() -> Result<()> {
//!     let acceptor = TcpAcceptor::open(&InetAddress::loopback(0))?;
//!     let local = acceptor.local_addr()?;
//!
//!     let mut client = connector::connect(&local)?;
//!     let (mut served, peer) = acceptor.accept()?;
//!
//!     client.write_n(b"hi")?;
//!     let mut buf = [0u8; 2];
//!     served.read_n(&mut buf)?;
//!     # let _ = peer;
//!     Ok(())
//! }
//! ```

mod acceptor;
pub mod connector;

pub use acceptor::Acceptor;

/// An IPv4 acceptor.
pub type TcpAcceptor = Acceptor<strand::InetAddress>;
/// An IPv6 acceptor.
pub type Tcp6Acceptor = Acceptor<strand::Inet6Address>;
/// A local-domain acceptor.
pub type UnixAcceptor = Acceptor<strand::UnixAddress>;
