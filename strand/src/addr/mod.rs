//! Family-polymorphic socket addresses.
//!
//! An [`Address`] is an immutable value describing an endpoint - host and
//! port for the internet families, a filesystem path for the local domain -
//! independent of any socket. The trait captures the minimum an address
//! family must provide: a family tag, the binary form handed to the OS, and
//! reconstruction from storage an OS call filled in. No runtime behavior
//! differs between families; the abstraction exists so endpoints of
//! different families cannot be mixed on one socket by accident.

use std::ffi::CString;
use std::fmt;
use std::mem;
use std::ptr;

use crate::error::{Error, Result};

mod inet;
mod unix;

pub use inet::{Inet6Address, InetAddress};
pub use unix::UnixAddress;

/// Minimum operations an address family must provide.
///
/// Implementations are plain immutable values; a given value never refers
/// to a socket, only to an endpoint.
pub trait Address: Clone + fmt::Debug + fmt::Display + Sized {
  /// Address family tag (`AF_*`) for this kind of endpoint.
  const FAMILY: libc::sa_family_t;

  /// Pointer to the binary representation, valid as long as `self` is.
  fn as_sockaddr(&self) -> *const libc::sockaddr;

  /// Length in bytes of the binary representation.
  fn sockaddr_len(&self) -> libc::socklen_t;

  /// Rebuilds an address from storage an OS call filled in.
  ///
  /// Fails if the storage does not carry this implementation's family.
  fn from_storage(
    storage: &libc::sockaddr_storage,
    len: libc::socklen_t,
  ) -> Result<Self>;
}

/// Full name-service resolution, restricted to stream entries of the given
/// family. The first matching result wins.
pub(crate) fn lookup(
  host: &str,
  family: libc::c_int,
) -> Result<libc::sockaddr_storage> {
  let host =
    CString::new(host).map_err(|_| Error::malformed("host name contains NUL"))?;

  // SAFETY: zero is a valid state for every field of addrinfo; only the
  // hint fields set below are read by getaddrinfo.
  let mut hints: libc::addrinfo = unsafe { mem::zeroed() };
  hints.ai_family = family;
  hints.ai_socktype = libc::SOCK_STREAM;

  tracing::trace!(host = %host.to_string_lossy(), family, "name service lookup");

  let mut res: *mut libc::addrinfo = ptr::null_mut();
  // SAFETY: host is NUL-terminated and hints/res outlive the call.
  let err = unsafe {
    libc::getaddrinfo(host.as_ptr(), ptr::null(), &hints, &mut res)
  };
  if err != 0 {
    return Err(Error::from_gai(err));
  }

  // SAFETY: a zero return guarantees res points at a non-empty list whose
  // entries match the hints; every entry's ai_addr holds ai_addrlen valid
  // bytes, which fit in sockaddr_storage by design.
  let storage = unsafe {
    let mut storage: libc::sockaddr_storage = mem::zeroed();
    ptr::copy_nonoverlapping(
      (*res).ai_addr.cast::<u8>(),
      (&mut storage as *mut libc::sockaddr_storage).cast::<u8>(),
      (*res).ai_addrlen as usize,
    );
    libc::freeaddrinfo(res);
    storage
  };
  Ok(storage)
}
