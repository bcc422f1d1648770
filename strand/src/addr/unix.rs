//! Local-domain (Unix) addresses.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::slice;

use crate::error::{Error, Result};

use super::Address;

/// A local-domain endpoint: a filesystem path.
///
/// Wraps the OS binary form (`sockaddr_un`) plus its effective length. An
/// accepted peer may carry no path at all (an unnamed socket), in which
/// case [`path`](UnixAddress::path) is empty.
#[derive(Clone, Copy)]
pub struct UnixAddress {
  addr: libc::sockaddr_un,
  len: libc::socklen_t,
}

impl UnixAddress {
  /// Creates an address for the given filesystem path.
  ///
  /// Fails with a resolution-class error if the path does not fit in the
  /// OS path buffer or contains a NUL byte.
  pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
    let bytes = path.as_ref().as_os_str().as_bytes();

    // SAFETY: zero is a valid state for every field of sockaddr_un.
    let mut addr: libc::sockaddr_un = unsafe { mem::zeroed() };
    if bytes.len() >= addr.sun_path.len() {
      return Err(Error::malformed("socket path too long"));
    }
    if bytes.contains(&0) {
      return Err(Error::malformed("socket path contains NUL"));
    }

    addr.sun_family = Self::FAMILY;
    for (dst, src) in addr.sun_path.iter_mut().zip(bytes) {
      *dst = *src as libc::c_char;
    }

    let base = mem::size_of::<libc::sockaddr_un>() - addr.sun_path.len();
    let len = (base + bytes.len() + 1) as libc::socklen_t;
    #[cfg(bsdish)]
    {
      addr.sun_len = len as u8;
    }
    Ok(UnixAddress { addr, len })
  }

  /// The filesystem path of the endpoint; empty for unnamed sockets.
  pub fn path(&self) -> &Path {
    let raw = &self.addr.sun_path[..];
    let end = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    // SAFETY: c_char and u8 have identical size and alignment.
    let bytes =
      unsafe { slice::from_raw_parts(raw.as_ptr().cast::<u8>(), end) };
    Path::new(OsStr::from_bytes(bytes))
  }
}

impl Address for UnixAddress {
  const FAMILY: libc::sa_family_t = libc::AF_UNIX as libc::sa_family_t;

  fn as_sockaddr(&self) -> *const libc::sockaddr {
    (&self.addr as *const libc::sockaddr_un).cast()
  }

  fn sockaddr_len(&self) -> libc::socklen_t {
    self.len
  }

  fn from_storage(
    storage: &libc::sockaddr_storage,
    len: libc::socklen_t,
  ) -> Result<Self> {
    if storage.ss_family != Self::FAMILY {
      return Err(Error::Io(io::Error::from_raw_os_error(libc::EAFNOSUPPORT)));
    }
    // SAFETY: the family check guarantees the storage holds a sockaddr_un,
    // which fits in sockaddr_storage by design.
    let addr = unsafe {
      *(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_un>()
    };
    Ok(UnixAddress { addr, len })
  }
}

impl fmt::Display for UnixAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let path = self.path();
    if path.as_os_str().is_empty() {
      write!(f, "(unnamed)")
    } else {
      write!(f, "{}", path.display())
    }
  }
}

impl fmt::Debug for UnixAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UnixAddress").field("path", &self.path()).finish()
  }
}

impl PartialEq for UnixAddress {
  fn eq(&self, other: &Self) -> bool {
    self.path() == other.path()
  }
}

impl Eq for UnixAddress {}
