//! Internet-family addresses (IPv4 and IPv6).

use std::ffi::CStr;
use std::fmt;
use std::io;
use std::mem;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};

use super::{Address, lookup};

// inet_ntop needs 16 bytes for an IPv4 text form and 46 for IPv6.
const INET_ADDRSTRLEN: usize = 16;
const INET6_ADDRSTRLEN: usize = 46;

// The pinned libc build does not expose `inet_ntop`, so bind the C symbol
// directly. Signature matches POSIX / libc's own declaration.
unsafe extern "C" {
  fn inet_ntop(
    af: libc::c_int,
    src: *const libc::c_void,
    dst: *mut libc::c_char,
    size: libc::socklen_t,
  ) -> *const libc::c_char;
}

/// An IPv4 endpoint: 32-bit host address plus 16-bit port.
///
/// Wraps the OS binary form (`sockaddr_in`) directly, so the value can be
/// handed to the socket layer without conversion.
#[derive(Clone, Copy)]
pub struct InetAddress {
  addr: libc::sockaddr_in,
}

impl InetAddress {
  /// Creates an address from structured fields.
  pub fn new(host: Ipv4Addr, port: u16) -> Self {
    // SAFETY: zero is a valid state for every field of sockaddr_in.
    let mut addr: libc::sockaddr_in = unsafe { mem::zeroed() };
    #[cfg(bsdish)]
    {
      addr.sin_len = mem::size_of::<libc::sockaddr_in>() as u8;
    }
    addr.sin_family = Self::FAMILY;
    addr.sin_port = port.to_be();
    addr.sin_addr = libc::in_addr { s_addr: u32::from(host).to_be() };
    InetAddress { addr }
  }

  /// The wildcard address (`INADDR_ANY`) on the given port.
  pub fn any(port: u16) -> Self {
    Self::new(Ipv4Addr::UNSPECIFIED, port)
  }

  /// The loopback address on the given port.
  pub fn loopback(port: u16) -> Self {
    Self::new(Ipv4Addr::LOCALHOST, port)
  }

  /// Resolves a host given as a literal or a name, plus a port.
  ///
  /// A literal like `"127.0.0.1"` is parsed directly, without touching the
  /// name service. Anything else goes through the platform resolver,
  /// restricted to IPv4 stream entries, and the first result wins.
  pub fn resolve(host: &str, port: u16) -> Result<Self> {
    if let Ok(literal) = host.parse::<Ipv4Addr>() {
      return Ok(Self::new(literal, port));
    }
    let storage = lookup(host, libc::AF_INET)?;
    let mut resolved = Self::from_storage(
      &storage,
      mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
    )?;
    resolved.addr.sin_port = port.to_be();
    Ok(resolved)
  }

  /// The host part.
  pub fn address(&self) -> Ipv4Addr {
    Ipv4Addr::from(u32::from_be(self.addr.sin_addr.s_addr))
  }

  /// The port part, in host byte order.
  pub fn port(&self) -> u16 {
    u16::from_be(self.addr.sin_port)
  }
}

impl Address for InetAddress {
  const FAMILY: libc::sa_family_t = libc::AF_INET as libc::sa_family_t;

  fn as_sockaddr(&self) -> *const libc::sockaddr {
    (&self.addr as *const libc::sockaddr_in).cast()
  }

  fn sockaddr_len(&self) -> libc::socklen_t {
    mem::size_of::<libc::sockaddr_in>() as libc::socklen_t
  }

  fn from_storage(
    storage: &libc::sockaddr_storage,
    len: libc::socklen_t,
  ) -> Result<Self> {
    if storage.ss_family != Self::FAMILY
      || (len as usize) < mem::size_of::<libc::sockaddr_in>()
    {
      return Err(Error::Io(io::Error::from_raw_os_error(libc::EAFNOSUPPORT)));
    }
    // SAFETY: the family check guarantees the storage holds a sockaddr_in,
    // which fits in sockaddr_storage by design.
    let addr = unsafe {
      *(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_in>()
    };
    Ok(InetAddress { addr })
  }
}

impl fmt::Display for InetAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut buf = [0 as libc::c_char; INET_ADDRSTRLEN];
    // SAFETY: buf holds INET_ADDRSTRLEN bytes, the documented maximum for
    // an IPv4 text form; a non-null return is NUL-terminated within buf.
    let text = unsafe {
      let ptr = inet_ntop(
        libc::AF_INET,
        (&self.addr.sin_addr as *const libc::in_addr).cast(),
        buf.as_mut_ptr(),
        buf.len() as libc::socklen_t,
      );
      if ptr.is_null() { None } else { Some(CStr::from_ptr(ptr)) }
    };
    match text {
      Some(text) => write!(f, "{}:{}", text.to_string_lossy(), self.port()),
      None => write!(f, "<unknown>:{}", self.port()),
    }
  }
}

impl fmt::Debug for InetAddress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("InetAddress")
      .field("address", &self.address())
      .field("port", &self.port())
      .finish()
  }
}

impl PartialEq for InetAddress {
  fn eq(&self, other: &Self) -> bool {
    self.addr.sin_addr.s_addr == other.addr.sin_addr.s_addr
      && self.addr.sin_port == other.addr.sin_port
  }
}

impl Eq for InetAddress {}

/// An IPv6 endpoint: 128-bit host address, port, flow label and scope.
#[derive(Clone, Copy)]
pub struct Inet6Address {
  addr: libc::sockaddr_in6,
}

impl Inet6Address {
  /// Creates an address from structured fields.
  pub fn new(host: Ipv6Addr, port: u16) -> Self {
    // SAFETY: zero is a valid state for every field of sockaddr_in6.
    let mut addr: libc::sockaddr_in6 = unsafe { mem::zeroed() };
    #[cfg(bsdish)]
    {
      addr.sin6_len = mem::size_of::<libc::sockaddr_in6>() as u8;
    }
    addr.sin6_family = Self::FAMILY;
    addr.sin6_port = port.to_be();
    addr.sin6_addr = libc::in6_addr { s6_addr: host.octets() };
    Inet6Address { addr }
  }

  /// The wildcard address (`in6addr_any`) on the given port.
  pub fn any(port: u16) -> Self {
    Self::new(Ipv6Addr::UNSPECIFIED, port)
  }

  /// The loopback address (`::1`) on the given port.
  pub fn loopback(port: u16) -> Self {
    Self::new(Ipv6Addr::LOCALHOST, port)
  }

  /// Resolves a host given as a literal or a name, plus a port.
  ///
  /// Same contract as [`InetAddress::resolve`], restricted to IPv6 stream
  /// entries.
  pub fn resolve(host: &str, port: u16) -> Result<Self> {
    if let Ok(literal) = host.parse::<Ipv6Addr>() {
      return Ok(Self::new(literal, port));
    }
    let storage = lookup(host, libc::AF_INET6)?;
    let mut resolved = Self::from_storage(
      &storage,
      mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t,
    )?;
    resolved.addr.sin6_port = port.to_be();
    Ok(resolved)
  }

  /// The host part.
  pub fn address(&self) -> Ipv6Addr {
    Ipv6Addr::from(self.addr.sin6_addr.s6_addr)
  }

  /// The port part, in host byte order.
  pub fn port(&self) -> u16 {
    u16::from_be(self.addr.sin6_port)
  }
}

impl Address for Inet6Address {
  const FAMILY: libc::sa_family_t = libc::AF_INET6 as libc::sa_family_t;

  fn as_sockaddr(&self) -> *const libc::sockaddr {
    (&self.addr as *const libc::sockaddr_in6).cast()
  }

  fn sockaddr_len(&self) -> libc::socklen_t {
    mem::size_of::<libc::sockaddr_in6>() as libc::socklen_t
  }

  fn from_storage(
    storage: &libc::sockaddr_storage,
    len: libc::socklen_t,
  ) -> Result<Self> {
    if storage.ss_family != Self::FAMILY
      || (len as usize) < mem::size_of::<libc::sockaddr_in6>()
    {
      return Err(Error::Io(io::Error::from_raw_os_error(libc::EAFNOSUPPORT)));
    }
    // SAFETY: the family check guarantees the storage holds a
    // sockaddr_in6, which fits in sockaddr_storage by design.
    let addr = unsafe {
      *(storage as *const libc::sockaddr_storage).cast::<libc::sockaddr_in6>()
    };
    Ok(Inet6Address { addr })
  }
}

impl fmt::Display for Inet6Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut buf = [0 as libc::c_char; INET6_ADDRSTRLEN];
    // SAFETY: buf holds INET6_ADDRSTRLEN bytes, the documented maximum
    // for an IPv6 text form; a non-null return is NUL-terminated in buf.
    let text = unsafe {
      let ptr = inet_ntop(
        libc::AF_INET6,
        (&self.addr.sin6_addr as *const libc::in6_addr).cast(),
        buf.as_mut_ptr(),
        buf.len() as libc::socklen_t,
      );
      if ptr.is_null() { None } else { Some(CStr::from_ptr(ptr)) }
    };
    match text {
      Some(text) => write!(f, "[{}]:{}", text.to_string_lossy(), self.port()),
      None => write!(f, "[<unknown>]:{}", self.port()),
    }
  }
}

impl fmt::Debug for Inet6Address {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Inet6Address")
      .field("address", &self.address())
      .field("port", &self.port())
      .field("scope_id", &self.addr.sin6_scope_id)
      .finish()
  }
}

impl PartialEq for Inet6Address {
  fn eq(&self, other: &Self) -> bool {
    self.addr.sin6_addr.s6_addr == other.addr.sin6_addr.s6_addr
      && self.addr.sin6_port == other.addr.sin6_port
      && self.addr.sin6_scope_id == other.addr.sin6_scope_id
  }
}

impl Eq for Inet6Address {}
