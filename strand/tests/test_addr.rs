use std::net::Ipv4Addr;
use std::path::Path;

use proptest::prelude::*;
use strand::{Address, Error, Inet6Address, InetAddress, UnixAddress};

#[test]
fn test_inet_literal_roundtrip() {
  let addr =
    InetAddress::resolve("127.0.0.1", 8080).expect("literal must parse");
  assert_eq!(addr.address(), Ipv4Addr::new(127, 0, 0, 1));
  assert_eq!(addr.port(), 8080);
  assert_eq!(addr.to_string(), "127.0.0.1:8080");
}

#[test]
fn test_inet_structured_fields() {
  let addr = InetAddress::new(Ipv4Addr::new(192, 168, 1, 20), 443);
  assert_eq!(addr.to_string(), "192.168.1.20:443");
  assert_eq!(
    InetAddress::loopback(80),
    InetAddress::new(Ipv4Addr::LOCALHOST, 80)
  );
  assert_eq!(InetAddress::any(0).address(), Ipv4Addr::UNSPECIFIED);
}

#[test]
fn test_inet_resolve_name() {
  // localhost resolves from the hosts file, no network needed.
  let addr = InetAddress::resolve("localhost", 4321)
    .expect("failed to resolve localhost");
  assert_eq!(addr.port(), 4321);

  let text = addr.to_string();
  assert!(text.ends_with(":4321"), "expected addr:port, got {text}");
}

#[test]
fn test_resolve_failure_is_classified() {
  // RFC 2606 reserves .invalid for exactly this.
  let err = InetAddress::resolve("no-such-host.invalid", 80)
    .expect_err("must not resolve");
  assert!(matches!(err, Error::Resolution(_)), "got {err:?}");
}

#[test]
fn test_inet6_literal_roundtrip() {
  let addr = Inet6Address::resolve("::1", 443).expect("literal must parse");
  assert_eq!(addr.address(), std::net::Ipv6Addr::LOCALHOST);
  assert_eq!(addr.to_string(), "[::1]:443");
}

#[test]
fn test_unix_path_roundtrip() {
  let addr =
    UnixAddress::new("/tmp/strand_addr_test.sock").expect("path fits");
  assert_eq!(addr.path(), Path::new("/tmp/strand_addr_test.sock"));
  assert_eq!(addr.to_string(), "/tmp/strand_addr_test.sock");
}

#[test]
fn test_unix_path_too_long_is_malformed() {
  let long = "/tmp/".repeat(40);
  let err = UnixAddress::new(&long).expect_err("108 bytes is the limit");
  assert!(matches!(err, Error::Resolution(_)), "got {err:?}");
}

#[test]
fn test_from_storage_rejects_a_family_mismatch() {
  // ss_family stays AF_UNSPEC; neither internet family accepts it.
  let storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
  let len = std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;

  let err = InetAddress::from_storage(&storage, len).unwrap_err();
  assert!(matches!(err, Error::Io(_)), "got {err:?}");
  assert!(Inet6Address::from_storage(&storage, len).is_err());
}

proptest! {
  #[test]
  fn prop_inet_display_reparses_to_the_same_address(
    a in any::<u8>(),
    b in any::<u8>(),
    c in any::<u8>(),
    d in any::<u8>(),
    port in any::<u16>(),
  ) {
    let addr = InetAddress::new(Ipv4Addr::new(a, b, c, d), port);
    let text = addr.to_string();
    prop_assert_eq!(&text, &format!("{}.{}.{}.{}:{}", a, b, c, d, port));

    // Rendering is canonical, so resolving the literal gets us back.
    let (host, p) = text.rsplit_once(':').unwrap();
    let back = InetAddress::resolve(host, p.parse().unwrap()).unwrap();
    prop_assert_eq!(back, addr);
  }
}
