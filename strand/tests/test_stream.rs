use std::io::{IoSlice, IoSliceMut};
use std::thread;
use std::time::Duration;

use strand::{Error, Shutdown, TcpSocket, UnixSocket};

#[test]
fn test_write_n_read_n_roundtrip() {
  let (mut a, mut b) = UnixSocket::pair().expect("socketpair");

  // Larger than the kernel socket buffer so both loops have to iterate.
  let n = 256 * 1024;
  let payload: Vec<u8> = (0..n).map(|_| fastrand::u8(..)).collect();

  let writer = thread::spawn(move || {
    let sent = a.write_n(&payload).expect("write_n");
    assert_eq!(sent, payload.len(), "write_n reports the full count");
    payload
  });

  let mut buf = vec![0u8; n];
  let got = b.read_n(&mut buf).expect("read_n");
  assert_eq!(got, n, "read_n reports the full count");

  let payload = writer.join().unwrap();
  assert_eq!(buf, payload);
}

#[test]
fn test_eof_short_read_is_not_an_error() {
  let (mut a, mut b) = UnixSocket::pair().unwrap();

  a.write_n(b"abc").unwrap();
  drop(a); // peer closes after 3 of the 8 requested bytes

  let mut buf = [0u8; 8];
  let got = b.read_n(&mut buf).expect("eof is a short count, not an error");
  assert_eq!(got, 3, "the count distinguishes a short read from a full one");
  assert_eq!(&buf[..got], b"abc");

  // The stream stays ended; the next read reports end-of-stream again
  // instead of spinning.
  assert_eq!(b.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_single_call_read_may_be_short() {
  let (mut a, mut b) = UnixSocket::pair().unwrap();
  a.write_n(b"xy").unwrap();

  let mut buf = [0u8; 16];
  let got = b.read(&mut buf).expect("read");
  assert!(got > 0 && got <= 2, "short transfer is success, got {got}");
}

#[test]
fn test_vectored_write_totals_all_ranges() {
  let (mut a, mut b) = UnixSocket::pair().unwrap();

  let parts: [&[u8]; 3] = [b"alpha", b"beta", b"gamma"];
  let total: usize = parts.iter().map(|p| p.len()).sum();
  let slices =
    [IoSlice::new(parts[0]), IoSlice::new(parts[1]), IoSlice::new(parts[2])];

  let sent = a.write_vectored(&slices).expect("writev");
  assert_eq!(sent, total);

  let mut buf = vec![0u8; total];
  assert_eq!(b.read_n(&mut buf).unwrap(), total);
  assert_eq!(buf, b"alphabetagamma");
}

#[test]
fn test_vectored_read_fills_ranges_in_order() {
  let (mut a, mut b) = UnixSocket::pair().unwrap();
  a.write_n(b"0123456789").unwrap();

  let (mut head, mut tail) = ([0u8; 4], [0u8; 6]);
  let mut slices = [IoSliceMut::new(&mut head), IoSliceMut::new(&mut tail)];
  let got = b.read_vectored(&mut slices).expect("readv");
  assert_eq!(got, 10);
  assert_eq!(&head, b"0123");
  assert_eq!(&tail, b"456789");
}

#[test]
fn test_clone_is_an_independent_owner() {
  let (mut a, b) = UnixSocket::pair().unwrap();
  let mut b2 = b.try_clone().expect("clone");

  // Closing the original must not invalidate I/O on the clone.
  drop(b);
  a.write_n(b"ping").unwrap();
  let mut buf = [0u8; 4];
  assert_eq!(b2.read_n(&mut buf).unwrap(), 4);
  assert_eq!(&buf, b"ping");

  // Only once the last owner closes does the peer see end of stream.
  drop(b2);
  assert_eq!(a.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_shutdown_write_signals_eof() {
  let (mut a, mut b) = UnixSocket::pair().unwrap();
  a.write_n(b"last").unwrap();
  a.shutdown(Shutdown::Write).expect("shutdown");

  let mut buf = [0u8; 16];
  assert_eq!(b.read_n(&mut buf).unwrap(), 4);
  assert_eq!(b.read(&mut buf).unwrap(), 0);

  // The other direction still works after the half-close.
  b.write_n(b"reply").unwrap();
  assert_eq!(a.read_n(&mut buf[..5]).unwrap(), 5);
  assert_eq!(&buf[..5], b"reply");
}

#[test]
fn test_shutdown_from_clone_unblocks_reader() {
  let (_a, mut b) = UnixSocket::pair().unwrap();
  let signal = b.try_clone().expect("clone");

  let reader = thread::spawn(move || {
    let mut buf = [0u8; 1];
    b.read(&mut buf)
  });

  // Give the reader time to block in recv before signaling.
  thread::sleep(Duration::from_millis(50));
  signal.shutdown(Shutdown::Read).expect("shutdown through the clone");

  let got = reader.join().unwrap().expect("read unblocked by shutdown");
  assert_eq!(got, 0);
}

#[test]
fn test_write_after_peer_gone_is_an_io_error() {
  let (mut a, b) = UnixSocket::pair().unwrap();
  drop(b);

  let err = loop {
    match a.write_n(b"data") {
      Ok(_) => continue,
      Err(e) => break e,
    }
  };
  assert!(matches!(err, Error::Io(_)), "got {err:?}");
}

#[test]
fn test_nodelay_passthrough() {
  let stream = TcpSocket::create().expect("tcp socket");
  assert!(!stream.nodelay().expect("get TCP_NODELAY"));
  stream.set_nodelay(true).expect("set TCP_NODELAY");
  assert!(stream.nodelay().unwrap());
}

#[test]
fn test_nodelay_unsupported_on_local_sockets() {
  let (a, _b) = UnixSocket::pair().unwrap();
  let err = a.set_nodelay(true).expect_err("TCP option on a local socket");
  assert!(matches!(err, Error::UnsupportedOption(_)), "got {err:?}");
}
