use std::thread;

use crossbeam_channel::bounded;
use strand::{Error, InetAddress, Shutdown, UnixAddress};
use strand_net::{Acceptor, TcpAcceptor, UnixAcceptor, connector};

#[test]
fn test_tcp_echo_roundtrip() {
  let acceptor =
    TcpAcceptor::open(&InetAddress::loopback(0)).expect("open acceptor");
  let local = acceptor.local_addr().expect("bound address");
  assert_ne!(local.port(), 0);

  let (peer_tx, peer_rx) = bounded(1);
  let server = thread::spawn(move || {
    let (mut stream, peer) = acceptor.accept().expect("accept");
    peer_tx.send(peer).unwrap();

    let mut buf = [0u8; 512];
    loop {
      let n = stream.read(&mut buf).expect("server read");
      if n == 0 {
        break;
      }
      stream.write_n(&buf[..n]).expect("server write");
    }
  });

  let mut client = connector::connect(&local).expect("connect");

  let payload: Vec<u8> = (0..512).map(|_| fastrand::u8(..)).collect();
  client.write_n(&payload).expect("client write");

  let mut echoed = vec![0u8; payload.len()];
  assert_eq!(client.read_n(&mut echoed).expect("client read"), payload.len());
  assert_eq!(echoed, payload);

  // The peer the server saw is the client's own local endpoint.
  let accepted_peer = peer_rx.recv().unwrap();
  assert_eq!(accepted_peer, client.local_addr().expect("local addr"));

  client.shutdown(Shutdown::Write).unwrap();
  server.join().unwrap();
}

#[test]
fn test_unix_acceptor_roundtrip() {
  let path = format!("/tmp/strand_accept_{}.sock", std::process::id());
  let _ = std::fs::remove_file(&path);
  let addr = UnixAddress::new(&path).expect("path fits");

  let acceptor = UnixAcceptor::open(&addr).expect("open local acceptor");
  let server = thread::spawn(move || {
    let (mut stream, _peer) = acceptor.accept().expect("accept");
    let mut buf = [0u8; 5];
    assert_eq!(stream.read_n(&mut buf).expect("read"), 5);
    stream.write_n(&buf).expect("write");
  });

  let mut client = connector::connect(&addr).expect("connect locally");
  client.write_n(b"hello").unwrap();

  let mut buf = [0u8; 5];
  assert_eq!(client.read_n(&mut buf).unwrap(), 5);
  assert_eq!(&buf, b"hello");

  server.join().unwrap();
  let _ = std::fs::remove_file(&path);
}

#[test]
fn test_connect_refused_is_classified() {
  // Bind a port, then drop the listener so nothing is listening there.
  let acceptor = TcpAcceptor::open(&InetAddress::loopback(0)).unwrap();
  let local = acceptor.local_addr().unwrap();
  drop(acceptor);

  let err = connector::connect(&local).expect_err("nothing listens there");
  assert!(matches!(err, Error::Connect(_)), "got {err:?}");
}

#[test]
fn test_explicit_backlog() {
  let acceptor: Acceptor<InetAddress> =
    Acceptor::open_with_backlog(&InetAddress::loopback(0), 4).expect("open");
  assert!(acceptor.socket().is_open());
}
