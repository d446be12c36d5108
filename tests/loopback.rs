//! Integration tests that exercise `DatagramEndpoint` and the session
//! controllers over real loopback UDP sockets, not the in-memory transport
//! doubles used by the unit tests.

use std::fs;
use std::io::Write;
use std::net::Ipv4Addr;
use std::thread;

use udpxfer::net::DatagramEndpoint;
use udpxfer::session;

#[test]
fn datagram_endpoint_binds_sends_and_times_out_over_loopback() {
    let server = DatagramEndpoint::bind_server(Ipv4Addr::LOCALHOST, 0).unwrap();
    let client = DatagramEndpoint::bind_client(Ipv4Addr::LOCALHOST, 0).unwrap();
    let server_addr = server.local_addr().unwrap();

    udpxfer::net::Transport::send(&client, b"probe", server_addr).unwrap();
    let (bytes, _peer) = udpxfer::net::Transport::recv(&server).unwrap();
    assert_eq!(bytes, b"probe");

    // Nothing else arrives: recv must time out rather than block forever.
    let err = udpxfer::net::Transport::recv(&server).unwrap_err();
    assert!(matches!(err, udpxfer::Error::Timeout));
}

#[test]
fn full_stack_transfer_over_loopback_round_trips_file_contents() {
    let workdir = tempfile::tempdir().unwrap();
    // `session::receive_file` writes into a `received_file/` directory
    // relative to the current directory, so the client side of this test
    // needs a private cwd.
    std::env::set_current_dir(workdir.path()).unwrap();

    let input_path = workdir.path().join("report.txt");
    let contents = b"the quick brown fox jumps over the lazy dog\n".repeat(50);
    fs::File::create(&input_path)
        .unwrap()
        .write_all(&contents)
        .unwrap();

    let server_endpoint = DatagramEndpoint::bind_server(Ipv4Addr::LOCALHOST, 0).unwrap();
    let server_addr = server_endpoint.local_addr().unwrap();
    let client_endpoint = DatagramEndpoint::bind_client(Ipv4Addr::LOCALHOST, 0).unwrap();

    let server_thread = thread::spawn(move || session::serve_client(&server_endpoint, &input_path));

    let output_path = workdir.path().join("report.txt");
    let client_thread = thread::spawn(move || {
        session::receive_file(
            &client_endpoint,
            Ipv4Addr::LOCALHOST,
            server_addr.port(),
            &output_path,
        )
    });

    server_thread.join().unwrap().expect("serve_client failed");
    client_thread.join().unwrap().expect("receive_file failed");

    let received = fs::read(workdir.path().join("received_file").join("report.txt")).unwrap();
    assert_eq!(received, contents);
}
