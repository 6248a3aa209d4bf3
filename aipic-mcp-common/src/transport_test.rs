//! Unit tests for transport configuration.

use super::transport::{Transport, TransportArgs, TransportMode};

#[test]
fn transport_default_is_stdio() {
    let transport = Transport::default();
    assert!(transport.is_stdio());
    assert!(!transport.is_http());
    assert_eq!(transport.port(), None);
}

#[test]
fn transport_stdio_constructor() {
    let transport = Transport::stdio();
    assert!(transport.is_stdio());
    assert_eq!(transport.to_string(), "stdio");
}

#[test]
fn transport_http_constructor() {
    let transport = Transport::http(3000);
    assert!(transport.is_http());
    assert!(!transport.is_stdio());
    assert_eq!(transport.port(), Some(3000));
    assert_eq!(transport.to_string(), "http (port 3000)");
}

#[test]
fn transport_args_default() {
    let args = TransportArgs::default();
    assert_eq!(args.transport, TransportMode::Stdio);
    assert_eq!(args.port, 8080);
}

#[test]
fn transport_args_into_transport_stdio() {
    let args = TransportArgs {
        transport: TransportMode::Stdio,
        port: 9999,
    };
    // Port is ignored for stdio.
    assert_eq!(args.into_transport(), Transport::Stdio);
}

#[test]
fn transport_args_into_transport_http() {
    let args = TransportArgs {
        transport: TransportMode::Http,
        port: 4242,
    };
    assert_eq!(args.into_transport(), Transport::Http { port: 4242 });
}
