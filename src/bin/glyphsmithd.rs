//! A length-prefixed TCP server around [`glyphsmith::generate`].
//!
//! One thread per connection, no shared mutable state beyond the logger —
//! every request is handled start to finish by the thread that accepted
//! it. This is a minimal carrier, not a general-purpose RPC framework.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use glyphsmith::{AtlasError, AtlasRequest};
use log::{debug, info, warn};

const DEFAULT_PORT: u16 = 7878;

fn main() {
    env_logger::init();

    let port = std::env::var("GLYPHSMITH_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let listener = match TcpListener::bind(("0.0.0.0", port)) {
        Ok(l) => l,
        Err(e) => {
            log::error!("failed to bind 0.0.0.0:{port}: {e}");
            std::process::exit(1);
        }
    };
    info!("glyphsmithd listening on port {port}");

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                thread::spawn(move || handle_connection(stream));
            }
            Err(e) => warn!("failed to accept connection: {e}"),
        }
    }
}

/// Reads one length-prefixed JSON [`AtlasRequest`], generates an atlas,
/// and writes back the PNG then the BMFont text, each framed the same
/// way. Drops the connection without writing anything on a malformed
/// request.
fn handle_connection(mut stream: TcpStream) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    debug!("accepted connection from {peer}");

    let request = match read_frame(&mut stream) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("failed to read request frame from {peer}: {e}");
            return;
        }
    };

    let req: AtlasRequest = match serde_json::from_slice(&request) {
        Ok(req) => req,
        Err(e) => {
            warn!("{peer}: {}", AtlasError::TransportDecodeError(e.to_string()));
            return;
        }
    };

    let out = glyphsmith::generate(&req);

    if let Err(e) = write_frame(&mut stream, &out.image) {
        warn!("failed to write image frame to {peer}: {e}");
        return;
    }
    if let Err(e) = write_frame(&mut stream, out.descriptor.as_bytes()) {
        warn!("failed to write descriptor frame to {peer}: {e}");
    }
}

/// Reads a 4-byte big-endian length prefix followed by that many bytes.
fn read_frame(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut len_bytes = [0u8; 4];
    stream.read_exact(&mut len_bytes)?;
    let len = u32::from_be_bytes(len_bytes) as usize;

    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf)?;
    Ok(buf)
}

/// Writes `data` prefixed with its length as a 4-byte big-endian integer.
fn write_frame(stream: &mut TcpStream, data: &[u8]) -> std::io::Result<()> {
    stream.write_all(&(data.len() as u32).to_be_bytes())?;
    stream.write_all(data)?;
    Ok(())
}
