use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use crate::battle::balance::Balance;

pub mod api;
pub mod routes;

pub const BIND_ENV_VAR: &str = "DUELIST_BIND";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

const MAX_REQUEST_BYTES: usize = 1 << 20;

pub fn bind_addr_from_env() -> String {
    std::env::var(BIND_ENV_VAR)
        .ok()
        .filter(|addr| !addr.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

pub fn run_server(bind_addr: &str, balance: &Balance) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    log::info!("duelist server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, balance) {
                    log::warn!("request error: {err}");
                }
            }
            Err(err) => log::warn!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, balance: &Balance) -> std::io::Result<()> {
    let raw = read_request(stream)?;
    if raw.is_empty() {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&raw);
    let (head, body) = split_head_body(&request);
    let request_line = head.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let response = routes::route_request(method, path, body, balance);
    log::info!("{method} {path} -> {}", response.status_code);
    stream.write_all(response.to_http_string().as_bytes())?;
    stream.flush()?;
    Ok(())
}

/// Reads until the header block and `Content-Length` bytes of body have arrived.
fn read_request(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut buffer = [0_u8; 16_384];
    let mut expected_len = None;
    loop {
        let bytes_read = stream.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        raw.extend_from_slice(&buffer[..bytes_read]);
        if raw.len() >= MAX_REQUEST_BYTES {
            break;
        }
        if expected_len.is_none() {
            expected_len = expected_request_len(&raw);
        }
        if expected_len.is_some_and(|expected| raw.len() >= expected) {
            break;
        }
    }
    Ok(raw)
}

/// Byte offset of the blank line ending the header block.
fn header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|window| window == b"\r\n\r\n")
}

/// Total request size once the header block is complete: head, separator and body.
fn expected_request_len(raw: &[u8]) -> Option<usize> {
    let end = header_end(raw)?;
    let head = String::from_utf8_lossy(&raw[..end]);
    Some(end + 4 + content_length(&head).unwrap_or(0))
}

fn content_length(head: &str) -> Option<usize> {
    head.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

fn split_head_body(request: &str) -> (&str, &str) {
    request
        .split_once("\r\n\r\n")
        .or_else(|| request.split_once("\n\n"))
        .unwrap_or((request, ""))
}
