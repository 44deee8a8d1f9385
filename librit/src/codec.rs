//! Canonical, deterministic binary encoding for content-addressable objects.
//!
//! Every object digest is computed over the bytes this module produces, so
//! the encoding must never depend on iteration order of a `HashMap` or on
//! anything else that isn't a property of the logical value. Fields are
//! written in a fixed order; variable-length fields are length-prefixed
//! with a little-endian `u64`.

use crate::error::RitResult;
use std::io::{self, Read, Write};

pub trait Encode {
    fn encode(&self, w: &mut dyn Write) -> io::Result<()>;
}

pub trait Decode: Sized {
    fn decode(r: &mut dyn Read) -> RitResult<Self>;
}

pub fn encode_to_vec(value: &impl Encode) -> Vec<u8> {
    let mut buf = Vec::new();
    value.encode(&mut buf).expect("encoding into a Vec<u8> cannot fail");
    buf
}

pub fn write_bytes(w: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
    w.write_all(&(bytes.len() as u64).to_le_bytes())?;
    w.write_all(bytes)
}

pub fn write_str(w: &mut dyn Write, s: &str) -> io::Result<()> {
    write_bytes(w, s.as_bytes())
}

pub fn read_bytes(r: &mut dyn Read) -> RitResult<Vec<u8>> {
    let mut len_buf = [0u8; 8];
    r.read_exact(&mut len_buf)?;
    let len = u64::from_le_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_string(r: &mut dyn Read) -> RitResult<String> {
    Ok(String::from_utf8(read_bytes(r)?)?)
}

pub fn write_u64(w: &mut dyn Write, n: u64) -> io::Result<()> {
    w.write_all(&n.to_le_bytes())
}

pub fn read_u64(r: &mut dyn Read) -> RitResult<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_roundtrip() {
        let mut buf = Vec::new();
        write_bytes(&mut buf, b"hello\0world").unwrap();
        let mut cursor = &buf[..];
        assert_eq!(read_bytes(&mut cursor).unwrap(), b"hello\0world");
    }

    #[test]
    fn u64_roundtrip() {
        let mut buf = Vec::new();
        write_u64(&mut buf, 1234567890).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(read_u64(&mut cursor).unwrap(), 1234567890);
    }
}
