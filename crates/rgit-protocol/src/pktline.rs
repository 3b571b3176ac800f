//! Pkt-line protocol framing.
//!
//! Each packet is prefixed with a 4-hex-digit length that includes the 4
//! bytes of the length field itself. `0000` is a flush packet ending a
//! section; lengths 1 through 3 are invalid.

use std::io::{Read, Write};

use crate::ProtocolError;

/// Maximum data per packet (65520 - 4 = 65516).
pub const MAX_PKT_DATA_LEN: usize = 65516;

/// Maximum packet length including the 4-byte header.
pub const MAX_PKT_LEN: usize = 65520;

/// One packet as read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PktLine {
    /// Normal data line.
    Data(Vec<u8>),
    /// Flush packet (0000), end of section.
    Flush,
}

/// Pkt-line reader.
pub struct PktLineReader<R> {
    reader: R,
}

impl<R: Read> PktLineReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read one pkt-line. Returns the packet type.
    pub fn read_pkt(&mut self) -> Result<PktLine, ProtocolError> {
        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ProtocolError::Violation("unexpected EOF reading pkt-line length".into())
            } else {
                ProtocolError::Io(e)
            }
        })?;

        let len_str = std::str::from_utf8(&len_buf).map_err(|_| {
            ProtocolError::InvalidPktLine(format!("invalid pkt-line length bytes: {:?}", len_buf))
        })?;

        let len = u16::from_str_radix(len_str, 16).map_err(|_| {
            ProtocolError::InvalidPktLine(format!("invalid pkt-line length: {:?}", len_str))
        })?;

        match len {
            0 => Ok(PktLine::Flush),
            1..=3 => Err(ProtocolError::InvalidPktLine(format!(
                "pkt-line length {} is invalid (minimum data packet is 4)",
                len
            ))),
            _ => {
                let data_len = (len as usize) - 4;
                if data_len > MAX_PKT_DATA_LEN {
                    return Err(ProtocolError::InvalidPktLine(format!(
                        "pkt-line too long: {} bytes",
                        data_len
                    )));
                }
                let mut data = vec![0u8; data_len];
                self.reader.read_exact(&mut data)?;
                Ok(PktLine::Data(data))
            }
        }
    }

    /// Read one data line. Returns None for a flush packet.
    pub fn read_line(&mut self) -> Result<Option<Vec<u8>>, ProtocolError> {
        match self.read_pkt()? {
            PktLine::Data(data) => Ok(Some(data)),
            PktLine::Flush => Ok(None),
        }
    }

    /// Read all data lines until a flush packet.
    pub fn read_until_flush(&mut self) -> Result<Vec<Vec<u8>>, ProtocolError> {
        let mut lines = Vec::new();
        while let PktLine::Data(data) = self.read_pkt()? {
            lines.push(data);
        }
        Ok(lines)
    }
}

/// Pkt-line writer.
pub struct PktLineWriter<W> {
    writer: W,
}

impl<W: Write> PktLineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the writer and return the inner value.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a data packet.
    pub fn write_line(&mut self, data: &[u8]) -> Result<(), ProtocolError> {
        if data.len() > MAX_PKT_DATA_LEN {
            return Err(ProtocolError::InvalidPktLine(format!(
                "data too long for pkt-line: {} bytes (max {})",
                data.len(),
                MAX_PKT_DATA_LEN
            )));
        }

        let len = (data.len() + 4) as u16;
        write!(self.writer, "{:04x}", len)?;
        self.writer.write_all(data)?;
        Ok(())
    }

    /// Write a text line (appends \n if not present).
    pub fn write_text(&mut self, text: &str) -> Result<(), ProtocolError> {
        if text.ends_with('\n') {
            self.write_line(text.as_bytes())
        } else {
            let mut data = text.as_bytes().to_vec();
            data.push(b'\n');
            self.write_line(&data)
        }
    }

    /// Write a flush packet (0000).
    pub fn write_flush(&mut self) -> Result<(), ProtocolError> {
        self.writer.write_all(b"0000")?;
        Ok(())
    }
}
