//! Script chunk parsing and encoding.
//!
//! A chunk is either a bare opcode or a data push together with its
//! payload. Decoding keeps the original push opcode so that re-encoding a
//! chunk reproduces its exact bytes.

use crate::opcodes::*;
use crate::ScriptError;

/// A single parsed element of a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub op: u8,
    /// The pushed bytes, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Append this chunk's wire bytes to `out`.
    pub fn append_to(&self, out: &mut Vec<u8>) {
        out.push(self.op);
        if let Some(data) = &self.data {
            match self.op {
                OP_PUSHDATA1 => out.push(data.len() as u8),
                OP_PUSHDATA2 => out.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                OP_PUSHDATA4 => out.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
    }
}

fn take<'a>(bytes: &'a [u8], pos: &mut usize, n: usize) -> Result<&'a [u8], ScriptError> {
    let end = pos.checked_add(n).filter(|e| *e <= bytes.len()).ok_or(ScriptError::DataTooSmall)?;
    let out = &bytes[*pos..end];
    *pos = end;
    Ok(out)
}

/// Decode raw script bytes into chunks.
///
/// # Arguments
/// * `bytes` - The raw script.
///
/// # Returns
/// The parsed chunks, or `DataTooSmall` if a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let op = bytes[pos];
        pos += 1;
        let len = match op {
            0x01..=OP_DATA_75 => op as usize,
            OP_PUSHDATA1 => take(bytes, &mut pos, 1)?[0] as usize,
            OP_PUSHDATA2 => {
                let b = take(bytes, &mut pos, 2)?;
                u16::from_le_bytes([b[0], b[1]]) as usize
            }
            OP_PUSHDATA4 => {
                let b = take(bytes, &mut pos, 4)?;
                u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize
            }
            _ => {
                chunks.push(ScriptChunk { op, data: None });
                continue;
            }
        };
        let data = take(bytes, &mut pos, len)?.to_vec();
        chunks.push(ScriptChunk { op, data: Some(data) });
    }
    Ok(chunks)
}

/// Compute the push prefix for a payload of `data_len` bytes.
///
/// # Returns
/// The smallest push opcode (plus length bytes) able to carry the payload,
/// or `DataTooBig` beyond the 32-bit limit.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len <= OP_DATA_75 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xffff_ffff {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptError::DataTooBig)
    }
}
