//! Raw wire inspection of inbound queries.

const HEADER_LEN: usize = 12;
const OPT_TYPE: u16 = 41;
const DO_BIT: u16 = 0x8000;

/// Reports the EDNS0 DNSSEC OK bit of a raw query.
///
/// Walks the question, answer and authority sections to reach the
/// additional section and looks for an OPT pseudo-record. A malformed or
/// truncated buffer reports `false`.
pub fn query_dnssec_ok(buf: &[u8]) -> bool {
    find_opt_flags(buf).is_some_and(|flags| flags & DO_BIT != 0)
}

fn find_opt_flags(buf: &[u8]) -> Option<u16> {
    if buf.len() < HEADER_LEN {
        return None;
    }

    let qdcount = read_u16(buf, 4)?;
    let ancount = read_u16(buf, 6)?;
    let nscount = read_u16(buf, 8)?;
    let arcount = read_u16(buf, 10)?;

    let mut pos = HEADER_LEN;
    for _ in 0..qdcount {
        pos = skip_name(buf, pos)?;
        pos = pos.checked_add(4).filter(|&p| p <= buf.len())?;
    }

    for _ in 0..(u32::from(ancount) + u32::from(nscount)) {
        pos = skip_record(buf, pos)?;
    }

    for _ in 0..arcount {
        let rr_start = skip_name(buf, pos)?;
        let rr_type = read_u16(buf, rr_start)?;
        if rr_type == OPT_TYPE {
            // TYPE(2) CLASS=udp size(2) TTL=ext-rcode(1) version(1) flags(2)
            return read_u16(buf, rr_start + 6);
        }
        pos = skip_record(buf, pos)?;
    }

    None
}

/// Returns the offset just past the owner name at `pos`.
fn skip_name(buf: &[u8], mut pos: usize) -> Option<usize> {
    loop {
        let len = *buf.get(pos)? as usize;
        match len & 0xC0 {
            0x00 if len == 0 => return Some(pos + 1),
            0x00 => pos += 1 + len,
            // A compression pointer always ends the name.
            0xC0 => return (pos + 2 <= buf.len()).then_some(pos + 2),
            _ => return None,
        }
    }
}

fn skip_record(buf: &[u8], pos: usize) -> Option<usize> {
    let fixed = skip_name(buf, pos)?;
    let rdlen = read_u16(buf, fixed + 8)? as usize;
    let end = fixed + 10 + rdlen;
    (end <= buf.len()).then_some(end)
}

#[inline]
fn read_u16(buf: &[u8], pos: usize) -> Option<u16> {
    let bytes = buf.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_with_opt(flags: u16) -> Vec<u8> {
        let mut buf = vec![
            0x12, 0x34, // id
            0x01, 0x00, // RD
            0x00, 0x01, // qdcount
            0x00, 0x00, 0x00, 0x00, // an, ns
            0x00, 0x01, // arcount
        ];
        buf.extend_from_slice(&[4, b'm', b'i', b'e', b'k', 2, b'n', b'l', 0]);
        buf.extend_from_slice(&[0x00, 0x0f, 0x00, 0x01]); // MX IN
        buf.push(0); // root owner
        buf.extend_from_slice(&OPT_TYPE.to_be_bytes());
        buf.extend_from_slice(&4096u16.to_be_bytes());
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&flags.to_be_bytes());
        buf.extend_from_slice(&[0, 0]); // rdlen
        buf
    }

    #[test]
    fn test_do_bit_set() {
        assert!(query_dnssec_ok(&query_with_opt(0x8000)));
    }

    #[test]
    fn test_opt_without_do_bit() {
        assert!(!query_dnssec_ok(&query_with_opt(0x0000)));
    }

    #[test]
    fn test_query_without_opt() {
        let mut buf = query_with_opt(0x8000);
        buf[11] = 0;
        buf.truncate(HEADER_LEN + 9 + 4);
        assert!(!query_dnssec_ok(&buf));
    }

    #[test]
    fn test_truncated_buffer_is_not_dnssec_ok() {
        let buf = query_with_opt(0x8000);
        for len in 0..buf.len() - 2 {
            assert!(!query_dnssec_ok(&buf[..len]), "prefix of {} bytes", len);
        }
    }
}
