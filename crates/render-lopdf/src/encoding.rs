use encoding_rs::{EncoderResult, WINDOWS_1252};
use lopdf::{Object, StringFormat};

/// Encodes `text` for a WinAnsiEncoding font. Characters without a WinAnsi
/// code point become `?`; the original text travels in `/ActualText`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut encoder = WINDOWS_1252.new_encoder();
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 256];
    let mut src = text;
    loop {
        let (result, read, written) = encoder.encode_from_utf8_without_replacement(src, &mut buf, true);
        out.extend_from_slice(&buf[..written]);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => out.push(b'?'),
        }
    }
    out
}

/// UTF-16BE with a byte order mark, the PDF text string form for Unicode.
pub fn utf16_be(text: &str) -> Vec<u8> {
    let mut out = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_be_bytes());
    }
    out
}

/// A PDF text string: a literal for printable ASCII, UTF-16BE hex otherwise.
pub fn text_string(text: &str) -> Object {
    if text.bytes().all(|b| (0x20..0x7F).contains(&b)) {
        Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        Object::String(utf16_be(text), StringFormat::Hexadecimal)
    }
}
