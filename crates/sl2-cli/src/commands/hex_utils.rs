//! Hex offset parsing and hexdump line formatting.

use anyhow::Result;

/// Parse a hex offset string (with or without 0x prefix).
pub fn parse_hex_offset(s: &str) -> Result<usize> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    usize::from_str_radix(s, 16).map_err(|e| anyhow::anyhow!("Invalid hex offset: {}", e))
}

/// Format bytes as hexdump lines, 16 bytes per line, labelled from `base`.
///
/// ```text
/// 0x000: 48 65 6C 6C 6F 20 57 6F  72 6C 64 00 00 00 00 00  |Hello World.....|
/// ```
pub fn format_hexdump(bytes: &[u8], base: usize, ascii: bool) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:03X}: ", base + i * 16);

            for j in 0..16 {
                if j == 8 {
                    line.push(' ');
                }
                match chunk.get(j) {
                    Some(byte) => line.push_str(&format!("{:02X} ", byte)),
                    None => line.push_str("   "),
                }
            }

            if ascii {
                line.push_str(" |");
                for j in 0..16 {
                    line.push(match chunk.get(j) {
                        Some(byte) if (0x20..0x7F).contains(byte) => *byte as char,
                        Some(_) => '.',
                        None => ' ',
                    });
                }
                line.push('|');
            }

            line.trim_end().to_string()
        })
        .collect()
}
