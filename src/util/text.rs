use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns (emoji and CJK count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates a string to fit within `max_width` terminal columns.
///
/// Appends `...` when text is cut. For widths of 3 or less there is no room
/// for the ellipsis, so the prefix that fits is returned as-is. Returns
/// `Cow::Borrowed` when the string already fits.
///
/// # Examples
///
/// ```
/// use radar::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Câmara", 10), "Câmara");
/// assert_eq!(truncate_to_width("Câmara dos Deputados", 9), "Câmara...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut current_width = 0;
        for (idx, c) in s.char_indices() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width {
                break;
            }
            current_width += char_width;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }
    let target_width = max_width - ELLIPSIS_WIDTH;

    let mut current_width = 0;
    let mut cut_point = None;

    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);

        if cut_point.is_none() && current_width + char_width > target_width {
            cut_point = Some(idx);
        }

        if current_width + char_width > max_width {
            let cut = cut_point.unwrap_or(idx);
            return Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS));
        }

        current_width += char_width;
    }

    Cow::Borrowed(s)
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Feed titles and summaries are untrusted and are drawn straight into the
/// terminal. Removes C0 controls (except tab, newline and carriage return),
/// DEL, CSI sequences (`ESC [` ... final byte), OSC sequences (`ESC ]` ...
/// BEL or ST) and bare ESC bytes.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    if !bytes.iter().copied().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            if i + 1 < len && bytes[i + 1] == b'[' {
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            } else {
                i += 1;
            }
        } else if is_stripped_control(b) {
            i += 1;
        } else {
            let start = i;
            i += 1;
            while i < len && !is_stripped_control(bytes[i]) {
                i += 1;
            }
            // Only ASCII bytes end a run, so the slice stays on char boundaries.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}
