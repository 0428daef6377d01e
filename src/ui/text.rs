use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn align_right(text: &str, width: usize) -> String {
    let extra: usize = text
        .chars()
        .filter_map(|c| c.width_cjk().and_then(|w| w.checked_sub(1)))
        .sum();
    format!(
        "{text:>width$}",
        width = width.checked_sub(extra).unwrap_or(width)
    )
}

/// Cut `text` to at most `width` columns, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.width_cjk() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width_cjk().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_right() {
        assert_eq!(align_right("text", 3), "text");
        assert_eq!(align_right("text", 10), "      text");
        // CJK characters
        assert_eq!(align_right("你好世界", 3), "你好世界");
        assert_eq!(align_right("你好世界", 10), "  你好世界");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Apple", 10), "Apple");
        assert_eq!(truncate("Microsoft Corporation", 10), "Microsoft…");
        assert_eq!(truncate("腾讯控股有限公司", 7), "腾讯控…");
        assert_eq!(truncate("abc", 0), "");
    }
}
