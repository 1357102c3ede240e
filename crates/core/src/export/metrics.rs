pub const MM_PER_PT: f32 = 25.4 / 72.0;

pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

const FALLBACK_WIDTH: u16 = 556;

// Helvetica AFM widths in 1/1000 em for 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

fn char_width(c: char) -> u16 {
    let code = c as usize;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[code - 32]
    } else {
        FALLBACK_WIDTH
    }
}

pub fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    units as f32 / 1000.0 * size_pt * MM_PER_PT
}

pub fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * LINE_HEIGHT_FACTOR * MM_PER_PT
}

/// Greedy word wrap. Explicit newlines start a new line (blank lines are
/// kept); words wider than `max_width_mm` are split by character.
pub fn wrap_text(text: &str, max_width_mm: f32, size_pt: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width_mm(&candidate, size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width_mm(word, size_pt) <= max_width_mm {
                current = word.to_string();
            } else {
                for ch in word.chars() {
                    current.push(ch);
                    if text_width_mm(&current, size_pt) > max_width_mm && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(ch);
                    }
                }
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_follow_metrics() {
        // "Wi" = 944 + 222 units.
        let expected = 1166.0 / 1000.0 * 10.0 * MM_PER_PT;
        assert!((text_width_mm("Wi", 10.0) - expected).abs() < 1e-4);
        assert_eq!(text_width_mm("", 10.0), 0.0);
    }

    #[test]
    fn wrap_respects_width() {
        let text = "Dallas inventory remains tight across most zip codes this quarter";
        let lines = wrap_text(text, 40.0, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 10.0) <= 40.0, "{line:?} too wide");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_keeps_paragraph_breaks() {
        let lines = wrap_text("First.\n\nSecond.", 170.0, 10.0);
        assert_eq!(lines, vec!["First.", "", "Second."]);
    }

    #[test]
    fn long_words_are_split() {
        let word = "x".repeat(200);
        let lines = wrap_text(&word, 20.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }
}
