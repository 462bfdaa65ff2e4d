/// Height of the info bar appended below the pattern (matches the default layout).
pub const INFO_BAR_HEIGHT: usize = 95;

const BACKGROUND: u8 = 200;
const LINE: u8 = 40;

/// Synthetic SEM frame: vertical dark lines on a bright background, followed by
/// a black info bar holding a white horizontal scale bar.
pub struct SemFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl SemFrame {
    /// Pattern area of `width x pattern_rows` without an info bar.
    pub fn pattern(width: usize, pattern_rows: usize, lines: &[(usize, usize)]) -> Self {
        assert!(width > 0 && pattern_rows > 0, "image dimensions must be positive");
        let mut data = vec![BACKGROUND; width * pattern_rows];
        for y in 0..pattern_rows {
            for &(start, line_width) in lines {
                for x in start..(start + line_width).min(width) {
                    data[y * width + x] = LINE;
                }
            }
        }
        Self {
            width,
            height: pattern_rows,
            data,
        }
    }

    /// Append a black info bar with a 5 px thick scale bar of `bar_len` pixels
    /// starting at column `bar_x`.
    pub fn with_info_bar(mut self, bar_x: usize, bar_len: usize) -> Self {
        let top = self.height;
        self.data.resize(self.width * (top + INFO_BAR_HEIGHT), 0);
        for y in top + 45..top + 50 {
            for x in bar_x..(bar_x + bar_len).min(self.width) {
                self.data[y * self.width + x] = 255;
            }
        }
        self.height += INFO_BAR_HEIGHT;
        self
    }
}

/// Line layout `(start, width)` with constant width and gaps alternating
/// between `gap_a` (after even lines) and `gap_b` (after odd lines).
pub fn alternating_lines(
    first: usize,
    count: usize,
    line_width: usize,
    gap_a: usize,
    gap_b: usize,
) -> Vec<(usize, usize)> {
    let mut x = first;
    (0..count)
        .map(|i| {
            let line = (x, line_width);
            x += line_width + if i % 2 == 0 { gap_a } else { gap_b };
            line
        })
        .collect()
}
