//! Code 128 (subset B) symbol encoding
//! Covers printable ASCII, which is everything a SKU uses.

use super::BarcodeError;

/// Bar/space widths for symbol values 0..=105, each summing to 11 modules
const PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232",
];

const STOP: &str = "2331112";
const START_B: u32 = 104;

/// Blank modules required on each side of the symbol
pub const QUIET_ZONE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code128 {
    text: String,
    /// One entry per module, true = bar
    modules: Vec<bool>,
}

impl Code128 {
    pub fn encode(text: &str) -> Result<Self, BarcodeError> {
        if text.is_empty() {
            return Err(BarcodeError::Empty);
        }

        let mut values = Vec::with_capacity(text.len() + 3);
        values.push(START_B);
        for c in text.chars() {
            match c {
                ' '..='~' => values.push(c as u32 - 32),
                other => return Err(BarcodeError::UnsupportedChar(other)),
            }
        }
        values.push(checksum(&values[1..]));

        let mut modules = Vec::with_capacity(values.len() * 11 + 13);
        for value in values {
            push_pattern(&mut modules, PATTERNS[value as usize]);
        }
        push_pattern(&mut modules, STOP);

        Ok(Self {
            text: text.to_string(),
            modules,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    /// Inline SVG with the human readable text under the bars
    pub fn to_svg(&self, module_px: u32, bar_height: u32) -> String {
        let quiet = QUIET_ZONE as u32 * module_px;
        let width = self.modules.len() as u32 * module_px + 2 * quiet;
        let height = bar_height + 14;

        let mut svg = format!(
            "<svg class=\"barcode\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        svg.push_str(&format!("<rect width=\"{width}\" height=\"{height}\" fill=\"#fff\"/>"));

        for (start, len) in self.bar_runs() {
            svg.push_str(&format!(
                "<rect x=\"{}\" y=\"0\" width=\"{}\" height=\"{bar_height}\" fill=\"#000\"/>",
                quiet + start as u32 * module_px,
                len as u32 * module_px,
            ));
        }

        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"12\" text-anchor=\"middle\">{}</text></svg>",
            width / 2,
            bar_height + 12,
            super::print::escape(&self.text)
        ));
        svg
    }

    /// Terminal preview packing two modules per cell with half blocks
    pub fn to_text(&self) -> String {
        self.modules
            .chunks(2)
            .map(|pair| match pair {
                [true, true] => '█',
                [true, false] | [true] => '▌',
                [false, true] => '▐',
                _ => ' ',
            })
            .collect()
    }

    /// (first module, length) of every contiguous bar
    fn bar_runs(&self) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut current: Option<(usize, usize)> = None;

        for (i, &bar) in self.modules.iter().enumerate() {
            if bar {
                if let Some((_, len)) = current.as_mut() {
                    *len += 1;
                } else {
                    current = Some((i, 1));
                }
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);
        runs
    }
}

/// Modulo-103 check value over the data symbols
fn checksum(data: &[u32]) -> u32 {
    let weighted: u32 = data
        .iter()
        .enumerate()
        .map(|(i, v)| (i as u32 + 1) * v)
        .sum();
    (START_B + weighted) % 103
}

fn push_pattern(modules: &mut Vec<bool>, pattern: &str) {
    for (i, width) in pattern.bytes().enumerate() {
        let bar = i % 2 == 0;
        modules.extend(std::iter::repeat(bar).take(usize::from(width - b'0')));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_eleven_modules() {
        for pattern in PATTERNS {
            let width: u32 = pattern.bytes().map(|b| u32::from(b - b'0')).sum();
            assert_eq!(width, 11, "pattern {pattern}");
        }
        let stop: u32 = STOP.bytes().map(|b| u32::from(b - b'0')).sum();
        assert_eq!(stop, 13);
    }

    #[test]
    fn test_checksum() {
        // "A" -> 104 + 1 * 33
        assert_eq!(checksum(&[33]), 34);
        // "PJJ123C"
        assert_eq!(checksum(&[48, 42, 42, 17, 18, 19, 35]), 55);
    }

    #[test]
    fn test_symbol_length() {
        let code = Code128::encode("BEV-1001").unwrap();
        // start + 8 data + check = 10 symbols, then the 13-module stop
        assert_eq!(code.modules().len(), 10 * 11 + 13);
        assert!(code.modules()[0], "symbols start with a bar");
        assert!(code.modules()[code.modules().len() - 1], "stop ends with a bar");
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert_eq!(Code128::encode("CAFÉ"), Err(BarcodeError::UnsupportedChar('É')));
        assert_eq!(Code128::encode(""), Err(BarcodeError::Empty));
    }

    #[test]
    fn test_svg_has_one_rect_per_bar() {
        let code = Code128::encode("A").unwrap();
        let bars: usize = [PATTERNS[104], PATTERNS[33], PATTERNS[34], STOP]
            .iter()
            .map(|p| p.len().div_ceil(2))
            .sum();

        let svg = code.to_svg(2, 40);
        // +1 for the white background
        assert_eq!(svg.matches("<rect").count(), bars + 1);
        assert!(svg.contains(">A</text>"));
    }

    #[test]
    fn test_text_preview_halves_width() {
        let code = Code128::encode("SKU-1").unwrap();
        assert_eq!(code.to_text().chars().count(), code.modules().len().div_ceil(2));
    }
}
