use crate::error::PatternError;
use crate::GridSize;

/// A rectangular matrix of live/dead cells to stamp onto a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    size: GridSize,
    cells: Vec<bool>,
}

/// Names accepted by [`Pattern::named`].
pub const PATTERN_NAMES: &[&str] = &[
    "block",
    "blinker",
    "glider",
    "lwss",
    "r-pentomino",
    "acorn",
    "gosper-gun",
];

/// Longest row or column a parsed pattern may have.
pub const MAX_PATTERN_SIDE: usize = 4096;

const BLOCK: &str = "\
OO
OO";

const BLINKER: &str = "OOO";

const GLIDER: &str = "\
.O.
..O
OOO";

const LWSS: &str = "\
.O..O
O....
O...O
OOOO.";

const R_PENTOMINO: &str = "\
.OO
OO.
.O.";

const ACORN: &str = "\
.O.....
...O...
OO..OOO";

const GOSPER_GUN: &str = "\
x = 36, y = 9, rule = B3/S23
24bo$22bobo$12b2o6b2o12b2o$11bo3bo4b2o12b2o$2o8bo5bo3b2o$2o8bo3bob2o4b
obo$10bo5bo7bo$11bo3bo$12b2o!";

impl Pattern {
    /// Builds a pattern from rows of cells. Short rows are padded with dead
    /// cells.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, PatternError> {
        let width = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        let size = GridSize::new(Self::side(width)?, Self::side(rows.len())?);
        let mut cells = Vec::with_capacity(size.num_cells());
        for row in rows {
            let row = row.as_ref();
            cells.extend_from_slice(row);
            cells.extend(std::iter::repeat_n(false, width - row.len()));
        }
        Ok(Self { size, cells })
    }

    /// Parses the plaintext format: `O`, `*` or `#` for live cells, `.` or a
    /// space for dead ones. Lines starting with `!` are comments.
    pub fn from_plaintext(text: &str) -> Result<Self, PatternError> {
        let mut rows = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.starts_with('!') {
                continue;
            }
            let row = line
                .chars()
                .map(|ch| match ch {
                    'O' | 'o' | '*' | '#' => Ok(true),
                    '.' | ' ' => Ok(false),
                    _ => Err(PatternError::InvalidCharacter {
                        ch,
                        line: index + 1,
                    }),
                })
                .collect::<Result<Vec<bool>, _>>()?;
            rows.push(row);
        }
        Self::non_empty(Self::from_rows(&rows)?)
    }

    /// Parses run-length encoded text (`b` dead, `o` live, `$` end of row,
    /// `!` end of pattern), with an optional `x = .., y = ..` header.
    pub fn from_rle(text: &str) -> Result<Self, PatternError> {
        let mut rows: Vec<Vec<bool>> = vec![Vec::new()];
        let mut header_width = 0;
        let mut run: Option<usize> = None;

        'lines: for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if line.starts_with('x') {
                header_width = Self::rle_header_width(line)?;
                Self::side(header_width)?;
                continue;
            }
            for ch in line.chars() {
                match ch {
                    '0'..='9' => {
                        let digit = ch as usize - '0' as usize;
                        let count = run
                            .unwrap_or(0)
                            .checked_mul(10)
                            .and_then(|count| count.checked_add(digit))
                            .filter(|count| *count <= MAX_PATTERN_SIDE)
                            .ok_or(PatternError::RunTooLong { line: index + 1 })?;
                        run = Some(count);
                    }
                    'b' | '.' | 'o' | 'A'..='Z' => {
                        let count = run.take().unwrap_or(1);
                        let alive = ch != 'b' && ch != '.';
                        if let Some(row) = rows.last_mut() {
                            row.extend(std::iter::repeat_n(alive, count));
                            Self::side(row.len())?;
                        }
                    }
                    '$' => {
                        let count = run.take().unwrap_or(1);
                        rows.extend(std::iter::repeat_n(Vec::new(), count));
                        Self::side(rows.len())?;
                    }
                    '!' => break 'lines,
                    ch if ch.is_whitespace() => {}
                    _ => {
                        return Err(PatternError::InvalidCharacter {
                            ch,
                            line: index + 1,
                        });
                    }
                }
            }
        }

        if let Some(first) = rows.first_mut()
            && first.len() < header_width
        {
            first.resize(header_width, false);
        }
        Self::non_empty(Self::from_rows(&rows)?)
    }

    pub fn named(name: &str) -> Result<Self, PatternError> {
        let text = match name.to_ascii_lowercase().as_str() {
            "block" => BLOCK,
            "blinker" => BLINKER,
            "glider" => GLIDER,
            "lwss" => LWSS,
            "r-pentomino" => R_PENTOMINO,
            "acorn" => ACORN,
            "gosper-gun" => return Self::from_rle(GOSPER_GUN),
            _ => return Err(PatternError::UnknownName(name.to_string())),
        };
        Self::from_plaintext(text)
    }

    /// Parses either format, treating text with an RLE header or a `!`
    /// terminator as RLE.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let is_rle = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('!'))
            .any(|line| line.starts_with("x ") || line.starts_with("x=") || line.ends_with('!'));
        if is_rle {
            Self::from_rle(text)
        } else {
            Self::from_plaintext(text)
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn is_alive(&self, row: u32, col: u32) -> bool {
        row < self.size.height
            && col < self.size.width
            && self.cells[row as usize * self.size.width as usize + col as usize]
    }

    /// `(row, col)` offsets of the live cells, row-major.
    pub fn live_cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.size.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(index, _)| ((index / width) as u32, (index % width) as u32))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    fn side(len: usize) -> Result<u32, PatternError> {
        u32::try_from(len)
            .ok()
            .filter(|_| len <= MAX_PATTERN_SIDE)
            .ok_or(PatternError::TooLarge {
                max: MAX_PATTERN_SIDE,
            })
    }

    fn non_empty(pattern: Self) -> Result<Self, PatternError> {
        if pattern.size.num_cells() == 0 {
            Err(PatternError::Empty)
        } else {
            Ok(pattern)
        }
    }

    fn rle_header_width(line: &str) -> Result<usize, PatternError> {
        line.split(',')
            .filter_map(|field| field.split_once('='))
            .find(|(key, _)| key.trim() == "x")
            .and_then(|(_, value)| value.trim().parse().ok())
            .ok_or_else(|| PatternError::InvalidHeader(line.to_string()))
    }
}
