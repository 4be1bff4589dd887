//! Text output on the V5 Brain display.
//!
//! The programs only ever print short status lines, so the screen is
//! modelled as a grid of character cells addressed by a 1-based cursor:
//!
//! - [`TextScreen`] holds the characters and the cursor.
//! - [`Console`] wraps a `TextScreen` and redraws changed rows onto any
//!   [`embedded-graphics`](https://crates.io/crates/embedded-graphics)
//!   [`DrawTarget`], using the 10x20 mono font. On the robot the draw
//!   target is the brain display; in tests it can be anything.
//!
//! # Example
//!
//! ```ignore
//! use vexops::display::{Console, Screen};
//!
//! let mut screen = Console::new(display_driver);
//! screen.clear();
//! screen.set_cursor(1, 1);
//! screen.print("Driver Control Active");
//! ```

use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::Rgb888,
    prelude::{DrawTarget, Point, RgbColor, Size},
    primitives::Rectangle,
    text::{Baseline, Text},
};

/// Text rows that fit under the brain's title bar.
pub const ROWS: usize = 12;
/// Characters per row.
pub const COLUMNS: usize = 48;

const CELL_WIDTH: u32 = 10;
const CELL_HEIGHT: u32 = 20;

/// A cursor-addressed text display.
pub trait Screen {
    /// Blanks the screen and moves the cursor home.
    fn clear(&mut self);

    /// Moves the cursor. Rows and columns start at 1.
    fn set_cursor(&mut self, row: usize, column: usize);

    /// Writes `text` at the cursor and advances it. `\n` starts a new line.
    fn print(&mut self, text: &str);

    /// Moves the cursor to the first column of the next row.
    fn new_line(&mut self);

    /// Clears the screen and prints `text` on the first row.
    fn banner(&mut self, text: &str) {
        self.clear();
        self.set_cursor(1, 1);
        self.print(text);
    }
}

/// A grid of characters with a cursor.
///
/// Characters past the last column and rows past the last row are dropped.
/// Non-ASCII characters are shown as `?`.
#[derive(Debug, Clone)]
pub struct TextScreen {
    cells:   [[u8; COLUMNS]; ROWS],
    row:     usize,
    column:  usize,
    dirty:   u16,
    cleared: bool,
}

impl Default for TextScreen {
    fn default() -> Self {
        Self {
            cells:   [[b' '; COLUMNS]; ROWS],
            row:     1,
            column:  1,
            dirty:   0,
            cleared: false,
        }
    }
}

impl TextScreen {
    pub fn new() -> Self { Self::default() }

    /// Contents of `row` (1-based) without trailing spaces.
    pub fn line(&self, row: usize) -> &str {
        match row.checked_sub(1).and_then(|r| self.cells.get(r)) {
            // cells only ever hold ASCII
            Some(cells) => std::str::from_utf8(cells).unwrap_or_default().trim_end(),
            None => "",
        }
    }

    /// All non-empty rows, top to bottom.
    pub fn lines(&self) -> Vec<&str> {
        (1..=ROWS).map(|row| self.line(row)).filter(|line| !line.is_empty()).collect()
    }

    pub fn cursor(&self) -> (usize, usize) { (self.row, self.column) }

    /// Rows changed since the last call, and whether the screen was cleared.
    fn take_changes(&mut self) -> (bool, u16) {
        let changes = (self.cleared, self.dirty);
        self.cleared = false;
        self.dirty = 0;
        changes
    }

    fn put(&mut self, ch: char) {
        if (1..=ROWS).contains(&self.row) && (1..=COLUMNS).contains(&self.column) {
            let byte = if ch.is_ascii() && !ch.is_ascii_control() { ch as u8 } else { b'?' };
            self.cells[self.row - 1][self.column - 1] = byte;
            self.dirty |= 1 << (self.row - 1);
        }
        self.column += 1;
    }
}

impl Screen for TextScreen {
    fn clear(&mut self) {
        self.cells = [[b' '; COLUMNS]; ROWS];
        self.row = 1;
        self.column = 1;
        self.dirty = 0;
        self.cleared = true;
    }

    fn set_cursor(&mut self, row: usize, column: usize) {
        self.row = row.max(1);
        self.column = column.max(1);
    }

    fn print(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.new_line();
            } else {
                self.put(ch);
            }
        }
    }

    fn new_line(&mut self) {
        self.row += 1;
        self.column = 1;
    }
}

/// A [`TextScreen`] drawn onto an embedded-graphics target.
pub struct Console<D> {
    text:   TextScreen,
    target: D,
}

impl<D: DrawTarget<Color = Rgb888>> Console<D> {
    pub fn new(target: D) -> Self {
        Self {
            text: TextScreen::new(),
            target,
        }
    }

    pub fn text(&self) -> &TextScreen { &self.text }

    pub fn target(&self) -> &D { &self.target }

    fn render(&mut self) {
        let (cleared, dirty) = self.text.take_changes();
        if cleared {
            let _ = self.target.clear(Rgb888::BLACK);
        }

        let style = MonoTextStyle::new(&FONT_10X20, Rgb888::WHITE);
        for row in (0..ROWS).filter(|row| dirty & (1 << row) != 0) {
            let top = (row as u32 * CELL_HEIGHT) as i32;
            let band = Rectangle::new(
                Point::new(0, top),
                Size::new(COLUMNS as u32 * CELL_WIDTH, CELL_HEIGHT),
            );
            let _ = self.target.fill_solid(&band, Rgb888::BLACK);
            let line = Text::with_baseline(
                self.text.line(row + 1),
                Point::new(0, top),
                style,
                Baseline::Top,
            );
            let _ = line.draw(&mut self.target);
        }
    }
}

impl<D: DrawTarget<Color = Rgb888>> Screen for Console<D> {
    fn clear(&mut self) {
        self.text.clear();
        self.render();
    }

    fn set_cursor(&mut self, row: usize, column: usize) { self.text.set_cursor(row, column); }

    fn print(&mut self, text: &str) {
        self.text.print(text);
        self.render();
    }

    fn new_line(&mut self) { self.text.new_line(); }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use embedded_graphics::{
        Pixel,
        prelude::{OriginDimensions, Size},
    };

    use super::*;

    #[test]
    fn print_advances_cursor() {
        let mut screen = TextScreen::new();
        screen.print("L: 12.0");
        screen.print(" R: -4.0");
        assert_eq!(screen.line(1), "L: 12.0 R: -4.0");
        assert_eq!(screen.cursor(), (1, 16));
    }

    #[test]
    fn clear_homes_the_cursor() {
        let mut screen = TextScreen::new();
        screen.print("Program Started");
        screen.clear();
        screen.print("Autonomous Mode");
        assert_eq!(screen.lines(), vec!["Autonomous Mode"]);
    }

    #[test]
    fn set_cursor_overwrites_in_place() {
        let mut screen = TextScreen::new();
        screen.print("Driver Control Active");
        screen.set_cursor(1, 8);
        screen.print("XXXXXXX");
        assert_eq!(screen.line(1), "Driver XXXXXXX Active");
    }

    #[test]
    fn overflow_is_dropped() {
        let mut screen = TextScreen::new();
        screen.set_cursor(1, COLUMNS - 1);
        screen.print("abcd\n\u{e9}");
        screen.set_cursor(ROWS + 1, 1);
        screen.print("lost");
        assert_eq!(screen.line(1).len(), COLUMNS);
        assert!(screen.line(1).ends_with("ab"));
        assert_eq!(screen.line(2), "?");
        assert_eq!(screen.line(ROWS + 1), "");
    }

    /// Records lit pixels.
    struct Canvas(HashMap<(i32, i32), Rgb888>);

    impl OriginDimensions for Canvas {
        fn size(&self) -> Size { Size::new(480, 240) }
    }

    impl DrawTarget for Canvas {
        type Color = Rgb888;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if color == Rgb888::BLACK {
                    self.0.remove(&(point.x, point.y));
                } else {
                    self.0.insert((point.x, point.y), color);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn console_draws_only_the_printed_row() {
        let mut console = Console::new(Canvas(HashMap::new()));
        console.set_cursor(2, 1);
        console.print("Autonomous Complete");

        let lit = &console.target().0;
        assert!(!lit.is_empty());
        assert!(lit.keys().all(|&(_, y)| (20..40).contains(&y)));

        console.clear();
        assert!(console.target().0.is_empty());
    }
}
