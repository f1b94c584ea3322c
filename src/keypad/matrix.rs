//! Matrix keypad scanning.
//!
//! Rows are push-pull outputs idling high, columns are inputs with
//! pull-ups. A row is driven low in turn and any column reading low is
//! a pressed key at that crossing.
//!
//! Scans are rate-limited to one per debounce interval. A key is
//! reported once on press; holding it does not repeat, and the same key
//! is reported again only after it has been seen released.
//!
//! Pins are bound to `Error = Infallible`, so pin results carry nothing
//! and are discarded.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};

use super::Keypad;

pub struct KeyMatrix<R, C, const ROWS: usize, const COLS: usize> {
    rows: [R; ROWS],
    cols: [C; COLS],
    keymap: [[char; COLS]; ROWS],
    debounce_ms: u64,
    last_scan_ms: Option<u64>,
    held: Option<char>,
}

impl<R, C, const ROWS: usize, const COLS: usize> KeyMatrix<R, C, ROWS, COLS>
where
    R: OutputPin<Error = Infallible>,
    C: InputPin<Error = Infallible>,
{
    pub fn new(
        mut rows: [R; ROWS],
        cols: [C; COLS],
        keymap: [[char; COLS]; ROWS],
        debounce_ms: u64,
    ) -> Self {
        for row in rows.iter_mut() {
            let _ = row.set_high();
        }
        Self {
            rows,
            cols,
            keymap,
            debounce_ms,
            last_scan_ms: None,
            held: None,
        }
    }

    /// Key currently held down, if any. First hit in row-major order.
    pub fn scan(&mut self) -> Option<char> {
        for r in 0..ROWS {
            let _ = self.rows[r].set_low();
            let hit = self
                .cols
                .iter_mut()
                .position(|col| matches!(col.is_low(), Ok(true)));
            let _ = self.rows[r].set_high();

            if let Some(c) = hit {
                return Some(self.keymap[r][c]);
            }
        }
        None
    }

    /// Debounced press detection. `now_ms` is a monotonic timestamp.
    pub fn poll(&mut self, now_ms: u64) -> Option<char> {
        if let Some(last) = self.last_scan_ms {
            if now_ms.saturating_sub(last) < self.debounce_ms {
                return None;
            }
        }
        self.last_scan_ms = Some(now_ms);

        let pressed = self.scan();
        let event = match (self.held, pressed) {
            (None, Some(key)) => Some(key),
            (Some(prev), Some(key)) if prev != key => Some(key),
            _ => None,
        };
        self.held = pressed;
        event
    }
}

/// A matrix paired with a millisecond clock.
pub struct ClockedMatrix<R, C, T, const ROWS: usize, const COLS: usize> {
    matrix: KeyMatrix<R, C, ROWS, COLS>,
    now_ms: T,
}

impl<R, C, T, const ROWS: usize, const COLS: usize> ClockedMatrix<R, C, T, ROWS, COLS>
where
    R: OutputPin<Error = Infallible>,
    C: InputPin<Error = Infallible>,
    T: FnMut() -> u64,
{
    pub fn new(matrix: KeyMatrix<R, C, ROWS, COLS>, now_ms: T) -> Self {
        Self { matrix, now_ms }
    }
}

impl<R, C, T, const ROWS: usize, const COLS: usize> Keypad for ClockedMatrix<R, C, T, ROWS, COLS>
where
    R: OutputPin<Error = Infallible>,
    C: InputPin<Error = Infallible>,
    T: FnMut() -> u64,
{
    fn read_key(&mut self) -> Option<char> {
        let now = (self.now_ms)();
        self.matrix.poll(now)
    }
}
