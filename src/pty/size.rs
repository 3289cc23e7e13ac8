//! Window size for PTY

use std::io;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl WindowSize {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { rows, cols }
    }

    /// Size of the invoking terminal, read from standard input.
    pub fn current() -> io::Result<Self> {
        Self::of(io::stdin().as_fd())
    }

    /// Size of the terminal behind `fd`.
    pub fn of(fd: BorrowedFd<'_>) -> io::Result<Self> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let result = unsafe { libc::ioctl(fd.as_raw_fd(), libc::TIOCGWINSZ as _, &mut ws) };
        if result == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self::from(ws))
    }

    pub fn to_winsize(self) -> libc::winsize {
        libc::winsize {
            ws_row: self.rows,
            ws_col: self.cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

impl From<libc::winsize> for WindowSize {
    fn from(ws: libc::winsize) -> Self {
        Self {
            rows: ws.ws_row,
            cols: ws.ws_col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winsize_conversion_keeps_cells_and_zeroes_pixels() {
        let ws = WindowSize::new(132, 43).to_winsize();
        assert_eq!(ws.ws_col, 132);
        assert_eq!(ws.ws_row, 43);
        assert_eq!(ws.ws_xpixel, 0);
        assert_eq!(WindowSize::from(ws), WindowSize::new(132, 43));
    }

    #[test]
    fn size_of_regular_file_is_not_a_tty() {
        let file = tempfile::tempfile().unwrap();
        let err = WindowSize::of(file.as_fd()).unwrap_err();
        assert_eq!(err.raw_os_error(), Some(libc::ENOTTY));
    }

    #[test]
    fn default_is_classic_vt100() {
        assert_eq!(WindowSize::default(), WindowSize::new(80, 24));
    }
}
