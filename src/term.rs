//! Terminal width probe

/// Width used when nothing better is known
pub const FALLBACK_WIDTH: usize = 80;

/// Width of the terminal on stdout, else `$COLUMNS`, else 80 columns
pub fn terminal_width() -> usize {
    ioctl_width()
        .or_else(|| columns_width(std::env::var("COLUMNS").ok().as_deref()))
        .unwrap_or(FALLBACK_WIDTH)
}

#[cfg(unix)]
fn ioctl_width() -> Option<usize> {
    let mut winsize = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    let ret = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut winsize) };

    if ret < 0 || winsize.ws_col == 0 {
        tracing::debug!("Terminal size unavailable on stdout");
        return None;
    }
    Some(winsize.ws_col as usize)
}

#[cfg(not(unix))]
fn ioctl_width() -> Option<usize> {
    None
}

fn columns_width(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&w| w > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_width() {
        assert_eq!(columns_width(Some("132")), Some(132));
        assert_eq!(columns_width(Some(" 40 ")), Some(40));
        assert_eq!(columns_width(Some("0")), None);
        assert_eq!(columns_width(Some("wide")), None);
        assert_eq!(columns_width(None), None);
    }

    #[test]
    fn test_terminal_width_is_positive() {
        assert!(terminal_width() > 0);
    }
}
