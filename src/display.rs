//! Interactive display of a finished report
//!
//! Displays are optional and depend on the environment the report is built
//! in. A missing display is reported, never raised.

use crate::error::CapabilityUnavailable;
use std::io::{self, Write};

/// Something that can show an HTML document to a user
pub trait ReportDisplay {
    fn show_html(&mut self, html: &str) -> Result<(), CapabilityUnavailable>;
}

/// The display used when no interactive environment is present
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl ReportDisplay for NoDisplay {
    fn show_html(&mut self, _html: &str) -> Result<(), CapabilityUnavailable> {
        Err(CapabilityUnavailable::new("Interactive display"))
    }
}

/// Emits rich HTML output for the evcxr Jupyter kernel
#[derive(Debug)]
pub struct EvcxrDisplay<W: Write> {
    out: W,
}

impl EvcxrDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> EvcxrDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportDisplay for EvcxrDisplay<W> {
    fn show_html(&mut self, html: &str) -> Result<(), CapabilityUnavailable> {
        write!(
            self.out,
            "EVCXR_BEGIN_CONTENT text/html\n{html}\nEVCXR_END_CONTENT\n"
        )
        .and_then(|_| self.out.flush())
        .map_err(|e| {
            log::debug!("notebook output failed: {e}");
            CapabilityUnavailable::new("Notebook output")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_no_display_is_unavailable() {
        let err = NoDisplay.show_html("<p>x</p>").unwrap_err();
        assert_eq!(err.capability, "Interactive display");
    }

    #[test]
    fn test_evcxr_wraps_content() {
        let mut display = EvcxrDisplay::new(Vec::new());
        display.show_html("<p>ok</p>").unwrap();
        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(
            out,
            "EVCXR_BEGIN_CONTENT text/html\n<p>ok</p>\nEVCXR_END_CONTENT\n"
        );
    }

    #[test]
    fn test_write_failure_maps_to_unavailable() {
        let mut display = EvcxrDisplay::new(BrokenPipe);
        assert!(display.show_html("<p>x</p>").is_err());
    }
}
