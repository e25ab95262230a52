//! Viewport width detection
//!
//! Width is an optional capability. A probe that cannot tell reports `None`
//! and callers fall back to the regular table layout.

use console::Term;

/// Something that may know how wide the output is, in columns
pub trait ViewportProbe {
    /// Current width, or `None` when unknown
    fn width(&self) -> Option<u16>;
}

/// Asks the attached terminal; unknown when stdout is not a terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalProbe;

impl ViewportProbe for TerminalProbe {
    fn width(&self) -> Option<u16> {
        let term = Term::stdout();
        if !term.is_term() {
            return None;
        }
        term.size_checked().map(|(_, cols)| cols)
    }
}

/// Never knows the width
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProbe;

impl ViewportProbe for NoProbe {
    fn width(&self) -> Option<u16> {
        None
    }
}

/// Reports a fixed width, e.g. from `--width`
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub u16);

impl ViewportProbe for FixedProbe {
    fn width(&self) -> Option<u16> {
        Some(self.0)
    }
}

/// How result rows are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Aligned columns
    Table,
    /// One card per row, for narrow viewports
    Compact,
}

impl Layout {
    /// Compact below `compact_width`; table when the width is unknown
    pub fn from_width(width: Option<u16>, compact_width: u16) -> Self {
        match width {
            Some(w) if w < compact_width => Layout::Compact,
            _ => Layout::Table,
        }
    }

    /// Pick a layout using `probe`
    pub fn detect(probe: &dyn ViewportProbe, compact_width: u16) -> Self {
        let width = probe.width();
        tracing::debug!(?width, compact_width, "Viewport probed");
        Self::from_width(width, compact_width)
    }

    /// Export is offered on wide layouts only
    pub fn offers_export(self) -> bool {
        self == Layout::Table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_width_is_table() {
        assert_eq!(Layout::detect(&NoProbe, 100), Layout::Table);
    }

    #[test]
    fn test_narrow_is_compact() {
        assert_eq!(Layout::detect(&FixedProbe(60), 100), Layout::Compact);
        assert_eq!(Layout::detect(&FixedProbe(100), 100), Layout::Table);
    }

    #[test]
    fn test_export_offer() {
        assert!(Layout::Table.offers_export());
        assert!(!Layout::Compact.offers_export());
    }
}
