/// Errors raised by the strict layout entry points.
///
/// The lenient path (`normalize_layout`, `synchronize`) never returns these;
/// it degrades to an empty layout instead.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown breakpoint '{0}'")]
    UnknownBreakpoint(String),

    #[error("invalid layout JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid layout shape: {0}")]
    InvalidShape(String),

    #[error("layout item '{0}' not found")]
    ItemNotFound(String),

    #[error("invalid item size {w}x{h}: width and height must be positive")]
    InvalidSize { w: u32, h: u32 },
}
