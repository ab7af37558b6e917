use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Number of grid columns. Every breakpoint uses the same column count.
pub const GRID_COLUMNS: u32 = 12;

/// Responsive grid profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl Breakpoint {
    /// All breakpoints, widest first.
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
        Breakpoint::Xxs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Lg => "lg",
            Breakpoint::Md => "md",
            Breakpoint::Sm => "sm",
            Breakpoint::Xs => "xs",
            Breakpoint::Xxs => "xxs",
        }
    }

    pub fn columns(&self) -> u32 {
        GRID_COLUMNS
    }

    /// Width (in columns) given to a freshly seeded item.
    pub fn default_width(&self) -> u32 {
        match self {
            Breakpoint::Lg => 3,
            Breakpoint::Md => 4,
            Breakpoint::Sm => 6,
            Breakpoint::Xs | Breakpoint::Xxs => 12,
        }
    }

    /// Viewport width at which the renderer switches to this profile.
    /// Carried for the rendering layer; nothing in this crate reads it.
    pub fn min_width_px(&self) -> u32 {
        match self {
            Breakpoint::Lg => 1200,
            Breakpoint::Md => 996,
            Breakpoint::Sm => 768,
            Breakpoint::Xs => 480,
            Breakpoint::Xxs => 0,
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Breakpoint {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.as_str() == s)
            .ok_or_else(|| LayoutError::UnknownBreakpoint(s.to_string()))
    }
}
