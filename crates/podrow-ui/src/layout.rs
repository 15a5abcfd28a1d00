//! Pod grid layout: how many columns and rows fit the viewport, and where
//! each pod goes.
//!
//! Everything here is a pure function of the pod count, the viewport and
//! the [`LayoutConfig`]. The engine keeps no state between calls.

use podrow_types::LayoutConfig;

/// Grid dimensions chosen for the current pod count and viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub columns: u32,
    pub rows: u32,
}

impl GridShape {
    /// Number of cells; pods at or past this index are hidden.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Top-left corner of a pod inside the row, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PodPosition {
    pub left: u32,
    pub top: u32,
}

/// Grid geometry for one display type.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    config: LayoutConfig,
    desktop: bool,
}

impl LayoutEngine {
    /// `desktop` selects the desktop profile picker's padding, margins and
    /// pod height.
    pub fn new(config: LayoutConfig, desktop: bool) -> Self {
        Self { config, desktop }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn is_desktop(&self) -> bool {
        self.desktop
    }

    pub fn pod_width(&self) -> u32 {
        self.config.pod_width
    }

    pub fn pod_height(&self) -> u32 {
        if self.desktop {
            self.config.desktop_pod_height
        } else {
            self.config.pod_height
        }
    }

    /// Padding around the grid.
    pub fn row_padding(&self) -> u32 {
        if self.desktop {
            self.config.desktop_row_padding
        } else {
            self.config.row_padding
        }
    }

    /// Horizontal gap between pods for a given column count.
    pub fn margin(&self, columns: u32) -> u32 {
        let table = if self.desktop {
            &self.config.desktop_margin_by_columns
        } else {
            &self.config.margin_by_columns
        };
        let idx = columns.saturating_sub(1) as usize;
        table
            .get(idx)
            .or_else(|| table.last())
            .copied()
            .unwrap_or(0)
    }

    /// Row width needed for `columns` pods side by side.
    pub fn columns_to_width(&self, columns: u32) -> u32 {
        2 * self.row_padding()
            + columns * self.pod_width()
            + columns.saturating_sub(1) * self.margin(columns)
    }

    /// Row height needed for `rows` rows of pods.
    pub fn rows_to_height(&self, rows: u32) -> u32 {
        2 * self.row_padding() + rows * self.pod_height()
    }

    fn preferred_columns(&self, pod_count: usize) -> u32 {
        let table = &self.config.columns_by_pod_count;
        let preferred = table
            .get(pod_count)
            .or_else(|| table.last())
            .copied()
            .unwrap_or(1);
        preferred.clamp(1, self.config.max_columns.max(1))
    }

    /// Pick a grid for `pod_count` pods inside a `width` x `height` viewport.
    ///
    /// Starts from the preferred column count, shrinks columns then rows to
    /// fit, and finally grows columns again while pods are left over and
    /// the width allows it. Zero pods yield a 1x1 grid.
    pub fn compute(
        &self,
        pod_count: usize,
        width: u32,
        height: u32,
        banner_visible: bool,
    ) -> GridShape {
        let mut columns = self.preferred_columns(pod_count);
        while columns > 1 && width < self.columns_to_width(columns) {
            columns -= 1;
        }

        let mut rows = if pod_count == 0 {
            1
        } else {
            ((pod_count - 1) / columns as usize + 1) as u32
        };
        if banner_visible {
            rows = rows.min(self.config.max_rows_under_banner.max(1));
        }
        while rows > 1 && height < self.rows_to_height(rows) {
            rows -= 1;
        }

        while columns < self.config.max_columns
            && (columns as usize * rows as usize) < pod_count
            && width >= self.columns_to_width(columns + 1)
        {
            columns += 1;
        }

        GridShape { columns, rows }
    }

    /// Where the pod at `index` goes, or `None` when it does not fit and
    /// must be hidden.
    pub fn place(&self, index: usize, shape: GridShape) -> Option<PodPosition> {
        if shape.columns == 0 || index >= shape.capacity() {
            return None;
        }
        let column = (index % shape.columns as usize) as u32;
        let row = (index / shape.columns as usize) as u32;
        let padding = self.row_padding();
        let left = padding + column * (self.pod_width() + self.margin(shape.columns));
        // Desktop rows are spaced evenly.
        let top = if self.desktop {
            row * (self.pod_height() + padding)
        } else {
            row * self.pod_height() + padding
        };
        Some(PodPosition { left, top })
    }

    /// Size the hosting container should take for `shape`.
    pub fn preferred_size(&self, shape: GridShape) -> (u32, u32) {
        (
            self.columns_to_width(shape.columns),
            self.rows_to_height(shape.rows),
        )
    }

    /// Compare a pod's measured size against the configured one.
    ///
    /// A mismatch is only a diagnostic; placement keeps using the
    /// configured size.
    pub fn check_pod_size(&self, width: u32, height: u32) -> bool {
        let mut ok = true;
        if height != self.pod_height() {
            log::error!(
                "Pod height ({height}) and configured pod height ({}) are not equal",
                self.pod_height()
            );
            ok = false;
        }
        if width != self.pod_width() {
            log::error!(
                "Pod width ({width}) and configured pod width ({}) are not equal",
                self.pod_width()
            );
            ok = false;
        }
        ok
    }
}
