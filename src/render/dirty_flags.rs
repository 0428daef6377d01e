use bitflags::bitflags;

bitflags! {
    /// Flags to track which UI components need re-rendering
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u32 {
        /// Nothing needs rendering
        const NONE = 0;
        /// Watchlist table (prices, trends, cursor)
        const WATCHLIST = 0b0000_0001;
        /// Chart panel (series, loading state, full view)
        const DETAIL = 0b0000_0010;
        /// Key hints and refresh status
        const FOOTER = 0b0000_0100;
        const POPUP_HELP = 0b0000_1000;
        /// Add-symbol input
        const POPUP_INPUT = 0b0001_0000;
        /// Full redraw (resize, startup)
        const ALL = 0xFFFF_FFFF;
    }
}

impl DirtyFlags {
    #[inline]
    pub fn needs_render(self) -> bool {
        !self.is_empty()
    }

    /// A merged price response: the table and the refresh status change
    #[inline]
    #[must_use]
    pub fn mark_prices_update(mut self) -> Self {
        self.insert(Self::WATCHLIST | Self::FOOTER);
        self
    }

    /// A watchlist mutation may start the scheduler and move the cursor
    #[inline]
    #[must_use]
    pub fn mark_watchlist_change(mut self) -> Self {
        self.insert(Self::WATCHLIST | Self::DETAIL | Self::FOOTER);
        self
    }

    #[inline]
    #[must_use]
    pub fn mark_popup_change(mut self, popup: u8) -> Self {
        if popup & crate::app::POPUP_HELP != 0 {
            self.insert(Self::POPUP_HELP);
        }
        if popup & crate::app::POPUP_INPUT != 0 {
            self.insert(Self::POPUP_INPUT);
        }
        self
    }
}

/// Manages rendering state and tracks which components need updates
#[derive(Debug)]
pub struct RenderState {
    dirty: DirtyFlags,
    render_count: u64,
    /// Ticks where nothing was dirty
    skip_count: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            dirty: DirtyFlags::NONE,
            render_count: 0,
            skip_count: 0,
        }
    }

    #[inline]
    pub fn needs_render(&self) -> bool {
        self.dirty.needs_render()
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty.insert(flags);
    }

    #[inline]
    pub fn mark_all_dirty(&mut self) {
        self.dirty = DirtyFlags::ALL;
    }

    /// Clear all dirty flags after successful render
    #[inline]
    pub fn clear(&mut self) {
        self.dirty = DirtyFlags::NONE;
        self.render_count += 1;
    }

    #[inline]
    pub fn skip(&mut self) {
        self.skip_count += 1;
    }

    /// Percentage of ticks that were skipped
    #[allow(clippy::cast_precision_loss)]
    pub fn efficiency(&self) -> f64 {
        let total = self.render_count + self.skip_count;
        if total == 0 {
            0.0
        } else {
            (self.skip_count as f64 / total as f64) * 100.0
        }
    }

    pub fn stats(&self) -> String {
        format!(
            "渲染次数: {}, 跳过次数: {}, 跳过率: {:.1}%",
            self.render_count,
            self.skip_count,
            self.efficiency()
        )
    }
}
