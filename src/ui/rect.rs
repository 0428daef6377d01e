use ratatui::layout::{Margin, Rect};

/// Center a `width` x `height` box in `r`, clamped to `r`. A zero dimension
/// keeps the full extent of `r` on that axis.
pub fn centered(width: u16, height: u16, r: Rect) -> Rect {
    let horizontal = if width == 0 {
        0
    } else {
        r.width.saturating_sub(width) / 2
    };
    let vertical = if height == 0 {
        0
    } else {
        r.height.saturating_sub(height) / 2
    };
    r.inner(&Margin {
        horizontal,
        vertical,
    })
}

/// Split off the top row and the bottom row of `r`: `(top, body, bottom)`
pub fn frame_rows(r: Rect) -> (Rect, Rect, Rect) {
    let top = Rect {
        height: r.height.min(1),
        ..r
    };
    let bottom = Rect {
        y: r.y + r.height.saturating_sub(1),
        height: r.height.saturating_sub(1).min(1),
        ..r
    };
    let body = Rect {
        y: r.y + top.height,
        height: r.height.saturating_sub(top.height + bottom.height),
        ..r
    };
    (top, body, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_a_smaller_box() {
        let r = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(50, 10, r), Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn oversized_box_is_clamped() {
        let r = Rect::new(2, 3, 20, 10);
        assert_eq!(centered(50, 30, r), r);
        assert_eq!(centered(0, 2, r), Rect::new(2, 7, 20, 2));
    }

    #[test]
    fn frame_rows_partition_the_area() {
        let (top, body, bottom) = frame_rows(Rect::new(0, 0, 80, 24));
        assert_eq!(top, Rect::new(0, 0, 80, 1));
        assert_eq!(body, Rect::new(0, 1, 80, 22));
        assert_eq!(bottom, Rect::new(0, 23, 80, 1));

        let (top, body, bottom) = frame_rows(Rect::new(0, 0, 80, 1));
        assert_eq!(top.height + body.height + bottom.height, 1);
    }
}
