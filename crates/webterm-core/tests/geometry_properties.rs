//! Property-based tests for geometry and color helpers.

use proptest::prelude::*;

use webterm_core::colors::{rgb_to_x11, x11_to_css};
use webterm_core::util::clamp;
use webterm_core::{Bounds, RowCol, Size};

fn size() -> impl Strategy<Value = Size> {
    (1u16..500, 1u16..500).prop_map(|(w, h)| Size::new(w, h))
}

proptest! {
    #[test]
    fn clamp_is_idempotent(v in any::<i32>(), a in any::<i32>(), b in any::<i32>()) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let once = clamp(v, min, max);
        prop_assert!(once >= min && once <= max);
        prop_assert_eq!(clamp(once, min, max), once);
    }

    #[test]
    fn clamp_move_stays_in_bounds(
        bounds in size(),
        row in -1000i32..1000,
        column in -1000i32..1000,
    ) {
        let mut pos = RowCol::origin();
        let clamped = pos.clamp_move(row, column, bounds);

        prop_assert!(bounds.contains(&pos));
        prop_assert!(Bounds::of(bounds).contains(&pos));
        let inside = row >= 0
            && column >= 0
            && row < i32::from(bounds.height)
            && column < i32::from(bounds.width);
        prop_assert_eq!(clamped, !inside);
        prop_assert_eq!(pos.overflow, clamped);
    }

    #[test]
    fn clamp_move_in_bounds_is_exact(bounds in size(), r in any::<u16>(), c in any::<u16>()) {
        let row = r % bounds.height;
        let column = c % bounds.width;
        let mut pos = RowCol::origin();
        prop_assert!(!pos.clamp_move(i32::from(row), i32::from(column), bounds));
        prop_assert_eq!(pos, RowCol::new(row, column));
    }

    #[test]
    fn x11_colors_scale_back_to_css(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let x11 = rgb_to_x11(&format!("rgb({r}, {g}, {b})")).unwrap();
        prop_assert_eq!(x11_to_css(&x11).unwrap(), format!("rgba({r},{g},{b},1)"));
    }
}
