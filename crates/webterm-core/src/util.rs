//! Small numeric and string helpers shared by the emulator.

/// Clamp `v` into `[min, max]`.
///
/// `min` must not be greater than `max`. Clamping is idempotent.
pub fn clamp<T: PartialOrd>(v: T, min: T, max: T) -> T {
    if v < min {
        return min;
    }
    if v > max {
        return max;
    }
    v
}

/// Left pad `s` to `length` characters using `ch`.
///
/// Strings already at least `length` characters long are returned unchanged.
pub fn lpad(s: &str, length: usize, ch: char) -> String {
    let count = s.chars().count();
    if count >= length {
        return s.to_string();
    }
    let mut out = String::with_capacity(length);
    out.extend(std::iter::repeat(ch).take(length - count));
    out.push_str(s);
    out
}

/// Left pad a number with zeros.
pub fn zpad(number: impl std::fmt::Display, length: usize) -> String {
    lpad(&number.to_string(), length, '0')
}

/// A string of `length` spaces.
pub fn whitespace(length: usize) -> String {
    " ".repeat(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(50, 0, 10), 10);
        assert_eq!(clamp(3, 3, 3), 3);
    }

    #[test]
    fn test_lpad() {
        assert_eq!(lpad("ab", 5, ' '), "   ab");
        assert_eq!(lpad("abcdef", 3, ' '), "abcdef");
        assert_eq!(lpad("", 2, '-'), "--");
    }

    #[test]
    fn test_zpad() {
        assert_eq!(zpad(7, 3), "007");
        assert_eq!(zpad("42", 2), "42");
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(whitespace(0), "");
        assert_eq!(whitespace(3), "   ");
    }
}
