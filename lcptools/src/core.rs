use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::hash::{hash_words, LABEL_SEED};

/// Label of a core: packed boundary codes at level 1, a fingerprint above.
pub type Label = u32;

/// Mask of the label bits that take part in core comparison.
pub const LABEL_COMPARISON_MASK: Label = 0b11;

/// A core: a labelled, half-open range `[start, end)` of the original
/// sequence.
///
/// # Comparison
/// `==`, `<` and the other comparison operators look only at the lowest two
/// bits of the label (`label & 3`), i.e. the code of the last symbol of a
/// level-1 core. Two cores with different ranges, or different labels that
/// share these two bits, compare equal. This is the symbol the parser uses
/// for the cores of the previous level. Use [`Core::identical`] to compare
/// all fields.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Core {
    label: Label,
    start: u64,
    end: u64,
}

impl Core {
    /// Creates a new core from its raw parts.
    ///
    /// # Examples
    /// ```
    /// use lcptools::core::Core;
    ///
    /// let core = Core::new(2, 0, 10);
    /// assert_eq!(core.label(), 2);
    /// assert_eq!(core.start(), 0);
    /// assert_eq!(core.end(), 10);
    /// ```
    #[must_use]
    pub const fn new(label: Label, start: u64, end: u64) -> Self {
        Self { label, start, end }
    }

    /// Builds a level-1 core out of the encoded symbols it spans.
    ///
    /// `codes` must contain at least 2 symbols; the core covers
    /// `start..start + codes.len()`.
    ///
    /// # Examples
    /// ```
    /// use lcptools::core::Core;
    ///
    /// // C A A G: length 4, first C, second-to-last A, last G
    /// let core = Core::from_codes(&[1, 0, 0, 2], 5);
    /// assert_eq!(core.label(), (2 << 6) | (1 << 4) | (0 << 2) | 2);
    /// assert_eq!(core.start(), 5);
    /// assert_eq!(core.end(), 9);
    /// ```
    #[must_use]
    pub fn from_codes(codes: &[u8], start: u64) -> Self {
        let len = codes.len();
        debug_assert!(len >= 2);

        let first = codes[0];
        let second_to_last = codes[len - 2];
        let last = codes[len - 1];

        Self {
            label: pack_label(len as u64, first, second_to_last, last),
            start,
            end: start + len as u64,
        }
    }

    /// Builds a core one level above `cores`, spanning all of them.
    ///
    /// `cores` must contain at least 2 cores.
    #[must_use]
    pub fn from_cores(cores: &[Core]) -> Self {
        let len = cores.len();
        debug_assert!(len >= 2);

        let first = &cores[0];
        let second_to_last = &cores[len - 2];
        let last = &cores[len - 1];

        let label = hash_words(
            [
                first.label,
                second_to_last.label,
                last.label,
                (len - 2) as Label,
            ],
            LABEL_SEED,
        );

        Self {
            label,
            start: first.start,
            end: last.end,
        }
    }

    #[inline]
    #[must_use]
    pub const fn label(&self) -> Label {
        self.label
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Number of original symbols covered by this core.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end == self.start
    }

    #[must_use]
    pub fn range(&self) -> Range<u64> {
        self.start..self.end
    }

    /// The 2-bit symbol this core stands for when parsing the next level.
    #[inline]
    #[must_use]
    pub const fn symbol(&self) -> u8 {
        (self.label & LABEL_COMPARISON_MASK) as u8
    }

    /// Returns `true` if label, start and end are all equal.
    ///
    /// # Examples
    /// ```
    /// use lcptools::core::Core;
    ///
    /// let core_1 = Core::new(0b1010, 0, 3);
    /// let core_2 = Core::new(0b0110, 5, 8);
    /// assert_eq!(core_1, core_2);
    /// assert!(!core_1.identical(&core_2));
    /// assert!(core_1.identical(&Core::new(0b1010, 0, 3)));
    /// ```
    #[must_use]
    pub fn identical(&self, other: &Core) -> bool {
        self.label == other.label && self.start == other.start && self.end == other.end
    }

    /// Returns the same core with its range mirrored inside a sequence of
    /// length `len`, i.e. `[len - end, len - start)`.
    #[must_use]
    pub(crate) fn mirrored(&self, len: u64) -> Self {
        Self::new(self.label, len - self.end, len - self.start)
    }
}

/// Packs a level-1 label:
/// `((len - 2) << 6) | (first << 4) | (second_to_last << 2) | last`.
///
/// The length part is truncated to the width of the label.
#[inline]
#[must_use]
pub fn pack_label(len: u64, first: u8, second_to_last: u8, last: u8) -> Label {
    (((len - 2) << 6) as Label)
        | ((first as Label) << 4)
        | ((second_to_last as Label) << 2)
        | last as Label
}

impl PartialEq for Core {
    fn eq(&self, other: &Self) -> bool {
        self.symbol() == other.symbol()
    }
}

impl Eq for Core {}

impl PartialOrd for Core {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Core {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol().cmp(&other.symbol())
    }
}

impl Display for Core {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_tokens, Token};

    use crate::core::{pack_label, Core};
    use crate::hash::{hash_words, LABEL_SEED};

    #[test]
    fn test_core_new() {
        let core = Core::new(2, 0, 10);

        assert_eq!(core.label(), 2);
        assert_eq!(core.start(), 0);
        assert_eq!(core.end(), 10);
        assert_eq!(core.len(), 10);
        assert_eq!(core.range(), 0..10);
    }

    #[test]
    fn test_core_comparison() {
        let core_1 = Core::new(0b1010, 0, 0);
        let core_2 = Core::new(0b1010, 1, 1);
        let core_3 = Core::new(0b101, 2, 2);

        assert!(core_1 == core_2);
        assert!(core_1 != core_3);
        assert!(core_3 < core_1);
        assert!(core_1 > core_3);
        assert!(core_1 >= core_2);
        assert!(core_3 <= core_1);
    }

    #[test]
    fn test_core_comparison_ignores_high_bits() {
        let core_1 = Core::new(0xFFFF_FF01, 0, 3);
        let core_2 = Core::new(0x0000_0001, 100, 200);
        let core_3 = Core::new(0x0000_0002, 0, 3);

        assert_eq!(core_1, core_2);
        assert!(!core_1.identical(&core_2));
        assert!(core_1 < core_3);
        assert_eq!(core_1.max(core_3).label(), 2);
    }

    #[test]
    fn test_pack_label() {
        assert_eq!(pack_label(3, 2, 0, 1), (1 << 6) | (2 << 4) | 1);
        assert_eq!(pack_label(10, 3, 3, 3), (8 << 6) | 0b11_1111);
        // the length does not fit into the label and is truncated
        assert_eq!(pack_label((1 << 26) + 2, 1, 2, 3), 0b01_10_11);
    }

    #[test]
    fn test_from_codes() {
        let core = Core::from_codes(&[3, 0, 1], 7);

        assert_eq!(core.label(), (1 << 6) | (3 << 4) | 1);
        assert_eq!(core.range(), 7..10);
        assert_eq!(core.symbol(), 1);
    }

    #[test]
    fn test_from_cores() {
        let cores = [
            Core::new(11, 0, 3),
            Core::new(12, 3, 7),
            Core::new(13, 7, 9),
            Core::new(14, 9, 12),
        ];
        let core = Core::from_cores(&cores);

        assert_eq!(core.label(), hash_words([11, 13, 14, 2], LABEL_SEED));
        assert_eq!(core.range(), 0..12);
    }

    #[test]
    fn test_from_cores_ignores_interior() {
        let cores_1 = [
            Core::new(1, 0, 3),
            Core::new(2, 3, 6),
            Core::new(3, 6, 9),
            Core::new(4, 9, 12),
        ];
        let cores_2 = [
            Core::new(1, 10, 13),
            Core::new(99, 13, 16),
            Core::new(3, 16, 19),
            Core::new(4, 19, 22),
        ];

        assert_eq!(
            Core::from_cores(&cores_1).label(),
            Core::from_cores(&cores_2).label()
        );
    }

    #[test]
    fn test_mirrored() {
        let core = Core::new(5, 2, 6);

        assert!(core.mirrored(10).identical(&Core::new(5, 4, 8)));
        assert!(core.mirrored(6).identical(&Core::new(5, 0, 4)));
    }

    #[test]
    fn test_core_display() {
        assert_eq!(Core::new(1234, 0, 5).to_string(), "1234");
    }

    #[test]
    fn test_core_serde() {
        assert_tokens(
            &Core::new(7, 1, 4),
            &[
                Token::Struct {
                    name: "Core",
                    len: 3,
                },
                Token::Str("label"),
                Token::U32(7),
                Token::Str("start"),
                Token::U64(1),
                Token::Str("end"),
                Token::U64(4),
                Token::StructEnd,
            ],
        );
    }
}
