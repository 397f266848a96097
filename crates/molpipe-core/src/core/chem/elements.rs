use phf::{Map, phf_map};
use std::fmt;

/// Number of columns in a one-hot type matrix.
pub const NUM_CATEGORIES: usize = 8;

/// Coarse atom classes understood by the shape-alignment model.
///
/// The discriminant is the column of the category in a one-hot type matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementCategory {
    Carbon = 0,
    Hydrogen = 1,
    Oxygen = 2,
    Nitrogen = 3,
    Sulfur = 4,
    Selenium = 5,
    /// Any element without a dedicated column.
    Other = 6,
    /// Reserved for padding rows; never produced from a symbol.
    Filler = 7,
}

#[rustfmt::skip]
static ELEMENT_CATEGORIES: Map<&'static str, ElementCategory> = phf_map! {
    "C"  => ElementCategory::Carbon,
    "C1" => ElementCategory::Carbon,
    "H"  => ElementCategory::Hydrogen,
    "O"  => ElementCategory::Oxygen,
    "N"  => ElementCategory::Nitrogen,
    "S"  => ElementCategory::Sulfur,
    "SE" => ElementCategory::Selenium,
    "Se" => ElementCategory::Selenium,
};

impl ElementCategory {
    pub const ALL: [Self; NUM_CATEGORIES] = [
        Self::Carbon,
        Self::Hydrogen,
        Self::Oxygen,
        Self::Nitrogen,
        Self::Sulfur,
        Self::Selenium,
        Self::Other,
        Self::Filler,
    ];

    /// Looks up the category of an element symbol, falling back to [`Self::Other`].
    ///
    /// Matching is exact: `"c"` or `"Cl"` are not carbon.
    pub fn from_symbol(symbol: &str) -> Self {
        ELEMENT_CATEGORIES
            .get(symbol)
            .copied()
            .unwrap_or(Self::Other)
    }

    /// Column index of the category in a one-hot type matrix.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Carbon => "carbon",
            Self::Hydrogen => "hydrogen",
            Self::Oxygen => "oxygen",
            Self::Nitrogen => "nitrogen",
            Self::Sulfur => "sulfur",
            Self::Selenium => "selenium",
            Self::Other => "other",
            Self::Filler => "filler",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, category) in ElementCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn known_symbols_map_to_their_category() {
        assert_eq!(ElementCategory::from_symbol("C"), ElementCategory::Carbon);
        assert_eq!(ElementCategory::from_symbol("C1"), ElementCategory::Carbon);
        assert_eq!(ElementCategory::from_symbol("H"), ElementCategory::Hydrogen);
        assert_eq!(ElementCategory::from_symbol("O"), ElementCategory::Oxygen);
        assert_eq!(ElementCategory::from_symbol("N"), ElementCategory::Nitrogen);
        assert_eq!(ElementCategory::from_symbol("S"), ElementCategory::Sulfur);
        assert_eq!(ElementCategory::from_symbol("Se"), ElementCategory::Selenium);
        assert_eq!(ElementCategory::from_symbol("SE"), ElementCategory::Selenium);
    }

    #[test]
    fn unknown_symbols_fall_back_to_other() {
        for symbol in ["Cl", "Br", "P", "c", "", "filler"] {
            assert_eq!(ElementCategory::from_symbol(symbol), ElementCategory::Other);
        }
    }

    #[test]
    fn display_uses_lowercase_names() {
        assert_eq!(ElementCategory::Selenium.to_string(), "selenium");
        assert_eq!(ElementCategory::Filler.to_string(), "filler");
    }
}
