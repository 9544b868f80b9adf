//! Category → color lookup.

use calboard_core::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Used for any category the table does not know.
pub const DEFAULT_COLOR: Rgb = Rgb(0x3B, 0x82, 0xF6);

const CATEGORY_COLORS: [(&str, Rgb); 6] = [
    ("exercise", Rgb(0x34, 0xD3, 0x99)),
    ("eating", Rgb(0xFB, 0xBF, 0x24)),
    ("work", Rgb(0x3B, 0x82, 0xF6)),
    ("relax", Rgb(0xA7, 0x8B, 0xFA)),
    ("family", Rgb(0xF8, 0x71, 0x71)),
    ("social", Rgb(0xFB, 0x92, 0x3C)),
];

/// Background color for a category name. Never fails.
pub fn color_for(category: &str) -> Rgb {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

pub fn category_color(category: Category) -> Rgb {
    color_for(category.as_str())
}
