use serde::{Deserialize, Serialize};

/// Colour used for any category name missing from the table
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// Event coding category. Categories are mutually exclusive per span.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Event")]
    Event,
    #[serde(rename = "Place")]
    Place,
    #[serde(rename = "Location Change - Same Room")]
    LocationChangeSameRoom,
    #[serde(rename = "Location Change - Different Room")]
    LocationChangeDifferentRoom,
    #[serde(rename = "Location Change - Different Location")]
    LocationChangeDifferentLocation,
    #[serde(rename = "Time")]
    Time,
    #[serde(rename = "Sequencing Terms")]
    SequencingTerms,
    #[serde(rename = "Perceptual")]
    Perceptual,
    #[serde(rename = "Emotion/Thought")]
    EmotionThought,
    #[serde(rename = "Repetitions")]
    Repetitions,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Event,
            Category::Place,
            Category::LocationChangeSameRoom,
            Category::LocationChangeDifferentRoom,
            Category::LocationChangeDifferentLocation,
            Category::Time,
            Category::SequencingTerms,
            Category::Perceptual,
            Category::EmotionThought,
            Category::Repetitions,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Event => "Event",
            Category::Place => "Place",
            Category::LocationChangeSameRoom => "Location Change - Same Room",
            Category::LocationChangeDifferentRoom => "Location Change - Different Room",
            Category::LocationChangeDifferentLocation => "Location Change - Different Location",
            Category::Time => "Time",
            Category::SequencingTerms => "Sequencing Terms",
            Category::Perceptual => "Perceptual",
            Category::EmotionThought => "Emotion/Thought",
            Category::Repetitions => "Repetitions",
        }
    }

    /// Look up a category by its exact display name
    pub fn from_name(name: &str) -> Option<Category> {
        Category::all().iter().copied().find(|c| c.as_str() == name)
    }

    /// Highlight colour as `#rrggbb`
    pub fn color(&self) -> &'static str {
        category_color(self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Light background colours so highlighted text stays readable.
const COLORS: &[(&str, &str)] = &[
    ("Event", "#f6fa82"),
    ("Place", "#b7ff87"),
    ("Location Change - Same Room", "#ff8787"),
    ("Location Change - Different Room", "#ffb187"),
    ("Location Change - Different Location", "#ffd98c"),
    ("Time", "#bdd2ff"),
    ("Sequencing Terms", "#d7b3ff"),
    ("Perceptual", "#ff00b3"),
    ("Emotion/Thought", "#bdbdbd"),
    ("Repetitions", "#ff0000"),
];

/// Resolve a category name to its highlight colour, falling back to white.
pub fn category_color(name: &str) -> &'static str {
    COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_COLOR)
}

/// 8-bit RGB triple parsed from a hex colour string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` (leading `#` optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_table_color() {
        for cat in Category::all() {
            assert_ne!(cat.color(), DEFAULT_COLOR, "{} missing a colour", cat);
        }
        assert_eq!(Category::all().len(), COLORS.len());
    }

    #[test]
    fn test_unknown_category_defaults_to_white() {
        assert_eq!(category_color("Dialogue"), "#FFFFFF");
        assert_eq!(category_color(""), "#FFFFFF");
        assert_eq!(category_color("event"), "#FFFFFF");
    }

    #[test]
    fn test_known_colors() {
        assert_eq!(category_color("Event"), "#f6fa82");
        assert_eq!(Category::Perceptual.color(), "#ff00b3");
        assert_eq!(Category::Repetitions.color(), "#ff0000");
    }

    #[test]
    fn test_from_name_round_trips_display_names() {
        for cat in Category::all() {
            assert_eq!(Category::from_name(cat.as_str()), Some(*cat));
        }
        assert_eq!(Category::from_name("nested"), None);
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#f6fa82"), Some(Rgb(0xf6, 0xfa, 0x82)));
        assert_eq!(Rgb::from_hex("FFFFFF"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
    }
}
