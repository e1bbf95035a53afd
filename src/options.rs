//! Fixed catalog of style categories and the user's current picks.
//!
//! Each category's first value is its placeholder label. A category left on
//! its placeholder is "default" and contributes nothing to the description
//! sent with a prompt request.

use crate::error::StudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownGroup {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug)]
pub struct OptionCategory {
    pub name: &'static str,
    pub group: DropdownGroup,
    pub values: &'static [&'static str],
}

impl OptionCategory {
    pub fn placeholder(&self) -> &'static str {
        self.values[0]
    }

    pub fn choices(&self) -> &'static [&'static str] {
        &self.values[1..]
    }

    fn position(&self, value: &str) -> Option<usize> {
        let value = value.trim();
        self.values
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(value))
    }
}

pub const CATALOG: &[OptionCategory] = &[
    OptionCategory {
        name: "Gender",
        group: DropdownGroup::Top,
        values: &[
            "Gender (from image)",
            "Unspecified",
            "Handsome Man",
            "Graceful Woman",
            "Elegant Non-binary",
            "Android Robot",
        ],
    },
    OptionCategory {
        name: "Facial Expression",
        group: DropdownGroup::Top,
        values: &[
            "Facial Expression (from image)",
            "Neutral",
            "Happy Smile",
            "Serious and Sharp",
            "Pensive and Sad",
            "Intense Anger",
            "Laughing Out Loud",
        ],
    },
    OptionCategory {
        name: "Shot Type",
        group: DropdownGroup::Top,
        values: &[
            "Shot Type (from image)",
            "Close-up (Face & Shoulders)",
            "Medium Shot (Waist Up)",
            "Full Body Shot",
            "Extreme Close-up (Eyes Only)",
            "Wide Shot (Character & Environment)",
        ],
    },
    OptionCategory {
        name: "Camera Angle",
        group: DropdownGroup::Top,
        values: &[
            "Camera Angle (from image)",
            "Eye Level (At Eye Height)",
            "High Angle (From Above)",
            "Low Angle (From Below)",
            "Dutch Angle (Tilted)",
            "Over-the-Shoulder",
            "Low Angle (Low, Powerful)",
            "High Angle (High, Small/Fragile)",
            "Eye Level (Level, Neutral)",
            "Dutch Angle (Tilted, Tense)",
            "Overhead Shot (From Above)",
        ],
    },
    OptionCategory {
        name: "Character Pose",
        group: DropdownGroup::Middle,
        values: &[
            "Character Pose",
            "Standing Upright",
            "Sitting Relaxed",
            "Running Dynamically",
            "Mid-air Jump",
            "Leaning Against a Wall",
            "Face Close-up",
            "Casual Street Style",
            "High Fashion Runway",
            "Classic Contrapposto",
            "Hands on Hips",
            "Looking Away",
            "Dynamic Motion Blur",
        ],
    },
    OptionCategory {
        name: "Background",
        group: DropdownGroup::Middle,
        values: &[
            "Background / Location",
            "Clean White Studio",
            "Fantasy Forest",
            "Futuristic Night City",
            "Beach at Dusk",
            "Victorian Antique Room",
            "Milky Way Galaxy",
        ],
    },
    OptionCategory {
        name: "Art Style",
        group: DropdownGroup::Middle,
        values: &[
            "Art Style",
            "Photorealistic",
            "Digital Painting (Artstation)",
            "Anime/Manga",
            "Retro Pixel Art",
            "Pencil Sketch",
            "Oil Painting",
        ],
    },
    OptionCategory {
        name: "Lighting",
        group: DropdownGroup::Middle,
        values: &[
            "Lighting",
            "Natural Daylight",
            "Blue & Purple Neon",
            "Hard Side Light (Rembrandt)",
            "Golden Hour",
            "Volumetric Light (God Rays)",
            "Dramatic Silhouette",
        ],
    },
    OptionCategory {
        name: "Color Tone",
        group: DropdownGroup::Bottom,
        values: &[
            "Color Tone",
            "Vibrant and Saturated",
            "Black and White Monochrome",
            "Soft Pastels",
            "Analogous Color Scheme",
            "High Contrast",
            "Natural Earth Tones",
            "Warm Tone",
            "Cold Tone",
        ],
    },
];

pub fn find_category(name: &str) -> Option<(usize, &'static OptionCategory)> {
    let name = name.trim();
    CATALOG
        .iter()
        .enumerate()
        .find(|(_, category)| category.name.eq_ignore_ascii_case(name))
}

pub fn categories_in(group: DropdownGroup) -> impl Iterator<Item = &'static OptionCategory> {
    CATALOG.iter().filter(move |category| category.group == group)
}

/// One chosen value per catalog category, stored as an index into its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOptions {
    choices: Vec<usize>,
}

impl Default for SelectedOptions {
    fn default() -> Self {
        Self {
            choices: vec![0; CATALOG.len()],
        }
    }
}

impl SelectedOptions {
    pub fn select(&mut self, category: &str, value: &str) -> Result<(), StudioError> {
        let (index, entry) =
            find_category(category).ok_or_else(|| StudioError::UnknownCategory(category.into()))?;

        match entry.position(value) {
            Some(position) if position > 0 => {
                self.choices[index] = position;
                Ok(())
            }
            _ => Err(StudioError::UnknownOptionValue {
                category: entry.name.to_string(),
                value: value.trim().to_string(),
            }),
        }
    }

    pub fn reset(&mut self, category: &str) -> Result<(), StudioError> {
        let (index, _) =
            find_category(category).ok_or_else(|| StudioError::UnknownCategory(category.into()))?;
        self.choices[index] = 0;
        Ok(())
    }

    pub fn value(&self, category: &str) -> Option<&'static str> {
        find_category(category).map(|(index, entry)| entry.values[self.choices[index]])
    }

    pub fn is_default(&self) -> bool {
        self.choices.iter().all(|choice| *choice == 0)
    }

    /// Non-default picks in catalog order.
    pub fn iter_custom(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        CATALOG
            .iter()
            .zip(self.choices.iter())
            .filter(|(_, choice)| **choice > 0)
            .map(|(category, choice)| (category.name, category.values[*choice]))
    }

    pub fn custom_details(&self) -> String {
        self.iter_custom()
            .map(|(category, value)| format!("{category}: {value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
