/// Static style catalog
///
/// Read-only reference data: the categories shown in the studio and the
/// style definitions the user can apply. The core treats these as opaque
/// descriptions; only the external service interprets the parameters.

use crate::state::data::{StyleParams, Transformation};

/// A catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleCategory {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// All categories, in display order
pub const CATEGORIES: &[StyleCategory] = &[
    StyleCategory {
        key: "cinematic",
        name: "Cinematic",
        icon: "🎬",
        description: "Moody, graded looks straight off a film set",
    },
    StyleCategory {
        key: "painterly",
        name: "Painterly",
        icon: "🖌️",
        description: "Brushwork, canvas texture and pigment",
    },
    StyleCategory {
        key: "retro",
        name: "Retro",
        icon: "📼",
        description: "Faded stocks and analog artifacts",
    },
    StyleCategory {
        key: "futurist",
        name: "Futurist",
        icon: "🤖",
        description: "Neon, chrome and synthetic light",
    },
];

/// Look up a category by key
pub fn category(key: &str) -> Option<&'static StyleCategory> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// All style definitions
///
/// Cloned into history items on completion, so definitions are owned.
pub fn all_styles() -> Vec<Transformation> {
    fn style(
        id: &str,
        name: &str,
        category: &str,
        prompt: &str,
        strength: f32,
        guidance: f32,
        preserve_subject: bool,
    ) -> Transformation {
        Transformation {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            parameters: StyleParams {
                prompt: prompt.to_string(),
                strength,
                guidance,
                preserve_subject,
            },
        }
    }

    vec![
        style(
            "film-noir",
            "Film Noir",
            "cinematic",
            "high contrast black and white, hard shadows, venetian blind light",
            0.8,
            8.0,
            true,
        ),
        style(
            "golden-hour",
            "Golden Hour",
            "cinematic",
            "warm anamorphic sunset grade, lens flare, soft haze",
            0.6,
            6.5,
            true,
        ),
        style(
            "teal-orange",
            "Blockbuster",
            "cinematic",
            "teal and orange blockbuster color grade, crisp detail",
            0.55,
            7.0,
            true,
        ),
        style(
            "oil-portrait",
            "Oil Portrait",
            "painterly",
            "classical oil painting, visible brush strokes, gallery lighting",
            0.85,
            9.0,
            true,
        ),
        style(
            "ink-wash",
            "Ink Wash",
            "painterly",
            "japanese sumi-e ink wash on rice paper, minimal strokes",
            0.9,
            10.0,
            false,
        ),
        style(
            "watercolor",
            "Watercolor",
            "painterly",
            "loose watercolor, wet on wet bleeding pigment, white paper",
            0.8,
            8.5,
            true,
        ),
        style(
            "super-8",
            "Super 8",
            "retro",
            "grainy super 8 film still, light leaks, faded kodachrome",
            0.65,
            6.0,
            true,
        ),
        style(
            "daguerreotype",
            "Daguerreotype",
            "retro",
            "1850s daguerreotype plate, silver halation, formal pose",
            0.9,
            9.5,
            true,
        ),
        style(
            "neon-noir",
            "Neon Noir",
            "futurist",
            "rain-slick neon cyberpunk street, magenta and cyan rim light",
            0.75,
            8.0,
            true,
        ),
        style(
            "chrome-dream",
            "Chrome Dream",
            "futurist",
            "liquid chrome surfaces, y2k airbrush, studio reflections",
            0.85,
            9.0,
            false,
        ),
    ]
}

/// Styles belonging to one category, in catalog order
pub fn styles_in(category_key: &str) -> Vec<Transformation> {
    all_styles()
        .into_iter()
        .filter(|s| s.category == category_key)
        .collect()
}

/// Look up a single style by id
pub fn style_by_id(id: &str) -> Option<Transformation> {
    all_styles().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_style_ids_are_unique() {
        let styles = all_styles();
        let ids: HashSet<&str> = styles.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), styles.len());
    }

    #[test]
    fn test_every_style_belongs_to_a_known_category() {
        for style in all_styles() {
            assert!(
                category(&style.category).is_some(),
                "style {} references unknown category {}",
                style.id,
                style.category
            );
        }
    }

    #[test]
    fn test_parameters_stay_in_documented_ranges() {
        for style in all_styles() {
            let p = &style.parameters;
            assert!((0.0..=1.0).contains(&p.strength), "strength of {}", style.id);
            assert!((1.0..=20.0).contains(&p.guidance), "guidance of {}", style.id);
            assert!(!p.prompt.is_empty(), "prompt of {}", style.id);
        }
    }

    #[test]
    fn test_styles_in_filters_by_category() {
        let retro = styles_in("retro");
        assert!(!retro.is_empty());
        assert!(retro.iter().all(|s| s.category == "retro"));
    }
}
