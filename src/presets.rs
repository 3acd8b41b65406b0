//! Built-in pose and remix prompts.

use std::fmt::Write;

/// A named prompt the user can pick instead of writing their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Short label shown to the user and accepted on the command line.
    pub label: &'static str,
    /// Text sent to the model.
    pub prompt: &'static str,
    /// Longer wordings also accepted for this preset.
    pub aliases: &'static [&'static str],
}

/// Pose presets.
pub const POSES: &[Preset] = &[
    Preset {
        label: "Frontal",
        prompt: "standing straight, full frontal view, hands by sides, confident expression",
        aliases: &[],
    },
    Preset {
        label: "Walking",
        prompt: "walking forward on a runway, movement in clothes, one leg forward",
        aliases: &[],
    },
    Preset {
        label: "Side Profile",
        prompt: "standing in profile view, looking to the side, elegant posture",
        aliases: &[],
    },
    Preset {
        label: "Sitting",
        prompt: "sitting on a modern stool, relaxed but high fashion pose",
        aliases: &[],
    },
];

/// Remix presets.
pub const REMIXES: &[Preset] = &[
    Preset {
        label: "Vintage Belt",
        prompt: "Add a high-quality vintage leather belt to the model's outfit. Ensure it drapes \
                 naturally over the clothes.",
        aliases: &["Add a vintage leather belt"],
    },
    Preset {
        label: "Neon",
        prompt: "Change the overall mood to a futuristic aesthetic. Add subtle neon lighting \
                 reflections to the clothes and skin.",
        aliases: &["Try a futuristic neon vibe"],
    },
    Preset {
        label: "Sunset",
        prompt: "Change the studio lighting to a warm, golden hour sunset light. Add soft long \
                 shadows and a warm glow.",
        aliases: &["Apply sunset hour lighting"],
    },
    Preset {
        label: "Gold Jewelry",
        prompt: "Accessorize the model with elegant gold jewelry: a necklace and subtle bracelets \
                 that match the outfit style.",
        aliases: &["Add gold jewelry accents"],
    },
    Preset {
        label: "Black and White",
        prompt: "Transform the entire image into a high-contrast black and white fashion \
                 editorial photograph. Maintain all details.",
        aliases: &["Switch to a black & white editorial"],
    },
];

/// Resolve user input against `presets`.
///
/// Labels and aliases match case-insensitively, with `-` and `_` standing in
/// for spaces.
/// Anything else is taken as free-form prompt text. Returns `(label, prompt)`.
#[must_use]
pub fn resolve<'a>(presets: &[Preset], input: &'a str) -> (&'a str, &'a str) {
    let wanted = normalize(input);
    presets
        .iter()
        .find(|p| std::iter::once(&p.label).chain(p.aliases).any(|name| normalize(name) == wanted))
        .map_or((input, input), |p| (p.label, p.prompt))
}

fn normalize(s: &str) -> String {
    s.trim().replace(['-', '_'], " ").to_lowercase()
}

/// Text listing of every preset.
#[must_use]
pub fn listing() -> String {
    let mut out = String::new();
    for (heading, presets) in [("Poses", POSES), ("Remixes", REMIXES)] {
        let _ = writeln!(out, "{heading}:");
        for p in presets {
            let _ = writeln!(out, "  {:<16} {}", p.label, p.prompt);
        }
    }
    out
}
