//! Output format parameters.

use clap::ValueEnum;
use serde::Deserialize;

/// File format the final look is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG (`.jpg`).
    #[default]
    Jpeg,
    /// PNG (`.png`).
    Png,
    /// WebP (`.webp`).
    Webp,
}

impl OutputFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// MIME type of files in this format.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Whether bytes of `mime` can be written as-is.
    #[must_use]
    pub fn matches_mime(self, mime: &str) -> bool {
        let mime = if mime == "image/jpg" { "image/jpeg" } else { mime };
        self.mime_type() == mime
    }

    /// The `image` crate format used for conversion.
    #[must_use]
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Webp.extension(), "webp");
    }

    #[test]
    fn mime_matching() {
        assert!(OutputFormat::Jpeg.matches_mime("image/jpeg"));
        assert!(OutputFormat::Jpeg.matches_mime("image/jpg"));
        assert!(OutputFormat::Png.matches_mime("image/png"));
        assert!(!OutputFormat::Png.matches_mime("image/jpeg"));
        assert!(!OutputFormat::Webp.matches_mime("image/png"));
    }

    #[test]
    fn parses_from_config_strings() {
        #[derive(Deserialize)]
        struct Holder {
            format: OutputFormat,
        }
        let holder: Holder = toml::from_str("format = \"webp\"").unwrap();
        assert_eq!(holder.format, OutputFormat::Webp);
        assert!(toml::from_str::<Holder>("format = \"gif\"").is_err());
    }
}
