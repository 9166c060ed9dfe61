//! The configuration value a sign is rebuilt from.

use std::{fmt, str::FromStr};

use crate::error::SignError;

/// At most this many lines of text fit on a plank.
pub const MAX_LINES: usize = 4;
/// At most this many characters fit on one line.
pub const MAX_LINE_CHARS: usize = 14;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WoodTexture {
    #[default]
    Oak,
    Dark,
    Acacia,
}

impl WoodTexture {
    pub const ALL: [WoodTexture; 3] = [WoodTexture::Oak, WoodTexture::Dark, WoodTexture::Acacia];

    pub fn id(&self) -> &'static str {
        match self {
            WoodTexture::Oak => "oak",
            WoodTexture::Dark => "dark",
            WoodTexture::Acacia => "acacia",
        }
    }

    /// Asset file name, e.g. `wood_acacia.webp`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("wood_{}.{}", self.id(), extension)
    }
}

impl FromStr for WoodTexture {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WoodTexture::ALL
            .into_iter()
            .find(|texture| texture.id() == s)
            .ok_or_else(|| SignError::UnknownWoodTexture(s.to_string()))
    }
}

impl fmt::Display for WoodTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SignSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl SignSize {
    pub const ALL: [SignSize; 3] = [SignSize::Small, SignSize::Medium, SignSize::Large];

    /// Multiplier applied to the base scale.
    pub fn factor(&self) -> f32 {
        match self {
            SignSize::Small => 0.75,
            SignSize::Medium => 1.0,
            SignSize::Large => 1.25,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SignSize::Small => "small",
            SignSize::Medium => "medium",
            SignSize::Large => "large",
        }
    }

    /// Physical dimensions of the real sign, shown next to the size choice.
    pub fn label(&self) -> &'static str {
        match self {
            SignSize::Small => "24x12 cm",
            SignSize::Medium => "36x18 cm",
            SignSize::Large => "56x28 cm",
        }
    }
}

impl FromStr for SignSize {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignSize::ALL
            .into_iter()
            .find(|size| size.id() == s)
            .ok_or_else(|| SignError::UnknownSize(s.to_string()))
    }
}

impl fmt::Display for SignSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Up to [`MAX_LINES`] lines of at most [`MAX_LINE_CHARS`] characters each.
///
/// Construction truncates: characters past the limit and lines past the
/// fourth are dropped, so nothing longer ever reaches the label surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignText {
    lines: Vec<String>,
}

impl SignText {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dropped = 0;
        let lines = lines
            .into_iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                if idx >= MAX_LINES {
                    dropped += 1;
                    return None;
                }
                let line = line.as_ref();
                if line.chars().count() > MAX_LINE_CHARS {
                    log::warn!(
                        "Line {} is longer than {} characters and was truncated.",
                        idx + 1,
                        MAX_LINE_CHARS
                    );
                }
                Some(line.chars().take(MAX_LINE_CHARS).collect::<String>())
            })
            .collect();
        if dropped > 0 {
            log::warn!("{} line(s) beyond line {} were dropped.", dropped, MAX_LINES);
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignConfiguration {
    pub wood: WoodTexture,
    pub size: SignSize,
    pub show_pole: bool,
    pub text: SignText,
}

impl Default for SignConfiguration {
    fn default() -> Self {
        Self {
            wood: WoodTexture::Oak,
            size: SignSize::Medium,
            show_pole: true,
            text: SignText::new(["Hello !", "How are you ?!", "This is...", "OUR BASE :D"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_exactly_fourteen_chars_is_kept() {
        let text = SignText::new(["abcdefghijklmn"]);
        assert_eq!(text.lines()[0], "abcdefghijklmn");
    }

    #[test]
    fn line_of_fifteen_chars_is_truncated() {
        let text = SignText::new(["abcdefghijklmno"]);
        assert_eq!(text.lines()[0], "abcdefghijklmn");
        assert_eq!(text.lines()[0].chars().count(), MAX_LINE_CHARS);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = SignText::new(["ääääääääääääääää"]);
        assert_eq!(text.lines()[0].chars().count(), MAX_LINE_CHARS);
    }

    #[test]
    fn fifth_line_is_dropped() {
        let text = SignText::new(["1", "2", "3", "4", "5"]);
        assert_eq!(text.lines(), ["1", "2", "3", "4"]);
    }

    #[test]
    fn ids_parse_back() {
        for wood in WoodTexture::ALL {
            assert_eq!(wood.id().parse::<WoodTexture>().unwrap(), wood);
        }
        for size in SignSize::ALL {
            assert_eq!(size.id().parse::<SignSize>().unwrap(), size);
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert!(matches!(
            "birch".parse::<WoodTexture>(),
            Err(SignError::UnknownWoodTexture(id)) if id == "birch"
        ));
        assert!(matches!(
            "huge".parse::<SignSize>(),
            Err(SignError::UnknownSize(id)) if id == "huge"
        ));
    }

    #[test]
    fn size_factors() {
        assert_eq!(SignSize::Small.factor(), 0.75);
        assert_eq!(SignSize::Medium.factor(), 1.0);
        assert_eq!(SignSize::Large.factor(), 1.25);
    }

    #[test]
    fn wood_file_name() {
        assert_eq!(WoodTexture::Dark.file_name("webp"), "wood_dark.webp");
    }
}
