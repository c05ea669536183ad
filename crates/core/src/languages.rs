//! Registry of the audio/subtitle version tags the catalogue uses.
//!
//! Episode language maps are keyed by free-form tags; the tags below are the
//! ones the UI knows how to label. Unknown tags remain legal data.

/// Display metadata for a known version tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub tag: &'static str,
    pub name: &'static str,
    /// ISO 639-1-ish code used to pick a flag asset.
    pub code: &'static str,
}

pub const KNOWN_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        tag: "VF",
        name: "Version Française",
        code: "fr",
    },
    LanguageInfo {
        tag: "VOSTFR",
        name: "Version Originale Sous-titrée Français",
        code: "jp",
    },
    LanguageInfo {
        tag: "VO",
        name: "Version Originale Japonaise",
        code: "jp",
    },
    LanguageInfo {
        tag: "VA",
        name: "Version Anglaise",
        code: "en",
    },
    LanguageInfo {
        tag: "VTN",
        name: "Version Tunisienne",
        code: "tn",
    },
    LanguageInfo {
        tag: "VAR",
        name: "Version Arabe",
        code: "ar",
    },
];

/// Look up display metadata for a version tag.
pub fn language_info(tag: &str) -> Option<&'static LanguageInfo> {
    KNOWN_LANGUAGES.iter().find(|l| l.tag == tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags_resolve() {
        assert_eq!(language_info("VF").unwrap().code, "fr");
        assert_eq!(language_info("VOSTFR").unwrap().code, "jp");
        assert!(language_info("VQ").is_none());
    }
}
