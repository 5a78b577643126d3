use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level content fields a reply may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    HeroHeading,
    HeroDescription,
    HeroJumboText,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Title,
        Field::HeroHeading,
        Field::HeroDescription,
        Field::HeroJumboText,
    ];

    /// Name used for this field on the wire and in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::HeroHeading => "heroHeading",
            Field::HeroDescription => "heroDescription",
            Field::HeroJumboText => "heroJumboText",
        }
    }

    pub fn from_wire(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares the closed set of canvas copy keys.
///
/// Each row is `Variant => "wireName", "default copy";`. Adding a key to the
/// allow-list is a one-line change here: the enum, the enumeration order, the
/// wire name and the fallback text all come from the same row.
macro_rules! copy_keys {
    ($($variant:ident => $wire:literal, $default:literal;)+) => {
        /// A named text slot on the canvas.
        ///
        /// This is the allow-list: a key that is not a variant here can never
        /// be stored in [`CanvasCopy`](crate::content::CanvasCopy).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum CopyKey {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl CopyKey {
            /// Every key, in declaration order.
            pub const ALL: &'static [CopyKey] = &[$(CopyKey::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(CopyKey::$variant => $wire,)+
                }
            }

            /// Text shown when the document holds no value for this key.
            pub fn default_copy(self) -> &'static str {
                match self {
                    $(CopyKey::$variant => $default,)+
                }
            }
        }
    };
}

copy_keys! {
    ExperienceHeading => "experienceHeading", "Experience";
    ExperienceParagraph => "experienceParagraph", "A track record of thoughtful work across product, brand and web.";
    Work1Title => "work1Title", "Brand Refresh";
    Work1Category => "work1Category", "Branding";
    Work2Title => "work2Title", "Mobile Banking App";
    Work2Category => "work2Category", "Product Design";
    Work3Title => "work3Title", "Editorial Website";
    Work3Category => "work3Category", "Web Design";
    Work4Title => "work4Title", "Launch Campaign";
    Work4Category => "work4Category", "Marketing";
    Exp1Company => "exp1Company", "Studio North";
    Exp1Role => "exp1Role", "Lead Designer";
    Exp1Period => "exp1Period", "2021 - Present";
    Exp2Company => "exp2Company", "Brightline";
    Exp2Role => "exp2Role", "Product Designer";
    Exp2Period => "exp2Period", "2018 - 2021";
    Exp3Company => "exp3Company", "Paper & Pixel";
    Exp3Role => "exp3Role", "UI Designer";
    Exp3Period => "exp3Period", "2016 - 2018";
    Exp4Company => "exp4Company", "Freelance";
    Exp4Role => "exp4Role", "Designer";
    Exp4Period => "exp4Period", "2014 - 2016";
    ContactHeading => "contactHeading", "Let's work together";
    ContactSubheading => "contactSubheading", "Get in touch";
    ContactParagraph => "contactParagraph", "Have a project in mind? Send a message and I'll get back to you.";
    FooterText => "footerText", "Your Name. All rights reserved.";
    SectionNew1Title => "sectionNew1Title", "Card One";
    SectionNew1Category => "sectionNew1Category", "Category";
    SectionNew2Title => "sectionNew2Title", "Card Two";
    SectionNew2Category => "sectionNew2Category", "Category";
    SectionNew3Title => "sectionNew3Title", "Card Three";
    SectionNew3Category => "sectionNew3Category", "Category";
    SectionNew4Title => "sectionNew4Title", "Card Four";
    SectionNew4Category => "sectionNew4Category", "Category";
}

impl CopyKey {
    /// Title/category keys for work item `n` (1-based).
    pub fn work_item(n: usize) -> Option<(CopyKey, CopyKey)> {
        match n {
            1 => Some((CopyKey::Work1Title, CopyKey::Work1Category)),
            2 => Some((CopyKey::Work2Title, CopyKey::Work2Category)),
            3 => Some((CopyKey::Work3Title, CopyKey::Work3Category)),
            4 => Some((CopyKey::Work4Title, CopyKey::Work4Category)),
            _ => None,
        }
    }

    /// Company/role/period keys for experience entry `n` (1-based).
    pub fn experience_entry(n: usize) -> Option<(CopyKey, CopyKey, CopyKey)> {
        match n {
            1 => Some((CopyKey::Exp1Company, CopyKey::Exp1Role, CopyKey::Exp1Period)),
            2 => Some((CopyKey::Exp2Company, CopyKey::Exp2Role, CopyKey::Exp2Period)),
            3 => Some((CopyKey::Exp3Company, CopyKey::Exp3Role, CopyKey::Exp3Period)),
            4 => Some((CopyKey::Exp4Company, CopyKey::Exp4Role, CopyKey::Exp4Period)),
            _ => None,
        }
    }
}

impl fmt::Display for CopyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown canvas copy key: {0}")]
pub struct UnknownCopyKey(pub String);

impl FromStr for CopyKey {
    type Err = UnknownCopyKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CopyKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownCopyKey(s.to_string()))
    }
}

/// Every key a reply may use, top-level fields first.
pub fn allowed_keys() -> impl Iterator<Item = &'static str> {
    Field::ALL
        .iter()
        .map(|f| f.as_str())
        .chain(CopyKey::ALL.iter().map(|k| k.as_str()))
}
