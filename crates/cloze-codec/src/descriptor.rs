//! Embedded sub-question descriptor detection
//!
//! Sub-questions of a composite keep the authoring block they were created
//! from as their text, e.g. `{1:MULTICHOICE:Bow-wow#...~=Pussy-cat#...}`.
//! Only the declared type keyword matters to restore; the alternatives are
//! left to the sub-question's own type.

use once_cell::sync::Lazy;
use regex::Regex;

/// `{weight:KEYWORD:alternatives}` where alternatives may escape `}` with `\`
static DESCRIPTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{([0-9]*):([A-Z_]+):((?:\\.|[^\\}])+)\}")
        .expect("descriptor pattern compiles")
});

/// Presentation of a choice sub-question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceLayout {
    /// Inline select menu
    Dropdown,

    /// Vertical radio list
    Vertical,

    /// Horizontal radio row
    Horizontal,
}

/// Declared type of an embedded descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    /// `NUMERICAL` / `NM`
    Numerical,

    /// `MULTICHOICE` family
    MultiChoice {
        /// Layout variant
        layout: ChoiceLayout,
        /// `_S` variants shuffle their choices
        shuffled: bool,
    },

    /// `MULTIRESPONSE` family
    MultiResponse {
        /// `_H` variants lay choices out horizontally
        horizontal: bool,
        /// `_S` variants shuffle their choices
        shuffled: bool,
    },

    /// `SHORTANSWER` family
    ShortAnswer {
        /// `_C` variants match case
        case_sensitive: bool,
    },

    /// `REGEXP` family
    Regexp {
        /// `_C` variants match case
        case_sensitive: bool,
    },
}

impl DescriptorKind {
    /// Kind for a type keyword, `None` when the keyword is unknown
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        use ChoiceLayout::{Dropdown, Horizontal, Vertical};

        let kind = match keyword {
            "NUMERICAL" | "NM" => Self::Numerical,
            "MULTICHOICE" | "MC" => Self::MultiChoice { layout: Dropdown, shuffled: false },
            "MULTICHOICE_V" | "MCV" => Self::MultiChoice { layout: Vertical, shuffled: false },
            "MULTICHOICE_H" | "MCH" => Self::MultiChoice { layout: Horizontal, shuffled: false },
            "MULTICHOICE_S" | "MCS" => Self::MultiChoice { layout: Dropdown, shuffled: true },
            "MULTICHOICE_VS" | "MCVS" => Self::MultiChoice { layout: Vertical, shuffled: true },
            "MULTICHOICE_HS" | "MCHS" => Self::MultiChoice { layout: Horizontal, shuffled: true },
            "MULTIRESPONSE" | "MR" => Self::MultiResponse { horizontal: false, shuffled: false },
            "MULTIRESPONSE_H" | "MRH" => Self::MultiResponse { horizontal: true, shuffled: false },
            "MULTIRESPONSE_S" | "MRS" => Self::MultiResponse { horizontal: false, shuffled: true },
            "MULTIRESPONSE_HS" | "MRHS" => Self::MultiResponse { horizontal: true, shuffled: true },
            "SHORTANSWER" | "SA" | "MW" => Self::ShortAnswer { case_sensitive: false },
            "SHORTANSWER_C" | "SAC" | "MWC" => Self::ShortAnswer { case_sensitive: true },
            "REGEXP" | "RX" => Self::Regexp { case_sensitive: false },
            "REGEXP_C" | "RXC" => Self::Regexp { case_sensitive: true },
            _ => return None,
        };
        Some(kind)
    }
}

/// Descriptor found in question text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Leading weight, `None` when omitted (`{:MC:...}`)
    pub weight: Option<u32>,

    /// Keyword exactly as written
    pub keyword: String,

    /// Declared kind
    pub kind: DescriptorKind,
}

impl Descriptor {
    /// Plain `MULTICHOICE` / `MC` drop-down
    ///
    /// Its choice order is fixed by the descriptor itself, so the stored
    /// sub-question must not shuffle.
    #[inline]
    #[must_use]
    pub fn is_plain_multichoice(&self) -> bool {
        self.kind
            == DescriptorKind::MultiChoice {
                layout: ChoiceLayout::Dropdown,
                shuffled: false,
            }
    }
}

/// First descriptor with a known keyword in `text`
#[must_use]
pub fn find_descriptor(text: &str) -> Option<Descriptor> {
    DESCRIPTOR.captures_iter(text).find_map(|caps| {
        let keyword = caps.get(2)?.as_str();
        let kind = DescriptorKind::from_keyword(keyword)?;
        let weight = caps.get(1).and_then(|m| m.as_str().parse().ok());

        Some(Descriptor {
            weight,
            keyword: keyword.to_string(),
            kind,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MC_TEXT: &str = "{1:MULTICHOICE:Bow-wow#You seem to have a dog obsessions!\
                           ~Wiggly worm#Now you are just being ridiculous!~=Pussy-cat#Well done!}";

    #[test]
    fn finds_plain_multichoice() {
        let descriptor = find_descriptor(MC_TEXT).unwrap();
        assert_eq!(descriptor.weight, Some(1));
        assert_eq!(descriptor.keyword, "MULTICHOICE");
        assert!(descriptor.is_plain_multichoice());
    }

    #[test]
    fn short_keyword() {
        let descriptor = find_descriptor("{2:MC:=a~b}").unwrap();
        assert!(descriptor.is_plain_multichoice());
        assert_eq!(descriptor.weight, Some(2));
    }

    #[test]
    fn shuffled_variant_is_not_plain() {
        let descriptor = find_descriptor("{1:MCS:=a~b}").unwrap();
        assert_eq!(
            descriptor.kind,
            DescriptorKind::MultiChoice {
                layout: ChoiceLayout::Dropdown,
                shuffled: true
            }
        );
        assert!(!descriptor.is_plain_multichoice());
    }

    #[test]
    fn vertical_variant_is_not_plain() {
        let descriptor = find_descriptor("{1:MULTICHOICE_V:=a~b}").unwrap();
        assert!(!descriptor.is_plain_multichoice());
    }

    #[test]
    fn missing_weight() {
        let descriptor = find_descriptor("{:SA:=Owl}").unwrap();
        assert_eq!(descriptor.weight, None);
        assert_eq!(
            descriptor.kind,
            DescriptorKind::ShortAnswer {
                case_sensitive: false
            }
        );
    }

    #[test]
    fn regexp_variants() {
        let descriptor = find_descriptor("{1:REGEXP_C:=Owls?}").unwrap();
        assert_eq!(
            descriptor.kind,
            DescriptorKind::Regexp {
                case_sensitive: true
            }
        );
    }

    #[test]
    fn escaped_brace_inside_alternatives() {
        let descriptor = find_descriptor(r"{1:SA:=a\}b#ok}").unwrap();
        assert_eq!(descriptor.keyword, "SA");
    }

    #[test]
    fn unknown_keyword_is_skipped() {
        let descriptor = find_descriptor("{1:ESSAY:x} then {1:MC:=a~b}").unwrap();
        assert_eq!(descriptor.keyword, "MC");
    }

    #[test]
    fn plain_text_has_no_descriptor() {
        assert!(find_descriptor("Which animal went to sea?").is_none());
        assert!(find_descriptor("{#1} and {#2}").is_none());
        assert!(find_descriptor("{1:MC:}").is_none());
    }
}
