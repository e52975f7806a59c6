//! Closed vocabularies carried on the wire as upper-snake-case strings.
//!
//! A vocabulary slot in the typed graph is a [`Term`]: either a recognized
//! member or the raw string that arrived. Keeping the raw string lets the
//! transformer stay total over any string input while the validator reports
//! the unknown value with its property path.

use std::fmt;

use serde::{Serialize, Serializer};

/// A closed set of wire strings backed by a Rust enum.
pub trait Vocabulary: Copy + PartialEq + Sized + 'static {
    /// Name used in violation messages (e.g. `"QuestionType"`).
    const NAME: &'static str;

    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// The exact wire string for this member.
    fn as_wire(self) -> &'static str;

    /// Look up a member by its exact (case-sensitive) wire string.
    fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_wire() == s)
    }
}

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl Vocabulary for $name {
            const NAME: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_wire(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_wire())
            }
        }
    };
}

vocabulary! {
    /// Who produced an exchange record.
    Sender {
        Agent => "AGENT",
        Candidate => "CANDIDATE",
    }
}

vocabulary! {
    /// Type tags on a prompt. `Hint` and `ButtonGroup` drive variant selection.
    QuestionType {
        Text => "TEXT",
        Hint => "HINT",
        Mcq => "MCQ",
        ButtonGroup => "BUTTON_GROUP_QUESTION",
        Rating => "RATING",
        Date => "DATE",
        Number => "NUMBER",
        Email => "EMAIL",
        Phone => "PHONE",
        FileUpload => "FILE_UPLOAD",
        Greeting => "GREETING",
        Farewell => "FAREWELL",
    }
}

vocabulary! {
    /// Media kinds a content block can be rendered as.
    ContentType {
        Text => "TEXT",
        Voice => "VOICE",
        Video => "VIDEO",
        Slider => "SLIDER",
    }
}

vocabulary! {
    /// Recognized answer rules.
    RuleName {
        MinLength => "MIN_LENGTH",
        MaxLength => "MAX_LENGTH",
        MinValue => "MIN_VALUE",
        MaxValue => "MAX_VALUE",
        MinSelections => "MIN_SELECTIONS",
        MaxSelections => "MAX_SELECTIONS",
    }
}

vocabulary! {
    /// Visual kind of a button in a choice group.
    ButtonType {
        Primary => "PRIMARY",
        Secondary => "SECONDARY",
        Outline => "OUTLINE",
        Link => "LINK",
    }
}

vocabulary! {
    /// Action fired when a choice-group option is picked.
    TriggerAction {
        NextQuestion => "NEXT_QUESTION",
        SkipQuestion => "SKIP_QUESTION",
        RepeatQuestion => "REPEAT_QUESTION",
        EndChat => "END_CHAT",
    }
}

/// A vocabulary slot as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Vocabulary> Term<T> {
    /// Classify a raw wire string.
    pub fn parse(raw: &str) -> Self {
        match T::from_wire(raw) {
            Some(v) => Term::Known(v),
            None => Term::Unrecognized(raw.to_string()),
        }
    }

    /// The recognized member, if any.
    pub fn known(&self) -> Option<T> {
        match self {
            Term::Known(v) => Some(*v),
            Term::Unrecognized(_) => None,
        }
    }

    /// The wire string, recognized or not.
    pub fn as_wire(&self) -> &str {
        match self {
            Term::Known(v) => v.as_wire(),
            Term::Unrecognized(raw) => raw,
        }
    }

    pub fn is(&self, member: T) -> bool {
        self.known() == Some(member)
    }
}

impl<T: Vocabulary> From<T> for Term<T> {
    fn from(member: T) -> Self {
        Term::Known(member)
    }
}

impl<T: Vocabulary> Serialize for Term<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<T: Vocabulary> fmt::Display for Term<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}
