//! Closed code sets used by the canonical records.
//!
//! Every set is an enum whose serialized form is the legacy application's
//! code (`"DNI"`, `"ADU"`, `"OK"`, ...). Matching is case-insensitive and a
//! set may declare aliases that resolve to a canonical member at ingestion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed set of string codes.
pub trait CodeSet: Sized + Copy + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Alternative spellings accepted on input.
    const ALIASES: &'static [(&'static str, Self)] = &[];

    /// The canonical code.
    fn code(&self) -> &'static str;

    /// Resolve a code or alias, ignoring case and surrounding whitespace.
    fn from_code(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.code().eq_ignore_ascii_case(input))
            .or_else(|| {
                Self::ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(input))
                    .map(|(_, member)| *member)
            })
    }

    /// The canonical codes as plain strings.
    fn codes() -> Vec<&'static str> {
        Self::ALL.iter().map(|member| member.code()).collect()
    }
}

/// Declare a code enum together with its [`CodeSet`] and `Display` impls.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
        $( aliases { $( $alias:literal => $target:ident ),+ $(,)? } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl CodeSet for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];
            $( const ALIASES: &'static [(&'static str, Self)] = &[$(($alias, $name::$target)),+]; )?

            fn code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }
    };
}

code_enum! {
    /// Identity document type.
    pub enum DocumentType {
        /// Documento Nacional de Identidad
        Dni => "DNI",
        /// Passport
        Pas => "PAS",
        /// Cédula de identidad
        Ci => "CI",
        /// Libreta de enrolamiento
        Le => "LE",
        /// Libreta cívica
        Lc => "LC",
    }
    aliases {
        "PASAPORTE" => Pas,
        "PASSPORT" => Pas,
        "CEDULA" => Ci,
    }
}

code_enum! {
    /// Passenger sex as recorded by the booking application.
    pub enum Sex {
        Male => "M",
        Female => "F",
    }
    aliases {
        "MALE" => Male,
        "MASCULINO" => Male,
        "FEMALE" => Female,
        "FEMENINO" => Female,
    }
}

code_enum! {
    /// Fare category of a passenger.
    #[derive(Default)]
    pub enum PassengerType {
        #[default]
        Adult => "ADU",
        Child => "CHD",
        Infant => "INF",
    }
    aliases {
        "ADT" => Adult,
        "CHILD" => Child,
        "INFANT" => Infant,
    }
}

code_enum! {
    /// Status of a single bookable line (hotel, service, package).
    pub enum Estado {
        /// Confirmed
        Ok => "OK",
        /// Requested
        Rq => "RQ",
        /// Cancelled
        Cx => "CX",
        /// Waitlisted
        Wl => "WL",
        /// Holding confirmed
        Hk => "HK",
        /// Holding waitlisted
        Hl => "HL",
        /// Holding need
        Hn => "HN",
        /// Holding cancelled
        Hx => "HX",
        /// Confirming
        Kk => "KK",
        /// Confirming from waitlist
        Kl => "KL",
        /// Need
        Nn => "NN",
        /// No action taken
        No => "NO",
        /// Unable, not cancelled
        Uc => "UC",
        /// Unable, does not operate
        Un => "UN",
        /// Unable, waitlisted
        Uu => "UU",
        /// Schedule change confirmed
        Tk => "TK",
        /// Schedule change waitlisted
        Tl => "TL",
        /// Cancelled by supplier
        Xx => "XX",
        /// Cancel listing
        Xl => "XL",
        /// Sold
        Ss => "SS",
        /// Reconfirmed
        Rr => "RR",
        /// Pending
        Pn => "PN",
        /// Ghost confirmed
        Gk => "GK",
        /// Ghost waitlisted
        Gl => "GL",
        /// If not holding, need
        In => "IN",
        /// Waitlist requested
        Ll => "LL",
        /// Priority waitlist
        Pa => "PA",
        /// Desired segment
        Ds => "DS",
    }
}
