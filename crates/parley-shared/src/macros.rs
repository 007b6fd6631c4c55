/// Declares a closed enumeration with a stable label and an optional legacy
/// integer code per member, and implements [`crate::types::Enumerant`],
/// `Display`, `FromStr` and serde (as the label) for it.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident as $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $label:literal $(= $code:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl $crate::types::Enumerant for $name {
            const KIND: &'static str = $kind;

            fn label(self) -> &'static str {
                self.as_str()
            }

            fn code(self) -> Option<i64> {
                match self {
                    $($name::$variant => closed_enum!(@code $($code)?),)+
                }
            }

            fn from_label(s: &str) -> Result<Self, $crate::error::ParseEnumError> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) {
                        return Ok($name::$variant);
                    }
                )+
                Err($crate::error::ParseEnumError::new($kind, s, Self::LABELS))
            }

            fn from_code(code: i64) -> Result<Self, $crate::error::ParseEnumError> {
                $($(
                    if code == $code {
                        return Ok($name::$variant);
                    }
                )?)+
                Err($crate::error::ParseEnumError::new(
                    $kind,
                    code.to_string(),
                    Self::LABELS,
                ))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::types::Enumerant>::from_label(s)
            }
        }
    };
    (@code $code:literal) => {
        Some($code)
    };
    (@code) => {
        None
    };
}
