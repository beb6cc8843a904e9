/// Wire a closed tag enum to its persisted short tag (`"l"`, `"dp"`, ...).
///
/// Generates `ALL` (declaration order), `tag`, `from_tag`, `Display`,
/// `From<T> for String` and `TryFrom<String>`. Put
/// `#[serde(into = "String", try_from = "String")]` on the enum to use the tag
/// as its serialized form.
macro_rules! tag_enum {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn tag(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.tag())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                v.tag().to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                $name::from_tag(&s).ok_or_else(|| format!("unknown {} tag: {s}", stringify!($name)))
            }
        }
    };
}

/// `tag_enum!` for an enum whose last variant is `Custom(String)`. Any
/// non-empty unknown string is kept verbatim.
macro_rules! open_tag_enum {
    ($name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        impl $name {
            pub fn tag(&self) -> &str {
                match self {
                    $($name::$variant => $tag,)+
                    $name::Custom(s) => s,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.tag())
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> Self {
                match v {
                    $name::Custom(s) => s,
                    known => known.tag().to_string(),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Ok(match s.as_str() {
                    $($tag => $name::$variant,)+
                    "" => return Err(format!("empty {} tag", stringify!($name))),
                    _ => $name::Custom(s),
                })
            }
        }
    };
}
