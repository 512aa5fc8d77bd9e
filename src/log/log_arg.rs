use std::fmt;

/// One positional argument substituted into a log template.
///
/// Use `From` conversions for primitives and strings, or [`LogArg::display`]
/// for anything implementing [`fmt::Display`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl LogArg {
    /// Captures any displayable value as a string argument.
    pub fn display(value: impl fmt::Display) -> Self {
        LogArg::Str(value.to_string())
    }

    /// Integer view used by `%d`/`%u`/`%x`; bools count as 0 / 1.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match *self {
            LogArg::Int(v) => Some(i128::from(v)),
            LogArg::UInt(v) => Some(i128::from(v)),
            LogArg::Bool(v) => Some(i128::from(v)),
            LogArg::Char(c) => Some(i128::from(u32::from(c))),
            LogArg::Float(_) | LogArg::Str(_) => None,
        }
    }

    /// Float view used by `%f`/`%e`/`%g`; integers widen.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match *self {
            LogArg::Float(v) => Some(v),
            LogArg::Int(v) => Some(v as f64),
            LogArg::UInt(v) => Some(v as f64),
            LogArg::Bool(_) | LogArg::Char(_) | LogArg::Str(_) => None,
        }
    }

    pub(crate) fn as_char(&self) -> Option<char> {
        match *self {
            LogArg::Char(c) => Some(c),
            LogArg::UInt(v) => u32::try_from(v).ok().and_then(char::from_u32),
            LogArg::Int(v) => u32::try_from(v).ok().and_then(char::from_u32),
            _ => None,
        }
    }
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Int(v) => write!(f, "{v}"),
            LogArg::UInt(v) => write!(f, "{v}"),
            LogArg::Float(v) => write!(f, "{v}"),
            LogArg::Bool(v) => write!(f, "{v}"),
            LogArg::Char(v) => write!(f, "{v}"),
            LogArg::Str(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from_arg {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg {
                fn from(value: $ty) -> Self {
                    LogArg::$variant(<$wide>::from(value))
                }
            }
        )*
    };
}

impl_from_arg!(Int as i64: i8, i16, i32, i64);
impl_from_arg!(UInt as u64: u8, u16, u32, u64);
impl_from_arg!(Float as f64: f32, f64);

impl From<isize> for LogArg {
    fn from(value: isize) -> Self {
        // isize is at most 64 bits on every supported target
        LogArg::Int(value as i64)
    }
}

impl From<usize> for LogArg {
    fn from(value: usize) -> Self {
        LogArg::UInt(value as u64)
    }
}

impl From<bool> for LogArg {
    fn from(value: bool) -> Self {
        LogArg::Bool(value)
    }
}

impl From<char> for LogArg {
    fn from(value: char) -> Self {
        LogArg::Char(value)
    }
}

impl From<&str> for LogArg {
    fn from(value: &str) -> Self {
        LogArg::Str(value.to_string())
    }
}

impl From<String> for LogArg {
    fn from(value: String) -> Self {
        LogArg::Str(value)
    }
}

impl From<&String> for LogArg {
    fn from(value: &String) -> Self {
        LogArg::Str(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_widest_variant() {
        assert_eq!(LogArg::from(-3i8), LogArg::Int(-3));
        assert_eq!(LogArg::from(7u16), LogArg::UInt(7));
        assert_eq!(LogArg::from(1.5f32), LogArg::Float(1.5));
        assert_eq!(LogArg::from(42usize), LogArg::UInt(42));
        assert_eq!(LogArg::from("hi"), LogArg::Str("hi".into()));
        assert_eq!(
            LogArg::display(std::net::Ipv4Addr::LOCALHOST),
            LogArg::Str("127.0.0.1".into())
        );
    }

    #[test]
    fn numeric_views() {
        assert_eq!(LogArg::Bool(true).as_i128(), Some(1));
        assert_eq!(LogArg::Float(2.0).as_i128(), None);
        assert_eq!(LogArg::Int(-2).as_f64(), Some(-2.0));
        assert_eq!(LogArg::UInt(65).as_char(), Some('A'));
        assert_eq!(LogArg::Str("x".into()).as_char(), None);
    }
}
