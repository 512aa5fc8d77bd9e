use std::{borrow::Cow, path::Path};

/// Source location a log call originated from.
///
/// Only used to render the message preface; never consulted for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub function: Cow<'static, str>,
    pub line: u32,
}

impl CallSite {
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        function: impl Into<Cow<'static, str>>,
        line: u32,
    ) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }

    /// Allocation-free constructor used by [`call_site!`](crate::call_site).
    #[must_use]
    pub const fn from_static(file: &'static str, function: &'static str, line: u32) -> Self {
        Self {
            file: Cow::Borrowed(file),
            function: Cow::Borrowed(function),
            line,
        }
    }

    /// File name without directories or extension: `src/net/Foo.swift` -> `Foo`.
    #[must_use]
    pub fn file_base_name(&self) -> &str {
        Path::new(self.file.as_ref())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(self.file.as_ref())
    }
}

/// Turns the type name of a marker item nested in a function into that
/// function's path: `app::net::connect::__here` -> `app::net::connect`.
/// Closure segments are dropped so calls inside closures report their owner.
#[doc(hidden)]
#[must_use]
pub fn enclosing_function(marker: &'static str) -> &'static str {
    let mut name = marker.rsplit_once("::").map_or(marker, |(owner, _)| owner);
    while let Some(owner) = name.strip_suffix("::{{closure}}") {
        name = owner;
    }
    name
}

/// Captures the current file, enclosing function and line as a [`CallSite`].
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __veneer_here() {}
        $crate::log::call_site::CallSite::from_static(
            file!(),
            $crate::log::call_site::enclosing_function(::std::any::type_name_of_val(
                &__veneer_here,
            )),
            line!(),
        )
    }};
}
