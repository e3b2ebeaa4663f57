//! Log message argument formatting.
//!
//! Mirrors the argument model of the leveled emitters: a leading string
//! argument may contain positional `{}` placeholders, each consuming one of
//! the following arguments; every other argument renders through its
//! structured [`Debug`](std::fmt::Debug) form, and top-level arguments are
//! joined with single spaces.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\}").expect("valid placeholder pattern"));

/// One argument to a leveled log call.
///
/// Strings pass through verbatim; every other value is rendered once, at
/// construction, through its `Debug` or `Display` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A string argument, used verbatim (and eligible to carry `{}`
    /// placeholders when it is the first argument).
    Str(String),
    /// A non-string argument, already rendered to its display text.
    Value(String),
}

impl Arg {
    /// Render any `Debug` value into an argument.
    pub fn debug<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Arg::Value(format!("{value:?}"))
    }

    fn rendered(&self) -> &str {
        match self {
            Arg::Str(text) | Arg::Value(text) => text,
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Str(value.clone())
    }
}

macro_rules! display_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Arg::Value(value.to_string())
                }
            }
        )*
    };
}

display_args!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Build an argument slice for the leveled emitters.
///
/// ```
/// use glint::args;
///
/// let message = glint::message::format_message(&args!["found {} items in {}", 5, "Hello.txt"]);
/// assert_eq!(message, "found 5 items in Hello.txt");
/// ```
#[macro_export]
macro_rules! args {
    () => {{
        let empty: [$crate::message::Arg; 0] = [];
        empty
    }};
    ($($arg:expr),+ $(,)?) => {
        [$($crate::message::Arg::from($arg)),+]
    };
}

/// Join arguments into a single message line.
///
/// When the first argument is a string, each `{}` in it consumes the next
/// argument in left-to-right order; placeholders left over once the
/// arguments run out stay verbatim. Remaining arguments (and all arguments
/// when the first is not a string) are appended space-separated.
pub fn format_message(args: &[Arg]) -> String {
    let mut out = String::new();
    let mut index = 0;

    while index < args.len() {
        if !out.is_empty() {
            out.push(' ');
        }

        match &args[index] {
            Arg::Str(template) if index == 0 => {
                let mut next = index + 1;
                let filled = PLACEHOLDER.replace_all(template, |_: &Captures| {
                    if next < args.len() {
                        let value = args[next].rendered().to_string();
                        next += 1;
                        value
                    } else {
                        "{}".to_string()
                    }
                });
                out.push_str(&filled);
                index = next;
                continue;
            }
            arg => out.push_str(arg.rendered()),
        }

        index += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_fill_positionally() {
        let message = format_message(&args!["found {} items in {}", 5, "Hello.txt"]);
        assert_eq!(message, "found 5 items in Hello.txt");
    }

    #[test]
    fn test_no_placeholders_joins_with_spaces() {
        let message = format_message(&args!["status:", "ready", 3]);
        assert_eq!(message, "status: ready 3");
    }

    #[test]
    fn test_empty_args_is_empty_message() {
        assert_eq!(format_message(&args![]), "");
    }

    #[test]
    fn test_leftover_placeholders_stay_verbatim() {
        let message = format_message(&args!["got {} of {}", 2]);
        assert_eq!(message, "got 2 of {}");
    }

    #[test]
    fn test_unconsumed_trailing_args_are_appended() {
        let message = format_message(&args!["done {}", 1, "extra"]);
        assert_eq!(message, "done 1 extra");
    }

    #[test]
    fn test_placeholder_only_in_first_string() {
        // A later string argument with braces is appended verbatim.
        let message = format_message(&args!["first", "{}", "third"]);
        assert_eq!(message, "first {} third");
    }

    #[test]
    fn test_non_string_first_arg_is_rendered_not_templated() {
        let message = format_message(&args![42, "next"]);
        assert_eq!(message, "42 next");
    }

    #[test]
    fn test_debug_arg_renders_structured() {
        let items = vec![1, 2, 3];
        let message = format_message(&[Arg::from("items: {}"), Arg::debug(&items)]);
        assert_eq!(message, "items: [1, 2, 3]");
    }

    #[test]
    fn test_numeric_args_render_plain() {
        assert_eq!(Arg::from(5).rendered(), "5");
        assert_eq!(Arg::from(2.5).rendered(), "2.5");
        assert_eq!(Arg::from(true).rendered(), "true");
    }
}
