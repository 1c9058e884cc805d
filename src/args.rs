/// What the binary was asked to do, decided from its arguments.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Action {
    Help,
    Version,
    /// Start the REPL; `live` turns on result previews while typing.
    Repl { live: bool },
    /// Evaluate the arguments joined by spaces.
    Eval(String),
}

impl Action {
    /// Reads the arguments after the program name.
    ///
    /// A help flag anywhere wins, then a version flag, then any expression
    /// text. Arguments after `--` are always expression text, so negative
    /// numbers and words like `version` can still be evaluated.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut help = false;
        let mut version = false;
        let mut live = false;
        let mut words = vec![];
        let mut literal = false;
        for arg in args {
            if literal {
                words.push(arg);
                continue;
            }
            match arg.as_str() {
                "--" => literal = true,
                "-h" | "--help" | "help" => help = true,
                "-v" | "-V" | "--version" | "version" => version = true,
                "--live" => live = true,
                _ => words.push(arg),
            }
        }
        let expr = words
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if help {
            Self::Help
        } else if version {
            Self::Version
        } else if expr.is_empty() {
            Self::Repl { live }
        } else {
            Self::Eval(expr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Action;

    fn parse(args: &[&str]) -> Action {
        Action::parse(args.iter().map(|&arg| String::from(arg)))
    }

    fn eval(expr: &str) -> Action {
        Action::Eval(String::from(expr))
    }

    #[test]
    fn help_beats_everything() {
        assert_eq!(parse(&["-h"]), Action::Help);
        assert_eq!(parse(&["help"]), Action::Help);
        assert_eq!(parse(&["2", "**", "8", "--help"]), Action::Help);
        assert_eq!(parse(&["-V", "--help", "--live"]), Action::Help);
    }

    #[test]
    fn version_beats_expressions() {
        assert_eq!(parse(&["--version"]), Action::Version);
        assert_eq!(parse(&["-v"]), Action::Version);
        assert_eq!(parse(&["1", "<<", "4", "-V"]), Action::Version);
        assert_eq!(parse(&["version", "--live"]), Action::Version);
    }

    #[test]
    fn expression_words_are_joined() {
        assert_eq!(parse(&["10", "**", "30", "/", "7"]), eval("10 ** 30 / 7"));
        assert_eq!(parse(&[" -17 >> 2 "]), eval("-17 >> 2"));
        assert_eq!(parse(&["", "\t", "ans"]), eval("ans"));
        assert_eq!(parse(&["--live", "1 + 1"]), eval("1 + 1"));
    }

    #[test]
    fn double_dash_ends_flags() {
        assert_eq!(parse(&["--", "-v"]), eval("-v"));
        assert_eq!(parse(&["--", "version", "+", "1"]), eval("version + 1"));
        assert_eq!(parse(&["-h", "--", "1"]), Action::Help);
        assert_eq!(parse(&["--", "--"]), eval("--"));
    }

    #[test]
    fn no_expression_starts_the_repl() {
        assert_eq!(parse(&[]), Action::Repl { live: false });
        assert_eq!(parse(&["", " "]), Action::Repl { live: false });
        assert_eq!(parse(&["--live"]), Action::Repl { live: true });
        assert_eq!(parse(&["--live", "--"]), Action::Repl { live: true });
    }
}
