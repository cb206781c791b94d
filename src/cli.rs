use std::path::PathBuf;

use crate::error::GlobeError;

const USAGE: &str = "usage: earthpic-rs [SOURCE]\n       \
                     earthpic-rs compress <input.csv> <output.csv>\n       \
                     earthpic-rs render <input.csv> <output.png>\n       \
                     earthpic-rs fetch [--latstep N] [--lonstep N] [--url TEMPLATE] <output.csv>";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Open the viewer; `None` uses the configured dataset.
    Viewer { source: Option<String> },
    Compress { input: PathBuf, output: PathBuf },
    Render { input: PathBuf, output: PathBuf },
    /// Sample a pixel color at every grid point and write them as a dataset.
    Fetch {
        output: PathBuf,
        lat_step: f64,
        lon_step: f64,
        /// `None` uses the static map endpoint.
        url: Option<String>,
    },
}

impl Command {
    /// Parse the arguments that follow the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, GlobeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.as_slice() {
            [] => Ok(Command::Viewer { source: None }),
            [tool, input, output] if tool == "compress" => Ok(Command::Compress {
                input: input.into(),
                output: output.into(),
            }),
            [tool, input, output] if tool == "render" => Ok(Command::Render {
                input: input.into(),
                output: output.into(),
            }),
            [tool, rest @ ..] if tool == "fetch" => parse_fetch(rest),
            [tool, ..] if tool == "compress" || tool == "render" => Err(GlobeError::usage(USAGE)),
            [flag] if flag == "-h" || flag == "--help" => Err(GlobeError::usage(USAGE)),
            [source] => Ok(Command::Viewer {
                source: Some(source.clone()),
            }),
            _ => Err(GlobeError::usage(USAGE)),
        }
    }
}

fn parse_fetch(args: &[String]) -> Result<Command, GlobeError> {
    let mut output = None;
    let mut lat_step = 1.0;
    let mut lon_step = 1.0;
    let mut url = None;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-latstep" | "--latstep" => lat_step = parse_step(args.next())?,
            "-lonstep" | "--lonstep" => lon_step = parse_step(args.next())?,
            "-url" | "--url" => {
                url = Some(args.next().ok_or_else(|| GlobeError::usage(USAGE))?.clone())
            }
            path if output.is_none() && !path.starts_with('-') => output = Some(PathBuf::from(path)),
            _ => return Err(GlobeError::usage(USAGE)),
        }
    }

    Ok(Command::Fetch {
        output: output.ok_or_else(|| GlobeError::usage(USAGE))?,
        lat_step,
        lon_step,
        url,
    })
}

fn parse_step(value: Option<&String>) -> Result<f64, GlobeError> {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|step| step.is_finite() && *step > 0.0)
        .ok_or_else(|| GlobeError::usage(USAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_open_the_viewer() {
        assert_eq!(
            Command::parse(Vec::<String>::new()).unwrap(),
            Command::Viewer { source: None }
        );
    }

    #[test]
    fn single_argument_is_the_source() {
        assert_eq!(
            Command::parse(["https://example.com/p.csv"]).unwrap(),
            Command::Viewer {
                source: Some("https://example.com/p.csv".to_string())
            }
        );
    }

    #[test]
    fn tools_take_input_and_output() {
        assert_eq!(
            Command::parse(["compress", "in.csv", "out.csv"]).unwrap(),
            Command::Compress {
                input: "in.csv".into(),
                output: "out.csv".into()
            }
        );
        assert_eq!(
            Command::parse(["render", "in.csv", "out.png"]).unwrap(),
            Command::Render {
                input: "in.csv".into(),
                output: "out.png".into()
            }
        );
    }

    #[test]
    fn wrong_arity_is_a_usage_error() {
        for args in [vec!["compress", "in.csv"], vec!["render"], vec!["a", "b"], vec!["--help"]] {
            let err = Command::parse(args).unwrap_err();
            assert!(matches!(err, GlobeError::Usage(ref msg) if msg.starts_with("usage:")));
        }
    }

    #[test]
    fn fetch_defaults_to_one_degree_steps() {
        assert_eq!(
            Command::parse(["fetch", "out.csv"]).unwrap(),
            Command::Fetch {
                output: "out.csv".into(),
                lat_step: 1.0,
                lon_step: 1.0,
                url: None
            }
        );
    }

    #[test]
    fn fetch_flags_may_come_before_or_after_output() {
        assert_eq!(
            Command::parse([
                "fetch",
                "--latstep",
                "5",
                "out.csv",
                "-lonstep",
                "2.5",
                "--url",
                "http://h/{lat},{lon}",
            ])
            .unwrap(),
            Command::Fetch {
                output: "out.csv".into(),
                lat_step: 5.0,
                lon_step: 2.5,
                url: Some("http://h/{lat},{lon}".to_string())
            }
        );
    }

    #[test]
    fn fetch_rejects_bad_steps_and_missing_output() {
        for args in [
            vec!["fetch"],
            vec!["fetch", "out.csv", "--latstep", "0"],
            vec!["fetch", "out.csv", "--lonstep", "-1"],
            vec!["fetch", "out.csv", "--latstep"],
            vec!["fetch", "a.csv", "b.csv"],
            vec!["fetch", "out.csv", "--verbose"],
        ] {
            let err = Command::parse(args.clone()).unwrap_err();
            assert!(matches!(err, GlobeError::Usage(_)), "{args:?}");
        }
    }
}
