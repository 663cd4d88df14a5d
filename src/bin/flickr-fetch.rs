use std::{io, path::PathBuf, process::ExitCode};

use clap::{Args, Parser};
use thiserror::Error;
use tracing::info;

use flickr_fetch::{
    Client, HarvestOptions, Harvester, LicenseFilter, Size, config, flickr,
    harvest::MAX_PER_PAGE,
    logging::{self, Verbosity},
};

#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Flickr(#[from] flickr::Error),
}

type Result<T> = core::result::Result<T, Error>;

/// Search & get images from flickr
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    input: Input,

    /// Download target directory
    #[arg(short, long, default_value = "./download")]
    output: PathBuf,

    /// API key file [default: ./key.txt, $FLICKR_API_KEY, <config dir>/flickr-fetch/key.txt]
    #[arg(short, long)]
    keyfile: Option<PathBuf>,

    /// License code(s), comma separated, see
    /// https://www.flickr.com/services/api/flickr.photos.licenses.getInfo.html
    #[arg(short, long, default_value = "4")]
    license: LicenseFilter,

    /// Number of photos to return per page
    #[arg(
        long,
        alias = "per_page",
        default_value_t = MAX_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PER_PAGE))
    )]
    per_page: u32,

    /// Page to start downloading from
    #[arg(
        long,
        alias = "start_page",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    start_page: u32,

    /// Maximum number of pages to download per word
    #[arg(
        long,
        alias = "max_page",
        default_value_t = 8,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_pages: u32,

    /// Download original images (heavy on the network)
    #[arg(long, alias = "originalsize")]
    original_size: bool,

    /// Also save each search result page as JSON
    #[arg(long)]
    dump_json: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// More output (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Input {
    /// Search query word
    #[arg(short, long)]
    word: Option<String>,

    /// File with one search query word per line
    #[arg(short, long = "input-file", alias = "inputfile")]
    input_file: Option<PathBuf>,
}

impl Cli {
    fn harvest_options(&self) -> HarvestOptions {
        HarvestOptions {
            license: self.license.clone(),
            per_page: self.per_page,
            start_page: self.start_page,
            max_pages: self.max_pages,
            size: if self.original_size {
                Size::Original
            } else {
                Size::Medium
            },
            dump_json: self.dump_json,
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init_logging(
        Verbosity::from_flags(cli.quiet, cli.verbose),
        cli.log_file.as_deref(),
    )?;

    let api_key = config::resolve_api_key(cli.keyfile.as_deref())?;
    let client = Client::new(api_key)?;
    let harvester = Harvester::new(client, cli.harvest_options());

    info!(
        output = %cli.output.display(),
        license = %cli.license,
        per_page = cli.per_page,
        "flickr-fetch start"
    );

    if let Some(path) = &cli.input.input_file {
        let words = config::load_word_list(path)?;
        harvester.harvest_words(&words, &cli.output).await?;
    } else if let Some(word) = &cli.input.word {
        harvester.harvest_word(word, &cli.output).await?;
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["flickr-fetch", "-w", "cat"]).unwrap();
        let options = cli.harvest_options();

        assert_eq!(cli.input.word.as_deref(), Some("cat"));
        assert_eq!(cli.output, PathBuf::from("./download"));
        assert_eq!(options.license.codes(), &[4]);
        assert_eq!(options.per_page, 500);
        assert_eq!(options.pages(), 1..9);
        assert_eq!(options.size, Size::Medium);
    }

    #[test]
    fn accepts_underscore_aliases() {
        let cli = Cli::try_parse_from([
            "flickr-fetch",
            "--inputfile",
            "words.txt",
            "--per_page",
            "5",
            "--start_page",
            "2",
            "--max_page",
            "3",
            "--originalsize",
        ])
        .unwrap();
        let options = cli.harvest_options();

        assert_eq!(cli.input.input_file, Some(PathBuf::from("words.txt")));
        assert_eq!(options.per_page, 5);
        assert_eq!(options.pages(), 2..5);
        assert_eq!(options.size, Size::Original);
    }

    #[test]
    fn word_and_input_file_are_exclusive() {
        assert!(Cli::try_parse_from(["flickr-fetch", "-w", "cat", "-i", "words.txt"]).is_err());
        assert!(Cli::try_parse_from(["flickr-fetch"]).is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Cli::try_parse_from(["flickr-fetch", "-w", "cat", "--per-page", "501"]).is_err());
        assert!(Cli::try_parse_from(["flickr-fetch", "-w", "cat", "--per-page", "0"]).is_err());
        assert!(Cli::try_parse_from(["flickr-fetch", "-w", "cat", "--max-pages", "0"]).is_err());
        assert!(Cli::try_parse_from(["flickr-fetch", "-w", "cat", "-l", "cc0"]).is_err());
    }

    #[test]
    fn license_list() {
        let cli = Cli::try_parse_from(["flickr-fetch", "-w", "cat", "-l", "9,4"]).unwrap();

        assert_eq!(cli.license.codes(), &[4, 9]);
    }
}
