use clap::Subcommand;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search stores by country, city and category.
    Search {
        /// Country to search in.
        #[clap(long)]
        country: String,
        /// City to search in.
        #[clap(long)]
        city: String,
        /// Store category.
        #[clap(long)]
        category: String,
        /// Keep loading pages after each run pauses at the page limit.
        #[clap(long)]
        all: bool,
        /// Where to write the results CSV.
        #[clap(short, long, default_value = storescout::export::SEARCH_RESULTS_FILE)]
        output: PathBuf,
    },
    /// Verify every website listed in a CSV file.
    Verify {
        /// CSV file with a url, URL, Website or website column.
        input: PathBuf,
        /// Where to write the verification CSV.
        #[clap(short, long, default_value = storescout::export::VERIFICATION_RESULTS_FILE)]
        output: PathBuf,
    },
}
