use clap::Parser;

use crate::config::{DEFAULT_OUT, DEFAULT_URL};

#[derive(Parser, Debug)]
#[command(about = "Turn a web page into a narrated slideshow video")]
pub struct Args {
    #[clap(long, default_value = DEFAULT_URL)]
    pub url: String,

    #[clap(long, default_value = DEFAULT_OUT)]
    pub out: String,
}
