//! Command-line front end: generate a QR image or decode one.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use qrmark::{decode_file, Encoder, QrConfig};
use tracing_subscriber::EnvFilter;

/// Generate QR code images with an embedded logo, or read them back
#[derive(Parser)]
#[command(name = "qrmark")]
#[command(version)]
#[command(about = "Generate QR code images with an embedded logo, or read them back", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a JPEG QR code
    Encode {
        /// Text to encode
        content: String,

        /// Directory to write the image into (created if missing)
        #[arg(short, long, default_value = "generated")]
        dest: PathBuf,

        /// File name; a random `<n>.jpg` name is used when omitted
        #[arg(short, long)]
        name: Option<String>,

        /// Logo to draw in the center
        #[arg(short, long)]
        logo: Option<PathBuf>,

        /// Shrink the logo to at most 80x80
        #[arg(short, long)]
        compress: bool,

        /// Canvas size in pixels
        #[arg(long, default_value_t = 300)]
        size: u32,
    },
    /// Decode the QR code in an image file
    Decode {
        /// Image to read
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Encode {
            content,
            dest,
            name,
            logo,
            compress,
            size,
        } => {
            let encoder = Encoder::new(QrConfig::default().with_canvas_size(size));
            match encoder.encode_to_dir(&content, logo, &dest, name.as_deref(), compress) {
                Ok(path) => println!("{}", path.display()),
                Err(e) => {
                    eprintln!("Failed to encode: {}", e);
                    process::exit(1);
                }
            }
        }
        Command::Decode { file } => match decode_file(&file) {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => {
                eprintln!("'{}' is not a readable image", file.display());
                process::exit(2);
            }
            Err(e) => {
                eprintln!("Failed to decode '{}': {}", file.display(), e);
                process::exit(1);
            }
        },
    }
}
