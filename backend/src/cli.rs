use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::inference::ModelState;
use crate::pipeline;

#[derive(Debug, Parser)]
#[command(name = "ela-backend", about = "Error level analysis forgery detector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Classify a single image file and print the verdict.
    Classify {
        image: PathBuf,
        /// Write the ELA image to this path.
        #[arg(long)]
        ela_out: Option<PathBuf>,
    },
}

pub fn classify(config: &AppConfig, image: &Path, ela_out: Option<&Path>) -> std::io::Result<()> {
    let model = ModelState::load(config);
    let classifier = model.classifier().map_err(std::io::Error::other)?;

    let bytes = fs::read(image)?;
    let report = pipeline::analyze(&bytes, classifier.as_ref()).map_err(std::io::Error::other)?;

    println!(
        "Result: {} ({})",
        report.prediction.verdict,
        report.prediction.confidence_label()
    );
    println!("{}", report.details());

    if let Some(path) = ela_out {
        report
            .ela
            .image
            .save(path)
            .map_err(std::io::Error::other)?;
        log::info!("ELA image written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ela-backend"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn classify_takes_image_and_optional_output() {
        let cli =
            Cli::try_parse_from(["ela-backend", "classify", "photo.jpg", "--ela-out", "ela.png"])
                .unwrap();
        match cli.command {
            Some(Command::Classify { image, ela_out }) => {
                assert_eq!(image, PathBuf::from("photo.jpg"));
                assert_eq!(ela_out, Some(PathBuf::from("ela.png")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
