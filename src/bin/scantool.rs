use clap::{Parser, Subcommand};
use floor_scan::gallery::load_frame;
use floor_scan::{
    BarcodeDecoder, Detection, LumaFrame, Overlay, QrAnalyzer, RqrrDecoder, ScanError, Scanner,
    SharedOverlay,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "scantool", version, about = "Viewfinder QR scanning tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a still image; the first code found wins
    Gallery {
        #[arg(long)]
        image: PathBuf,
    },
    /// Treat an image as a camera frame and apply the viewfinder filter
    Live {
        #[arg(long)]
        image: PathBuf,
        /// Preview surface width (defaults to the frame width)
        #[arg(long)]
        view_width: Option<u32>,
        /// Preview surface height (defaults to the frame height)
        #[arg(long)]
        view_height: Option<u32>,
        /// Viewfinder side as a fraction of the shorter surface side
        #[arg(long)]
        fraction: Option<f32>,
    },
    /// Render the viewfinder mask to a PNG, optionally over an image
    Overlay {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(long)]
        out: PathBuf,
        /// Background image, stretched to the surface size
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Gallery { image } => gallery_cmd(&image),
        Command::Live {
            image,
            view_width,
            view_height,
            fraction,
        } => live_cmd(&image, view_width, view_height, fraction),
        Command::Overlay {
            width,
            height,
            out,
            image,
        } => overlay_cmd(width, height, &out, image.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn gallery_cmd(image: &Path) -> Result<(), ScanError> {
    let mut scanner = Scanner::new();
    let start = Instant::now();
    let result = scanner.scan_image_file(image)?;
    println!("Image: {}", image.display());
    println!("Scanned in {:.2?}", start.elapsed());
    for (key, value) in result.extras() {
        println!("  {}={}", key, value);
    }
    Ok(())
}

/// Keeps a copy of the last frame's detections for reporting
#[derive(Default)]
struct Recording {
    inner: RqrrDecoder,
    last: Vec<Detection>,
}

impl BarcodeDecoder for Recording {
    fn decode(&mut self, frame: &LumaFrame) -> Result<Vec<Detection>, ScanError> {
        let detections = self.inner.decode(frame)?;
        self.last = detections.clone();
        Ok(detections)
    }
}

fn live_cmd(
    image: &Path,
    view_width: Option<u32>,
    view_height: Option<u32>,
    fraction: Option<f32>,
) -> Result<(), ScanError> {
    let frame = load_frame(image)?;
    let view_width = view_width.unwrap_or(frame.width());
    let view_height = view_height.unwrap_or(frame.height());

    let overlay = SharedOverlay::new(fraction.map(Overlay::with_fraction).unwrap_or_default());
    overlay.resize(view_width, view_height);
    let geometry = overlay.geometry();

    println!(
        "Frame: {} ({}x{}), view {}x{}",
        image.display(),
        frame.width(),
        frame.height(),
        view_width,
        view_height
    );
    if let Some(rect) = geometry.rect {
        println!(
            "Viewfinder: ({:.1}, {:.1})-({:.1}, {:.1})",
            rect.left, rect.top, rect.right, rect.bottom
        );
    }

    let mut analyzer = QrAnalyzer::new(Recording::default(), overlay);
    let start = Instant::now();
    let accepted = analyzer.analyze(&frame);
    println!("Analyzed in {:.2?}", start.elapsed());

    let detections = &analyzer.decoder().last;
    println!("Found {} code(s)", detections.len());
    for (i, detection) in detections.iter().enumerate() {
        let verdict = match detection.bounding_box {
            Some(bounds) if geometry.accept(&bounds, frame.width(), frame.height()) => "inside",
            Some(_) => "outside",
            None => "no bounds",
        };
        println!(
            "  Code {}: bounds={:?} value={:?} -> {}",
            i, detection.bounding_box, detection.raw_value, verdict
        );
    }

    match accepted {
        Some(result) => println!("Accepted: {}", result.text),
        None => println!("Nothing accepted"),
    }
    Ok(())
}

fn overlay_cmd(width: u32, height: u32, out: &Path, image: Option<&Path>) -> Result<(), ScanError> {
    let mut overlay = Overlay::new();
    overlay.on_size_changed(width, height);
    let mask = overlay.render_mask();

    let canvas = match image {
        Some(path) => {
            let mut base = image::open(path)?
                .resize_exact(width, height, image::imageops::FilterType::Triangle)
                .to_rgba8();
            image::imageops::overlay(&mut base, &mask, 0, 0);
            base
        }
        None => mask,
    };

    canvas.save(out)?;
    println!("Wrote {}x{} viewfinder to {}", width, height, out.display());
    Ok(())
}
