use colored::Colorize;
use image::DynamicImage;
use log::info;
use wk_sprite::{Canvas, FrameSequencer, SheetLayout, SpriteError, SpriteResult, SpriteSheet};

fn main() -> SpriteResult<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];
    let input = &args[2];
    let layout = SheetLayout::new(
        parse_arg(&args, 3, "frame width")?,
        parse_arg(&args, 4, "frame height")?,
    );

    match command.as_str() {
        "info" => {
            show_info(input, layout)?;
        }
        "frame" => {
            if args.len() < 8 {
                eprintln!(
                    "{} Duration, elapsed time and output file required",
                    "Error:".red().bold()
                );
                std::process::exit(1);
            }
            let duration_ms = parse_arg(&args, 5, "duration")?;
            let elapsed_ms = parse_arg(&args, 6, "elapsed time")?;
            render_frame(input, layout, duration_ms, elapsed_ms, &args[7])?;
        }
        "strip" => {
            if args.len() < 6 {
                eprintln!("{} Output file required", "Error:".red().bold());
                std::process::exit(1);
            }
            let transform = args.get(6).map(String::as_str).unwrap_or("none");
            render_strip(input, layout, &args[5], transform)?;
        }
        _ => {
            eprintln!("{} Unknown command: {}", "Error:".red().bold(), command);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> SpriteResult<T> {
    let raw = args
        .get(index)
        .ok_or_else(|| SpriteError::InvalidArgument(format!("missing {}", name)))?;
    raw.parse().map_err(|_| {
        SpriteError::InvalidArgument(format!("{} {:?} is not a number", name, raw))
    })
}

fn strip_width(frame_width: u32, count: usize) -> SpriteResult<u32> {
    u32::try_from(count)
        .ok()
        .and_then(|count| frame_width.checked_mul(count))
        .filter(|&width| i32::try_from(width).is_ok())
        .ok_or_else(|| {
            SpriteError::InvalidArgument(format!(
                "{} frames of width {} do not fit in one strip",
                count, frame_width
            ))
        })
}

fn show_info(input: &str, layout: SheetLayout) -> SpriteResult<()> {
    let sheet = SpriteSheet::open(input, layout)?;

    println!("{} {}", "Sprite sheet".cyan().bold(), input.yellow());
    println!(
        "  {} {}x{}",
        "Frame: ".dimmed(),
        layout.frame_width.to_string().white(),
        layout.frame_height.to_string().white()
    );
    println!(
        "  {} {} x {}",
        "Grid:  ".dimmed(),
        sheet.columns().to_string().white(),
        sheet.rows().to_string().white()
    );
    println!(
        "  {} {}",
        "Frames:".dimmed(),
        sheet.frame_count().to_string().magenta()
    );

    Ok(())
}

fn render_frame(
    input: &str,
    layout: SheetLayout,
    duration_ms: u32,
    elapsed_ms: u64,
    output: &str,
) -> SpriteResult<()> {
    let mut sequencer = SpriteSheet::open(input, layout)?.into_sequencer(duration_ms)?;
    sequencer.advance(elapsed_ms)?;
    info!("Elapsed {}ms lands on frame {}", elapsed_ms, sequencer.current_index());

    let mut canvas = Canvas::new(sequencer.width(), sequencer.height());
    sequencer.draw(&mut canvas, 0, 0)?;
    canvas.into_image().save(output)?;

    println!(
        "{} frame {} of {} ({}ms into it) → {}",
        "Rendered".cyan().bold(),
        sequencer.current_index().to_string().magenta(),
        sequencer.frame_count(),
        sequencer.elapsed_ms(),
        output.green()
    );

    Ok(())
}

fn render_strip(
    input: &str,
    layout: SheetLayout,
    output: &str,
    transform: &str,
) -> SpriteResult<()> {
    let mut sequencer: FrameSequencer<DynamicImage> =
        SpriteSheet::open(input, layout)?.into_sequencer(100)?;

    match transform {
        "none" => {}
        "flip-h" => {
            sequencer.flip_horizontal();
        }
        "flip-v" => {
            sequencer.flip_vertical();
        }
        "cw" => {
            sequencer.rotate_clockwise();
        }
        "ccw" => {
            sequencer.rotate_counterclockwise();
        }
        other => {
            eprintln!("{} Unknown transform: {}", "Error:".red().bold(), other);
            std::process::exit(1);
        }
    }

    let (width, height) = sequencer.dimensions();
    let count = sequencer.frame_count();
    let mut canvas = Canvas::new(strip_width(width, count)?, height);
    let mut x = 0i32;
    for _ in 0..count {
        sequencer.draw(&mut canvas, x, 0)?;
        sequencer.step()?;
        // bounded by the strip width checked above
        x += width as i32;
    }
    canvas.into_image().save(output)?;

    println!(
        "{} {} frames ({}) → {}",
        "Rendered".cyan().bold(),
        count.to_string().magenta(),
        transform.yellow(),
        output.green()
    );

    Ok(())
}

fn print_usage() {
    println!("{}", "WK Sprite Tool".cyan().bold());
    println!();
    println!("{}", "Usage:".yellow().bold());
    println!("  wksprite info <sheet> <frame_w> <frame_h>");
    println!("  wksprite frame <sheet> <frame_w> <frame_h> <duration_ms> <elapsed_ms> <out.png>");
    println!("  wksprite strip <sheet> <frame_w> <frame_h> <out.png> [none|flip-h|flip-v|cw|ccw]");
}
