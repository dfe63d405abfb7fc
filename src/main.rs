#![forbid(unsafe_code)]

mod cli;
mod color;
mod config;
mod constants;
mod library;
mod output;
mod persistence;
mod render;
mod types;
mod watch;
mod x11_utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use cli::{Command, CommandArgs, LibraryCommand, RenderArgs, WindowedArgs};
use config::{DisplayConfig, TeamConfig};
use library::ImageLibrary;
use output::PresenterContent;
use persistence::{FilePersistence, Persistence};
use render::{FontBook, Overlay, OverlayPosition};
use types::Point;
use watch::WatchOptions;
use x11_utils::X11Environment;

fn load_displays(persistence: Rc<dyn Persistence>, control_at: Option<Point>) -> Result<DisplayConfig> {
    let environment = X11Environment::connect(control_at)?;
    Ok(DisplayConfig::new(persistence, Box::new(environment)))
}

fn print_displays(displays: &DisplayConfig) {
    if displays.number_of_displays() == 0 {
        println!("No displays configured");
        return;
    }
    let mode = if displays.windowed_mode() { "windowed" } else { "monitors" };
    println!("Mode: {mode}");
    for index in 0..displays.number_of_displays() {
        let details = displays.display_details(index);
        // `*` marks the screen holding the control window
        let marker = if displays.is_primary_display(&details) { " *" } else { "" };
        println!(
            "{index}: id={} {} {}{marker}",
            details.id, details.dimensions, details.side
        );
    }
    if displays.primary_display().is_none() {
        warn!("No display hosts the control window");
    }
}

fn windowed(displays: &mut DisplayConfig, args: &WindowedArgs) {
    if args.enable {
        displays.set_windowed_mode(true);
    }
    if args.disable {
        displays.set_windowed_mode(false);
    }
    if let Some(count) = args.count {
        displays.set_window_count(count);
    }
    if let Some(width) = args.width {
        displays.set_window_width(width);
    }
    if let Some(height) = args.height {
        displays.set_window_height(height);
    }
    if displays.is_dirty() {
        displays.save_settings();
    }
    // Rebuild the list for the new mode or window count
    displays.detect_displays();
}

fn load_picture(path: &Path) -> Result<image::RgbaImage> {
    let picture = image::open(path).with_context(|| format!("Failed to load image {}", path.display()))?;
    Ok(picture.to_rgba8())
}

fn presenter_content(args: &RenderArgs) -> Result<PresenterContent> {
    let image = args.image.as_deref().map(load_picture).transpose()?;
    let overlay = match &args.overlay {
        Some(path) => {
            let position = if args.overlay_corner {
                OverlayPosition::BottomLeft
            } else {
                OverlayPosition::Centered
            };
            Some(Overlay::new(
                load_picture(path)?,
                args.overlay_fraction,
                args.overlay_alpha,
                position,
            ))
        }
        None => None,
    };

    Ok(PresenterContent {
        text: args.text.clone(),
        extra_text: args.add_text.clone(),
        clear_text: args.no_text,
        font_size: args.font_size,
        position: args.position,
        target: args.side,
        background: args.background,
        image,
        image_is_scaled: args.scaled,
        overlay,
        auto_fit: !args.no_auto_fit,
        blackout: args.blackout,
    })
}

fn render(displays: &DisplayConfig, teams: &TeamConfig, args: &RenderArgs) -> Result<()> {
    let content = presenter_content(args)?;
    if displays.display_for_side(&args.side).is_none() {
        warn!(side = %args.side, "No display shows the targeted side");
    }
    let fonts = FontBook::load()?;
    let written = output::write_all(displays.displays(), teams, &content, &fonts, &args.out)?;
    if written.is_empty() {
        warn!("No presenter displays configured, nothing written");
    }
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn library_command(library: &mut ImageLibrary, action: LibraryCommand) {
    match action {
        LibraryCommand::Search { query } => {
            let results = library.search(&query);
            info!(query = %results.query(), count = results.filenames().len(), "Library search");
            if !results.matched_tags().is_empty() {
                let tags: Vec<String> = results.matched_tags().iter().map(|t| t.to_string()).collect();
                info!(tags = %tags.join(", "), "Matched tags");
            }
            for path in results.filenames() {
                let name = library.name(path).unwrap_or_default();
                println!("{}\t{}", path.display(), name);
            }
        }
        LibraryCommand::List => {
            for path in library.all_filenames() {
                println!("{}", path.display());
            }
        }
        LibraryCommand::Tags { names } => {
            for tag in library.all_tags(names) {
                println!("{tag}");
            }
        }
        LibraryCommand::Add { path, name, tags } => {
            library.add_image(path, &name, &tags);
            library.save_library();
        }
        LibraryCommand::Remove { path } => {
            if library.delete_image(&path) {
                library.save_library();
            } else {
                warn!(path = %path.display(), "No library image stored at this path");
            }
        }
        LibraryCommand::Move { from, to } => {
            if library.move_image(&from, to) {
                library.save_library();
            } else {
                warn!(path = %from.display(), "No library image stored at this path");
            }
        }
        LibraryCommand::Root { path, keep_paths, remove } => {
            if remove {
                library.remove_library_root();
            } else if let Some(path) = path {
                if keep_paths {
                    library.move_library_root(path);
                } else {
                    library.set_library_root(path);
                }
            } else {
                println!("{}", library.library_root().display());
                return;
            }
            library.save_library();
        }
        LibraryCommand::Clear => {
            library.clear_library();
            library.save_library();
        }
        LibraryCommand::Scan { delete_missing } => {
            let results = library.detect_library_changes(delete_missing);
            if results.is_empty() {
                println!("No library changes");
            } else {
                println!("{}", results.summary());
                library.save_library();
            }
        }
    }
}

fn stop_flag() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    {
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))
            .context("Failed to register SIGINT handler")?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))
            .context("Failed to register SIGTERM handler")?;
    }
    Ok(stop)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = CommandArgs::parse();

    let dir = args.config_dir.clone().unwrap_or_else(FilePersistence::default_dir);
    let files = FilePersistence::new(dir);
    if args.reset_config() {
        files.reset()?;
        info!(dir = %files.dir().display(), "Configuration reset");
    }
    if !args.auto_update() {
        info!("Update check disabled");
    }
    let persistence: Rc<dyn Persistence> = Rc::new(files);

    match args.command {
        Command::Detect => {
            let displays = load_displays(persistence, args.control_at)?;
            print_displays(&displays);
        }
        Command::SetSide { index, roles } => {
            let mut displays = load_displays(persistence, args.control_at)?;
            if index >= displays.number_of_displays() {
                return Err(format!("No display at index {index}").into());
            }
            displays.set_side(index, roles);
            displays.save_settings();
            print_displays(&displays);
        }
        Command::SetId { index, id } => {
            let mut displays = load_displays(persistence, args.control_at)?;
            if index >= displays.number_of_displays() {
                return Err(format!("No display at index {index}").into());
            }
            displays.set_display_id(index, id);
            displays.save_settings();
            print_displays(&displays);
        }
        Command::Swap { a, b } => {
            let mut displays = load_displays(persistence, args.control_at)?;
            let count = displays.number_of_displays();
            if a >= count || b >= count {
                return Err(format!("Display indices must be below {count}").into());
            }
            displays.swap_displays(a, b);
            displays.save_settings();
            print_displays(&displays);
        }
        Command::Windowed(windowed_args) => {
            let mut displays = load_displays(persistence, args.control_at)?;
            windowed(&mut displays, &windowed_args);
            print_displays(&displays);
        }
        Command::TeamColor { team, color } => {
            let mut teams = TeamConfig::new(persistence);
            let index = teams.find_or_add_team(team);
            debug!(index, teams = teams.number_of_teams(), "Coloring team");
            teams.set_color(index, color);
            teams.save_settings();
            println!("{}: {}", teams.team_name(index), color);
        }
        Command::Render(render_args) => {
            let teams = TeamConfig::new(Rc::clone(&persistence));
            let displays = load_displays(persistence, args.control_at)?;
            render(&displays, &teams, &render_args)?;
        }
        Command::Library { action } => {
            let mut library = ImageLibrary::new(persistence);
            library_command(&mut library, action);
        }
        Command::Watch { refresh_ms, scan_secs } => {
            let mut library = ImageLibrary::new(Rc::clone(&persistence));
            let mut displays = load_displays(persistence, args.control_at)?;
            let options = WatchOptions {
                refresh: Duration::from_millis(refresh_ms),
                scan: Duration::from_secs(scan_secs),
            };
            let stop = stop_flag()?;
            watch::run(&mut displays, &mut library, options, &stop);
        }
    }

    Ok(())
}
