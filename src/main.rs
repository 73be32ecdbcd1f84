use std::fs::File;
#[cfg(feature = "pdf")]
use std::io::{self, BufRead};
use std::path::PathBuf;
#[cfg(feature = "pdf")]
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, error, info};
use simplelog::{Config, WriteLogger};

use lectern::catalog::Catalog;
#[cfg(feature = "pdf")]
use lectern::eye_protection::overlay_style;
#[cfg(feature = "pdf")]
use lectern::input::{Action, parse_line};
use lectern::input::parse_viewport;
use lectern::navigation::document_from_query;
use lectern::paths::resolve_log_path;
#[cfg(feature = "pdf")]
use lectern::session::{
    Effect, ReadingTimer, ScrollMetrics, SurfaceSlot, ViewMode, ViewingSession,
};
use lectern::session::Viewport;
use lectern::settings::{FileStore, Settings, SettingsStore};
use lectern::theme::ColorScheme;

#[derive(Parser)]
#[command(name = "lectern", version, about = "Document catalog and reader")]
struct Args {
    /// Directory holding the documents and the pdf-list.json feed
    #[arg(long, default_value = ".")]
    library: PathBuf,

    /// URL-style query string selecting a document, e.g. "pdf=guide.pdf".
    /// Without it the catalog is listed.
    #[arg(long)]
    open: Option<String>,

    /// Initial viewport as WIDTHxHEIGHT[@DPR]
    #[arg(long, default_value = "1280x800")]
    viewport: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = resolve_log_path()?;
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&log_path)
            .with_context(|| format!("Failed to create log file {log_path:?}"))?,
    )?;

    info!("Starting lectern");

    let store =
        FileStore::at_default_location().context("Could not determine config directory")?;
    let settings = store.load();

    let feed_path = args.library.join("pdf-list.json");
    let catalog = Catalog::load_or_fallback(&feed_path);

    let Some(query) = args.open.as_deref() else {
        print_catalog(&catalog, &settings);
        return Ok(());
    };

    let document_id = match document_from_query(query) {
        Ok(id) => id,
        Err(err) => {
            // Fatal input error: back to the catalog, no retry
            error!("document selection failed: {err}");
            eprintln!("{err}");
            print_catalog(&catalog, &settings);
            return Ok(());
        }
    };

    let viewport =
        parse_viewport(&args.viewport).context("Invalid viewport, expected WIDTHxHEIGHT[@DPR]")?;

    println!("Opening {}", catalog.display_title(document_id.as_str()));
    run_viewer(&args.library, document_id, viewport, &catalog, store, settings)
}

fn print_catalog(catalog: &Catalog, settings: &Settings) {
    let scheme = ColorScheme::from_settings(settings);
    println!("{} [{}]", catalog.shelf_title(catalog.len()), scheme.as_attr());
    for entry in catalog.entries() {
        let author = entry.author.as_deref().unwrap_or("");
        println!(
            "  {:<50} {:<24} {:>4} pages  {}",
            entry.title, author, entry.pages, entry.category
        );
    }
    println!("Categories: {}", catalog.categories().join(", "));
}

#[cfg(feature = "pdf")]
fn run_viewer(
    library: &std::path::Path,
    document_id: lectern::DocumentId,
    viewport: Viewport,
    catalog: &Catalog,
    store: FileStore,
    mut settings: Settings,
) -> Result<()> {
    use lectern::source::MupdfSource;

    let source = MupdfSource::new(library.to_path_buf());
    let mut session = match ViewingSession::open_with_progress(
        &source,
        document_id,
        viewport,
        &mut |progress| {
            if let Some(percent) = progress.percent() {
                println!("Loading... {percent}%");
            }
        },
    ) {
        Ok(session) => session,
        Err(err) => {
            // Load failures abort the session and land back on the catalog
            error!("failed to open document: {err}");
            eprintln!("Failed to load document: {err}");
            print_catalog(catalog, &settings);
            return Ok(());
        }
    };

    let _ = session.pump_and_apply();
    let timer = ReadingTimer::started_at(Instant::now());
    let mut fullscreen = false;

    print_state(&session, &timer);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(action) = parse_line(&line) else {
            println!("commands: n p + - 0 z <pct> g <page> w <WxH[@dpr]> s <px> toc t e f q");
            continue;
        };

        match action {
            Action::Quit => break,

            Action::Session(cmd) => {
                let effects = session.apply(cmd);
                for effect in effects {
                    if let Effect::ScrollToPage(page) = effect {
                        if let Some(offset) = session.scroll_target_for(page) {
                            scroll_to(&mut session, offset);
                        }
                    }
                }
            }

            Action::Scroll(offset) => scroll_to(&mut session, offset),

            Action::ShowContents => {
                for entry in session.outline() {
                    let indent = "  ".repeat(usize::from(entry.level) + 1);
                    println!("{indent}{} (page {})", entry.title, entry.page);
                }
            }

            Action::ToggleTheme => {
                settings.dark_mode = !settings.dark_mode;
                store.save(&settings);
                println!("theme: {}", ColorScheme::from_settings(&settings).as_attr());
            }

            Action::ToggleEyeProtection => {
                settings.eye_protection_enabled = !settings.eye_protection_enabled;
                store.save(&settings);
                let style = overlay_style(&settings);
                println!(
                    "eye protection: {} (alpha {:.2})",
                    if style.visible { "on" } else { "off" },
                    style.alpha
                );
            }

            Action::ToggleFullscreen => {
                fullscreen = !fullscreen;
                println!("fullscreen: {fullscreen}");
            }
        }

        let _ = session.pump_and_apply();
        print_state(&session, &timer);
    }

    session.close();
    info!("Shutting down lectern");
    Ok(())
}

#[cfg(not(feature = "pdf"))]
fn run_viewer(
    _library: &std::path::Path,
    _document_id: lectern::DocumentId,
    _viewport: Viewport,
    _catalog: &Catalog,
    _store: FileStore,
    _settings: Settings,
) -> Result<()> {
    anyhow::bail!("this build has no PDF rendering; rebuild with `--features pdf`")
}

#[cfg(feature = "pdf")]
fn scroll_to(session: &mut ViewingSession, offset: f32) {
    let Some(view) = session.mobile_view() else {
        return;
    };
    let metrics = ScrollMetrics {
        scroll_top: offset,
        ..*view.scroll()
    };
    if let Some(progress) = session.handle_scroll(metrics) {
        println!("progress: {progress}%");
    }
}

#[cfg(feature = "pdf")]
fn print_state(session: &ViewingSession, timer: &ReadingTimer) {
    let chrome = session.chrome();
    match session.state().mode {
        ViewMode::Desktop => {
            let surfaces = session.desktop_surfaces();
            println!(
                "{} | {} | {}% | {} | left: {} right: {}",
                chrome.page_label,
                chrome.zoom_label,
                chrome.progress_percent,
                timer.label_at(Instant::now()),
                describe_slot(&surfaces.left),
                describe_slot(&surfaces.right),
            );
        }
        ViewMode::Mobile => {
            if let Some(view) = session.mobile_view() {
                println!(
                    "mobile | {} of {} pages rendered | {}% | {}",
                    view.rendered_count(),
                    view.pages().len(),
                    view.progress(),
                    timer.label_at(Instant::now()),
                );
            }
        }
    }
}

#[cfg(feature = "pdf")]
fn describe_slot(slot: &SurfaceSlot) -> String {
    match slot {
        SurfaceSlot::Empty => "empty".to_string(),
        SurfaceSlot::Pending(_) => "pending".to_string(),
        SurfaceSlot::Ready(surface) => {
            format!("page {} ({}x{})", surface.page, surface.width_px, surface.height_px)
        }
        SurfaceSlot::Hidden => "hidden".to_string(),
        SurfaceSlot::Failed(detail) => format!("error: {detail}"),
    }
}
