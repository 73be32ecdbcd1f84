//! Input adapter for the driver binary
//!
//! Translates line-oriented driver tokens into session commands and app
//! actions. The core controller never sees raw input; commands that make
//! no sense in the current mode are no-ops inside the state machine, so
//! the adapter stays a dumb mapping.

use crate::session::{Command, Viewport};

/// A parsed input action
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Forwarded to the viewing session
    Session(Command),
    /// Mobile column scrolled to an offset
    Scroll(f32),
    /// Open the contents sheet/sidebar
    ShowContents,
    ToggleTheme,
    ToggleEyeProtection,
    ToggleFullscreen,
    Quit,
}

/// Parse one driver line. Mirrors the viewer's keyboard shortcuts:
/// arrows page, `+`/`-` zoom, `0` resets to 100%.
#[must_use]
pub fn parse_line(line: &str) -> Option<Action> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let arg = parts.next();

    let action = match head {
        "n" | "next" | "right" => Action::Session(Command::NextPage),
        "p" | "prev" | "left" => Action::Session(Command::PreviousPage),
        "+" | "=" => Action::Session(Command::ZoomIn),
        "-" => Action::Session(Command::ZoomOut),
        "0" => Action::Session(Command::SetZoomLevel(100)),
        "z" | "zoom" => Action::Session(Command::SetZoomLevel(arg?.parse().ok()?)),
        "g" | "goto" => Action::Session(Command::GoToPage(arg?.parse().ok()?)),
        "w" | "resize" => Action::Session(Command::SetViewport(parse_viewport(arg?)?)),
        "s" | "scroll" => Action::Scroll(arg?.parse().ok()?),
        "toc" | "contents" => Action::ShowContents,
        "t" | "theme" => Action::ToggleTheme,
        "e" | "eye" => Action::ToggleEyeProtection,
        "f" | "fullscreen" => Action::ToggleFullscreen,
        "q" | "quit" => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// Parse "800x600" or "800x600@2" into a viewport
#[must_use]
pub fn parse_viewport(spec: &str) -> Option<Viewport> {
    let (dims, dpr) = match spec.split_once('@') {
        Some((dims, dpr)) => (dims, dpr.parse().ok()?),
        None => (spec, 1.0),
    };
    let (width, height) = dims.split_once('x')?;
    Some(Viewport::new(
        width.parse().ok()?,
        height.parse().ok()?,
        dpr,
    ))
}
