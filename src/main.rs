//! progress-ribbon - Show a progress ribbon on screen, driven from stdin.

use std::{
    io::BufRead,
    process::ExitCode,
    sync::mpsc::{self, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use lexopt::prelude::*;
use progress_ribbon::{
    AnimationType, Attributes, BarStyle, Canvas, HostContainer, ProgressRibbon, RibbonConfig,
    RibbonView, SizeUnit, SystemClock, TextPosition, VisibilityState, WindowHost,
    backend::{
        Window, WindowEvent,
        x11::{Connection, X11Window},
    },
    detect_theme,
    ui::attributes::{parse_color, parse_dimension},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_ENV: &str = "PROGRESS_RIBBON_LOG";
const FRAME: Duration = Duration::from_millis(16);
const IDLE: Duration = Duration::from_millis(50);

type Ribbon = ProgressRibbon<RibbonView, WindowHost<X11Window>, SystemClock>;
type AnyError = Box<dyn std::error::Error>;

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("progress-ribbon: {e}");
            ExitCode::from(100)
        }
    }
}

/// One parsed stdin line.
enum StdinMessage {
    Progress(u32),
    Text(String),
    Pulsate,
    Show,
    Hide,
    Done,
}

struct Options {
    config: RibbonConfig,
    text: String,
    attributes: Option<Attributes>,
    /// Vertical position of the ribbon's center, as a percentage of the screen.
    position: u32,
    auto_close: bool,
    show_now: bool,
}

fn run() -> Result<u8, AnyError> {
    let Some(opts) = parse_args()? else {
        return Ok(0);
    };

    let conn = Connection::connect()?;
    let (screen_w, screen_h) = conn.screen_size()?;
    let colors = detect_theme();

    let view = RibbonView::new(colors, screen_w.into(), screen_h.into());
    // Height is fixed up once the ribbon has laid itself out
    let host = WindowHost::new(conn.create_window(0, 0, screen_w, 1)?);
    let mut ribbon: Ribbon = match &opts.attributes {
        Some(attrs) => ProgressRibbon::from_attributes(
            attrs,
            colors,
            opts.config.density,
            view,
            host,
            SystemClock,
        )?,
        None => {
            let mut ribbon =
                ProgressRibbon::with_config(opts.config.clone(), view, host, SystemClock);
            ribbon.set_text(&opts.text);
            if opts.show_now {
                ribbon.show(None);
            }
            ribbon
        }
    };
    ribbon.host_mut().window_mut().set_title("Progress")?;

    let rx = spawn_stdin_reader();
    let mut canvas: Option<Canvas> = None;
    let mut dirty = true;
    let mut stdin_done = false;
    let mut finishing = false;
    let mut removing = false;

    loop {
        loop {
            match rx.try_recv() {
                Ok(StdinMessage::Progress(p)) => {
                    ribbon.set_indeterminate(false);
                    ribbon.set_progress(p);
                    if p >= ribbon.max() && opts.auto_close {
                        finishing = true;
                    }
                }
                Ok(StdinMessage::Text(t)) => {
                    ribbon.set_text(&t);
                }
                Ok(StdinMessage::Pulsate) => {
                    ribbon.set_indeterminate(true);
                }
                Ok(StdinMessage::Show) => ribbon.show(None),
                Ok(StdinMessage::Hide) => ribbon.hide(None),
                Ok(StdinMessage::Done) | Err(TryRecvError::Disconnected) => {
                    if !stdin_done {
                        stdin_done = true;
                        finishing |= opts.auto_close;
                    }
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
            dirty = true;
        }

        if finishing && !removing {
            removing = true;
            ribbon.remove_dynamic_ribbon();
        }

        while let Some(event) = ribbon.host_mut().poll_event()? {
            match event {
                WindowEvent::CloseRequested => return Ok(1),
                WindowEvent::RedrawRequested => dirty = true,
                WindowEvent::Resized {
                    width, ..
                } => {
                    ribbon.renderer_mut().set_size(width, screen_h.into());
                    dirty = true;
                }
                WindowEvent::ButtonPress(button, pos) => {
                    let swallowed = ribbon
                        .renderer()
                        .swallows_input(pos.x.into(), pos.y.into());
                    debug!(?button, x = pos.x, y = pos.y, swallowed, "pointer press");
                }
            }
        }

        if ribbon.poll() > 0 {
            dirty = true;
        }

        // A plain hide leaves the window mapped; unmap once nothing is drawn.
        if ribbon.state() == VisibilityState::Hidden && ribbon.host().is_attached() {
            ribbon.host_mut().detach();
        }

        if finishing && ribbon.state() == VisibilityState::Hidden {
            return Ok(0);
        }

        let animated = ribbon.is_animating() || ribbon.is_indeterminate();
        if ribbon.renderer().is_visible() && (dirty || animated) {
            fit_window(&mut ribbon, opts.position, screen_h.into())?;
            let (w, h) = ribbon.host().size();
            if !matches!(&canvas, Some(c) if c.width() == w && c.height() == h) {
                canvas = Some(Canvas::new(w, h)?);
            }
            if let Some(frame) = canvas.as_mut() {
                frame.fill(colors.ribbon_bg);
                ribbon.renderer().draw(frame, Instant::now())?;
                ribbon.host_mut().present(frame)?;
            }
            dirty = false;
        }

        let nap = if animated { FRAME } else { IDLE };
        let nap = ribbon
            .next_deadline()
            .map(|d| d.saturating_duration_since(Instant::now()).min(nap))
            .unwrap_or(nap);
        thread::sleep(nap);
    }
}

/// Keeps the window exactly as tall as the ribbon, centered on `position`.
fn fit_window(ribbon: &mut Ribbon, position: u32, screen_h: u32) -> Result<(), AnyError> {
    let height = ribbon.renderer().preferred_height().max(1);
    let (width, current) = ribbon.host().size();
    let center = (screen_h as u64 * position.min(100) as u64 / 100) as i32;
    let y = (center - height as i32 / 2).clamp(0, screen_h.saturating_sub(height) as i32);
    if current != height {
        ribbon
            .host_mut()
            .window_mut()
            .move_resize(0, y, width, height)?;
    }
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<StdinMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let trimmed = line.trim();

            let message = if let Some(text) = trimmed.strip_prefix('#') {
                StdinMessage::Text(text.trim().to_string())
            } else if trimmed.eq_ignore_ascii_case("pulsate") {
                StdinMessage::Pulsate
            } else if trimmed.eq_ignore_ascii_case("show") {
                StdinMessage::Show
            } else if trimmed.eq_ignore_ascii_case("hide") {
                StdinMessage::Hide
            } else if let Ok(num) = trimmed.parse::<u32>() {
                StdinMessage::Progress(num)
            } else {
                continue;
            };
            if tx.send(message).is_err() {
                return;
            }
        }
        let _ = tx.send(StdinMessage::Done);
    });
    rx
}

fn parse_args() -> Result<Option<Options>, AnyError> {
    let mut parser = lexopt::Parser::from_env();
    let mut config = RibbonConfig::themed(detect_theme(), progress_ribbon::ui::DEFAULT_DENSITY);
    let mut opts = Options {
        config: RibbonConfig::default(),
        text: String::new(),
        attributes: None,
        position: 50,
        auto_close: false,
        show_now: true,
    };

    while let Some(arg) = parser.next()? {
        match arg {
            Long("help") | Short('h') => {
                print_help();
                return Ok(None);
            }
            Long("version") => {
                println!("progress-ribbon {VERSION}");
                return Ok(None);
            }

            Long("text") => opts.text = parser.value()?.string()?,
            Long("percentage") => {
                config.progress = parser.value()?.parse()?;
                config.indeterminate = false;
            }
            Long("pulsate") => config.indeterminate = true,
            Long("min") => config.min = parser.value()?.parse()?,
            Long("max") => config.max = parser.value()?.parse()?,
            Long("auto-close") => opts.auto_close = true,
            Long("hidden") => opts.show_now = false,
            Long("position") => opts.position = parser.value()?.parse()?,

            Long("show-delay") => config.delays.show_delay = millis(parser.value()?.parse()?),
            Long("hide-delay") => config.delays.hide_delay = millis(parser.value()?.parse()?),
            Long("animation") => config.animation.kind = animation(&parser.value()?.string()?)?,
            Long("animation-duration") => {
                config.animation.duration = millis(parser.value()?.parse()?)
            }

            Long("linear") => config.bar_style = BarStyle::Linear,
            Long("text-beside") => config.text_position = TextPosition::Beside,
            Long("dialogue") => config.dialogue_mode = true,
            Long("rtl") => config.right_to_left = true,
            Long("density") => config.density = parser.value()?.parse()?,
            Long("background") => {
                config.background_color = parse_color("background", &parser.value()?.string()?)?
            }
            Long("border-color") => {
                config.border_color = parse_color("border-color", &parser.value()?.string()?)?
            }
            Long("text-color") => {
                config.text_color = parse_color("text-color", &parser.value()?.string()?)?
            }
            Long("text-size") => {
                let value = parser.value()?.string()?;
                config.text_size = parse_dimension("text-size", &value, config.density)?;
            }
            Long("border-size") => {
                let value = parser.value()?.string()?;
                config.border_size =
                    parse_dimension("border-size", &value, config.density)?.round() as u32;
            }
            Long("padding") => {
                let value = parser.value()?.string()?;
                let px = parse_dimension("padding", &value, config.density)?.round() as u32;
                config.padding_top = px;
                config.padding_bottom = px;
            }
            Long("elevation") => config.elevation = parser.value()?.parse()?,
            Long("attributes") => {
                let path = parser.value()?;
                let source = std::fs::read_to_string(path)?;
                opts.attributes = Some(Attributes::parse(&source)?);
            }

            Value(val) => {
                // A bare argument is the label
                if opts.text.is_empty() {
                    opts.text = val.string()?;
                }
            }

            _ => return Err(arg.unexpected().into()),
        }
    }

    if config.text_size <= 0.0 {
        config.text_size = SizeUnit::Sp.to_px(16.0, config.density);
    }
    opts.config = config.normalized();
    Ok(Some(opts))
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn animation(name: &str) -> Result<AnimationType, AnyError> {
    Ok(match name {
        "none" => AnimationType::None,
        "fade" => AnimationType::Fade,
        "scale" => AnimationType::Scale,
        "scale-fade" => AnimationType::ScaleFade,
        _ => return Err(format!("unknown animation type: {name}").into()),
    })
}

fn print_help() {
    println!(
        r#"progress-ribbon {VERSION} - Show a progress ribbon on screen

USAGE:
    progress-ribbon [OPTIONS] [TEXT]

Reads lines from stdin:
    N          Set progress to N (switches to determinate mode)
    #TEXT      Replace the label
    pulsate    Switch to indeterminate mode
    show       Show the ribbon (after the show delay)
    hide       Hide the ribbon (after the hide delay)

OPTIONS:
    --text=TEXT               Label text
    --percentage=N            Initial progress
    --pulsate                 Start in indeterminate mode
    --min=N, --max=N          Progress range (default 0..100)
    --auto-close              Exit once progress reaches max or stdin closes
    --hidden                  Stay hidden until a "show" line arrives
    --position=PCT            Vertical center as a percentage of the screen (default 50)
    --show-delay=MS           Delay before showing
    --hide-delay=MS           Delay before hiding
    --animation=TYPE          none, fade, scale or scale-fade
    --animation-duration=MS   Length of the entrance/exit animation (default 300)
    --linear                  Horizontal bar instead of the circular spinner
    --text-beside             Label beside the spinner
    --dialogue                Inset card with rounded corners and four borders
    --rtl                     Right-to-left layout
    --density=F               Pixels per dp
    --background=#RRGGBB      Background color (#AARRGGBB also accepted)
    --border-color=#RRGGBB    Border color
    --text-color=#RRGGBB      Label color
    --text-size=SIZE          Label size, e.g. 16sp
    --border-size=SIZE        Border thickness, e.g. 1dp
    --padding=SIZE            Top and bottom padding, e.g. 16dp
    --elevation=F             Shadow depth
    --attributes=FILE         Read `name = value` ribbon attributes from FILE
    -h, --help                Print this help message
    --version                 Print version information

ENVIRONMENT:
    PROGRESS_RIBBON_LOG       Log filter, e.g. debug (default warn)
    PROGRESS_RIBBON_FONT      Font file to use for the label

EXIT CODES:
    0   Finished (with --auto-close)
    1   Dismissed with Escape or by the window manager
    100 Error occurred
"#
    );
}
