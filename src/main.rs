use std::process::ExitCode;

use clap::{Parser, Subcommand};

use guidepage::dom::serialize::to_html;
use guidepage::dom::DomTree;
use guidepage::guide::{catalog, check_anchors, render_guide, GuideContent, MountedGuide};
use guidepage::head::HeadSnapshot;
use guidepage::window::{Window, DEFAULT_VIEWPORT};

/// Inspect bundled or local guide pages.
#[derive(Parser, Debug)]
#[command(name = "guide-inspect", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Viewport width in pixels.
    #[arg(long, global = true, default_value_t = DEFAULT_VIEWPORT.0, env = "GUIDE_VIEWPORT_WIDTH")]
    width: f32,

    /// Viewport height in pixels.
    #[arg(long, global = true, default_value_t = DEFAULT_VIEWPORT.1, env = "GUIDE_VIEWPORT_HEIGHT")]
    height: f32,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the head tags and JSON-LD a guide produces.
    Head {
        /// Catalog slug or path to a YAML guide.
        guide: String,
    },
    /// Scroll a guide top to bottom and print active-section changes.
    Trace {
        guide: String,
        /// Pixels per scroll step.
        #[arg(long, default_value_t = 40.0)]
        step: f32,
    },
    /// Check that every section id resolves to one element.
    Anchors { guide: String },
    /// Print the rendered page as HTML, head included.
    Render { guide: String },
    /// List bundled guides.
    List,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` when the command ran but found problems.
fn run(cli: &Cli) -> guidepage::Result<bool> {
    match &cli.command {
        Command::Head { guide } => {
            let content = catalog::resolve(guide)?;
            let mut window = mounted_window(cli);
            let page = MountedGuide::mount(Some(&mut window), &content)?;
            print_head(&HeadSnapshot::read(window.document()))?;
            page.unmount(Some(&mut window));
            Ok(true)
        }
        Command::Trace { guide, step } => {
            let content = catalog::resolve(guide)?;
            trace(cli, &content, *step)
        }
        Command::Anchors { guide } => {
            let content = catalog::resolve(guide)?;
            let sections = content.section_list()?;
            let report = check_anchors(&render_guide(&content), &sections);
            for id in &report.missing {
                println!("missing     #{}", id);
            }
            for id in &report.duplicated {
                println!("duplicated  #{}", id);
            }
            if report.is_clean() {
                println!("{}: {} sections, all anchors resolve", content.slug, sections.len());
            }
            Ok(report.is_clean())
        }
        Command::Render { guide } => {
            let content = catalog::resolve(guide)?;
            let mut window = mounted_window(cli);
            let page = MountedGuide::mount(Some(&mut window), &content)?;
            println!("{}", to_html(window.document()));
            page.unmount(Some(&mut window));
            Ok(true)
        }
        Command::List => {
            for slug in catalog::slugs() {
                let content = catalog::load(slug)?;
                println!("{:<24} {}", slug, content.heading);
            }
            Ok(true)
        }
    }
}

fn mounted_window(cli: &Cli) -> Window {
    Window::new(DomTree::new("about:blank"), cli.width, cli.height)
}

fn print_head(snap: &HeadSnapshot) -> guidepage::Result<()> {
    for title in &snap.titles {
        println!("title      {}", title);
    }
    for href in &snap.canonicals {
        println!("canonical  {}", href);
    }
    for (key, content) in &snap.metas {
        println!("meta       {:<22} {}", key, content);
    }
    for value in &snap.json_ld {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

fn trace(cli: &Cli, content: &GuideContent, step: f32) -> guidepage::Result<bool> {
    if step <= 0.0 {
        eprintln!("--step must be positive");
        return Ok(false);
    }
    let mut window = mounted_window(cli);
    let page = MountedGuide::mount(Some(&mut window), content)?;

    let mut last = page.active_section();
    println!("{:>8.1}  {}", window.scroll_y(), last);
    while window.scroll_y() < window.max_scroll() {
        let before = window.scroll_y();
        window.scroll_by(step);
        if window.scroll_y() <= before {
            log::warn!("step {} does not move the viewport at {}", step, before);
            break;
        }
        let active = page.active_section();
        if active != last {
            println!("{:>8.1}  {}", window.scroll_y(), active);
            last = active;
        }
    }

    page.unmount(Some(&mut window));
    Ok(true)
}
